use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::{Mutex, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cache::DiscoveryCache;
use crate::cache::heuristics::ParamClassifier;
use crate::config::{CredentialConfig, ScoutlineConfig};
use crate::errors::EngineError;
use crate::findings::{Registry, ScoringWeights};
use crate::ledger::{self, DecisionLedger};
use crate::planner::{self, PlanEntry};
use crate::planner::phase::Phase;
use crate::profile::{self, TargetProfile};
use crate::report::{self, ExecutionReport, ScanMetadata};
use crate::runner::budget::Budget;
use crate::runner::{self, ExecutionRecord, RunContext};

/// Drives one scan end to end (spec §4.4-§4.8): builds the frozen Profile
/// and Ledger, runs the plan phase by phase with phase boundaries as
/// synchronisation points, gates the Crawl phase's downstream tools on its
/// endpoint graph via the Discovery Cache, finalizes findings, and emits
/// the report artefact set.
pub struct PipelineOrchestrator {
    pub workers: usize,
    pub skip_install: bool,
    pub emit_html: bool,
}

pub struct ScanOutcome {
    pub report: ExecutionReport,
    pub exit_code: i32,
}

impl PipelineOrchestrator {
    pub fn new(workers: usize, skip_install: bool, emit_html: bool) -> Self {
        Self {
            workers: workers.max(1),
            skip_install,
            emit_html,
        }
    }

    pub async fn run(
        &self,
        raw_target: &str,
        config: &ScoutlineConfig,
        output_dir: &Path,
        runtime_budget_secs: u64,
        cancel_token: CancellationToken,
    ) -> Result<ScanOutcome, EngineError> {
        let started_at = chrono::Utc::now();
        let scan_id = uuid::Uuid::new_v4().to_string();

        let profile = profile::build_profile(raw_target).await?;
        info!(target = %profile.host, target_type = ?profile.target_type, "profile built");

        let ledger = ledger::build_ledger(&profile);
        let plan = planner::plan(&profile, &ledger);
        let by_phase = group_by_phase(plan);

        let heuristics = config.heuristics.clone().unwrap_or_default();
        let cache = DiscoveryCache::new(ParamClassifier::new(&heuristics));
        let scoring = config.scoring.clone().unwrap_or_default();
        let registry = Registry::new(ScoringWeights::new(scoring));
        let ledger = Arc::new(ledger);
        let budget = Arc::new(Budget::new(runtime_budget_secs));
        let credentials = config.credentials.clone();

        let profile_handle = Arc::new(Mutex::new(profile));
        let records: Arc<Mutex<BTreeMap<String, ExecutionRecord>>> = Arc::new(Mutex::new(BTreeMap::new()));

        for phase in Phase::ALL {
            if cancel_token.is_cancelled() {
                warn!("scan interrupted; draining in-flight work and emitting partial report");
                break;
            }

            if phase == Phase::Crawl {
                let snapshot = profile_handle.lock().await.clone();
                crawler_phase(&snapshot, &cache).await;
                continue;
            }

            let Some(entries) = by_phase.get(&phase) else {
                continue;
            };

            if budget.is_exhausted() {
                info!(phase = %phase, "runtime budget exhausted; skipping remaining phases' entries");
                let mut guard = records.lock().await;
                for entry in entries {
                    guard.insert(
                        entry.tool_name.clone(),
                        runner::not_dispatched(&entry.tool_name, "budget exhausted before dispatch"),
                    );
                }
                continue;
            }

            info!(phase = %phase, tools = entries.len(), "starting phase");
            self.run_phase(
                entries,
                &profile_handle,
                &ledger,
                &cache,
                &registry,
                &budget,
                credentials.as_ref(),
                &cancel_token,
                &records,
            )
            .await;
        }

        // Every catalogue tool not dispatched by any planner for this
        // target type still owes the ledger's completeness invariant an
        // execution record (spec §4.3/§4.8): the ledger enumerates every
        // tool regardless of target type, the planner only dispatches the
        // ones applicable to this one.
        {
            let mut guard = records.lock().await;
            for tool in ledger.decisions().keys() {
                guard
                    .entry(tool.clone())
                    .or_insert_with(|| runner::not_applicable(tool));
            }
        }

        cache.verify_subdomains().await;
        let findings = registry.finalize().await;

        let final_profile = profile_handle.lock().await.clone();
        let records = records.lock().await.clone();
        let cache_snapshot = cache.snapshot().await;

        let ended_at = chrono::Utc::now();
        let scan_metadata = ScanMetadata {
            scan_id,
            started_at,
            ended_at,
            wall_seconds: (ended_at - started_at).num_seconds().max(0) as u64,
        };

        let report = report::emit(
            output_dir,
            &final_profile,
            &ledger,
            &records,
            cache_snapshot,
            findings,
            scan_metadata,
            self.emit_html,
        )
        .await?;

        let exit_code = report::exit_code(&report.findings);
        Ok(ScanOutcome { report, exit_code })
    }

    /// Runs every entry of one phase concurrently, bounded by `self.workers`
    /// (spec §5: "bounded worker pool per phase"), then waits for all of
    /// them before returning — the phase boundary the spec treats as the
    /// sole synchronisation point.
    ///
    /// Each task parses its own tool's stdout against a private clone of
    /// the Profile (parsers need `&mut TargetProfile` to write the
    /// write-once CMS/tech enrichment cells). Clones can't race each other,
    /// but they also can't see each other's writes mid-phase — so once the
    /// whole phase has joined, any detected tech/CMS is folded back into
    /// the one shared Profile before the next phase's snapshot is taken.
    #[allow(clippy::too_many_arguments)]
    async fn run_phase(
        &self,
        entries: &[PlanEntry],
        profile_handle: &Arc<Mutex<TargetProfile>>,
        ledger: &Arc<DecisionLedger>,
        cache: &DiscoveryCache,
        registry: &Registry,
        budget: &Arc<Budget>,
        credentials: Option<&CredentialConfig>,
        cancel_token: &CancellationToken,
        records: &Arc<Mutex<BTreeMap<String, ExecutionRecord>>>,
    ) {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let profile_snapshot = profile_handle.lock().await.clone();
        let credentials = credentials.cloned();

        let mut handles = Vec::with_capacity(entries.len());
        for entry in entries.iter().cloned() {
            let semaphore = semaphore.clone();
            let mut task_profile = profile_snapshot.clone();
            let cache = cache.clone();
            let registry = registry.clone();
            let ledger = ledger.clone();
            let budget = budget.clone();
            let credentials = credentials.clone();
            let cancel_token = cancel_token.clone();
            let skip_install = self.skip_install;

            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let ctx = RunContext {
                    profile: &task_profile,
                    cache: &cache,
                    ledger: &ledger,
                    budget: &budget,
                    credentials: credentials.as_ref(),
                    skip_install,
                    cancel_token: &cancel_token,
                };
                let record = runner::run(&entry, &ctx).await;

                let full_stdout = format!("{}{}", record.stdout_head, record.stdout_tail);
                if !full_stdout.is_empty() {
                    crate::parsers::parse(&entry.tool_name, &full_stdout, &cache, &registry, &mut task_profile).await;
                }

                (record, task_profile)
            }));
        }

        let results = futures::future::join_all(handles).await;

        let mut merged_tech = std::collections::BTreeSet::new();
        let mut merged_cms: Option<String> = None;
        {
            let mut guard = records.lock().await;
            for result in results {
                match result {
                    Ok((record, task_profile)) => {
                        merged_tech.extend(task_profile.detected_tech.iter().cloned());
                        if merged_cms.is_none() {
                            merged_cms = task_profile.detected_cms.clone();
                        }
                        guard.insert(record.tool_name.clone(), record);
                    }
                    Err(e) => warn!(error = %e, "tool task panicked"),
                }
            }
        }

        if !merged_tech.is_empty() || merged_cms.is_some() {
            let mut profile = profile_handle.lock().await;
            for tech in merged_tech {
                profile.add_detected_tech(tech);
            }
            if let Some(cms) = merged_cms {
                let _ = profile.set_detected_cms(cms);
            }
        }
    }
}

fn group_by_phase(entries: Vec<PlanEntry>) -> BTreeMap<Phase, Vec<PlanEntry>> {
    let mut by_phase: BTreeMap<Phase, Vec<PlanEntry>> = BTreeMap::new();
    for entry in entries {
        by_phase.entry(entry.phase).or_default().push(entry);
    }
    by_phase
}

async fn crawler_phase(profile: &TargetProfile, cache: &DiscoveryCache) {
    let graph = crate::crawler::run(profile, cache, None).await;
    info!(
        endpoints = graph.endpoints.len(),
        forms = graph.forms_present,
        timed_out = graph.timed_out,
        "crawl complete"
    );
}
