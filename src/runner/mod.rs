pub mod availability;
pub mod budget;
pub mod classify;
pub mod exec;
pub mod ledger_gate;
pub mod prereq;
pub mod resolve;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::cache::DiscoveryCache;
use crate::config::CredentialConfig;
use crate::ledger::DecisionLedger;
use crate::planner::PlanEntry;
use crate::profile::TargetProfile;
use budget::Budget;

/// Terminal state of a tool run (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolOutcome {
    SuccessWithFindings,
    SuccessNoFindings,
    ExecutedNoSignal,
    Timeout,
    Blocked,
    Skipped,
    ExecutionError,
}

/// Fixed failure-reason vocabulary (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    ToolNotInstalled,
    PermissionDenied,
    TargetUnreachable,
    Timeout,
    ArgumentError,
    UnknownError,
    PrereqMissing,
    BudgetExhausted,
    PolicyDenied,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub tool_name: String,
    pub outcome: ToolOutcome,
    pub failure_reason: Option<FailureReason>,
    pub command: String,
    pub duration_ms: u64,
    pub stdout_head: String,
    pub stdout_tail: String,
    pub stderr_head: String,
    pub stderr_truncated_bytes: usize,
    pub retried: bool,
}

impl ExecutionRecord {
    fn blocked(tool_name: &str, command: String, reason: FailureReason) -> Self {
        Self {
            tool_name: tool_name.to_string(),
            outcome: ToolOutcome::Blocked,
            failure_reason: Some(reason),
            command,
            duration_ms: 0,
            stdout_head: String::new(),
            stdout_tail: String::new(),
            stderr_head: String::new(),
            stderr_truncated_bytes: 0,
            retried: false,
        }
    }

    fn skipped(tool_name: &str, command: String, reason: FailureReason) -> Self {
        Self {
            tool_name: tool_name.to_string(),
            outcome: ToolOutcome::Skipped,
            failure_reason: Some(reason),
            command,
            duration_ms: 0,
            stdout_head: String::new(),
            stdout_tail: String::new(),
            stderr_head: String::new(),
            stderr_truncated_bytes: 0,
            retried: false,
        }
    }

    /// Logs this record at the level its outcome warrants (spec §7: SUCCESS
    /// -> INFO, BLOCKED/SKIPPED -> INFO, TIMEOUT -> WARN, EXECUTION_ERROR ->
    /// ERROR).
    pub fn log(&self) {
        match self.outcome {
            ToolOutcome::Timeout => {
                warn!(tool = %self.tool_name, outcome = ?self.outcome, "tool run timed out")
            }
            ToolOutcome::ExecutionError => {
                error!(tool = %self.tool_name, outcome = ?self.outcome, reason = ?self.failure_reason, "tool run failed")
            }
            _ => {
                info!(tool = %self.tool_name, outcome = ?self.outcome, reason = ?self.failure_reason, "tool run completed")
            }
        }
    }
}

/// Synthesizes a `Skipped` record for a plan entry the orchestrator never
/// dispatched because the runtime budget was already exhausted before the
/// phase started (spec §5: "stops dispatching new entries"). Distinct from
/// the budget check inside `run()` itself, which covers entries dispatched
/// mid-phase that exhaust the budget while in flight.
pub fn not_dispatched(tool_name: &str, reason: &str) -> ExecutionRecord {
    ExecutionRecord::skipped(tool_name, format!("# {reason}"), FailureReason::BudgetExhausted)
}

/// Synthesizes a `Blocked` record for a catalogue tool the ledger denies
/// for this target type and that no planner therefore ever considered
/// dispatching (spec §4.3/§4.8 ledger-completeness invariant).
pub fn not_applicable(tool_name: &str) -> ExecutionRecord {
    ExecutionRecord::blocked(tool_name, String::new(), FailureReason::PolicyDenied)
}

pub struct RunContext<'a> {
    pub profile: &'a TargetProfile,
    pub cache: &'a DiscoveryCache,
    pub ledger: &'a DecisionLedger,
    pub budget: &'a Budget,
    pub credentials: Option<&'a CredentialConfig>,
    pub skip_install: bool,
    pub cancel_token: &'a CancellationToken,
}

/// Executes one plan entry end to end (spec §4.5). Each numbered step below
/// corresponds to the spec's numbered responsibilities.
pub async fn run(entry: &PlanEntry, ctx: &RunContext<'_>) -> ExecutionRecord {
    let resolved = resolve::command(entry, ctx.profile, ctx.credentials);

    // 1. Budget check
    if ctx.budget.is_exhausted() {
        return ExecutionRecord::skipped(&entry.tool_name, resolved, FailureReason::BudgetExhausted);
    }

    // 2. Ledger check
    if ctx.ledger.denies(&entry.tool_name) {
        return ExecutionRecord::blocked(&entry.tool_name, resolved, FailureReason::PolicyDenied);
    }

    // 3. Prereq check (re-evaluated against current cache state)
    if !prereq::check(entry, ctx.profile, ctx.cache).await {
        return ExecutionRecord::blocked(&entry.tool_name, resolved, FailureReason::PrereqMissing);
    }

    // 4. Availability check. Tool installation is out of scope for this
    // engine (spec §1), so `--skip-install` does not change this check —
    // it only documents that the engine never attempts to install tools.
    let binary = resolved.split_whitespace().next().unwrap_or(&entry.tool_name);
    if !availability::is_available(binary).await {
        return ExecutionRecord::blocked(&entry.tool_name, resolved, FailureReason::ToolNotInstalled);
    }

    if resolve::has_unresolved(&resolved) {
        return ExecutionRecord::blocked(&entry.tool_name, resolved, FailureReason::PrereqMissing);
    }

    let timeout = ctx
        .ledger
        .timeout(&entry.tool_name)
        .unwrap_or(entry.priority.max(1) as u64 * 10);

    // 5/6. Execute subprocess with timeout, racing cancellation
    let mut record = exec::run_once(&entry.tool_name, &resolved, timeout, ctx.cancel_token).await;

    // 9. Retry policy: one retry on TIMEOUT for non-blocking tools, budget permitting
    if record.outcome == ToolOutcome::Timeout && ctx.budget.remaining_secs() >= timeout {
        info!(tool = %entry.tool_name, "retrying after timeout");
        record = exec::run_once(&entry.tool_name, &resolved, timeout, ctx.cancel_token).await;
        record.retried = true;
    }

    record.log();
    record
}
