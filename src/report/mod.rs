pub mod html;

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::CacheInner;
use crate::errors::EngineError;
use crate::findings::Finding;
use crate::findings::Severity;
use crate::ledger::DecisionLedger;
use crate::profile::TargetProfile;
use crate::runner::{ExecutionRecord, ToolOutcome};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanMetadata {
    pub scan_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub wall_seconds: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindingsSummary {
    pub by_severity: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
    pub corroborated_count: usize,
    pub confirmed_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayloadAttempts {
    pub count: usize,
    pub success_count: usize,
}

/// The JSON document the engine writes as `execution_report.json` (spec §6).
/// This is the source of truth; `report::html` renders a presentational view
/// from the exact same data, never recomputing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub profile: TargetProfile,
    pub https_capability: bool,
    pub ledger: BTreeMap<String, crate::ledger::ToolDecision>,
    pub execution_records: BTreeMap<String, ExecutionRecord>,
    pub discovery_cache: CacheInner,
    pub findings: Vec<Finding>,
    pub findings_summary: FindingsSummary,
    pub payload_attempts: PayloadAttempts,
    pub scan_metadata: ScanMetadata,
}

fn summarize(findings: &[Finding]) -> FindingsSummary {
    let mut by_severity = BTreeMap::new();
    let mut by_category = BTreeMap::new();
    let mut corroborated_count = 0;
    let mut confirmed_count = 0;

    for f in findings {
        *by_severity.entry(format!("{:?}", f.severity)).or_insert(0) += 1;
        *by_category.entry(f.owasp_category.clone()).or_insert(0) += 1;
        match f.correlation_status {
            crate::findings::CorrelationStatus::Corroborated => corroborated_count += 1,
            crate::findings::CorrelationStatus::Confirmed => confirmed_count += 1,
            _ => {}
        }
    }

    FindingsSummary {
        by_severity,
        by_category,
        corroborated_count,
        confirmed_count,
    }
}

fn count_payload_attempts(records: &BTreeMap<String, ExecutionRecord>, findings: &[Finding]) -> PayloadAttempts {
    const PAYLOAD_TOOLS: &[&str] = &["sqlmap", "dalfox", "xsstrike", "commix"];
    let count = records
        .values()
        .filter(|r| PAYLOAD_TOOLS.contains(&r.tool_name.as_str()) && r.outcome != ToolOutcome::Blocked && r.outcome != ToolOutcome::Skipped)
        .count();
    let success_count = findings
        .iter()
        .filter(|f| f.tools.iter().any(|t| PAYLOAD_TOOLS.contains(&t.as_str())) && f.success_indicator.map(|s| s.is_payload_success()).unwrap_or(false))
        .count();
    PayloadAttempts { count, success_count }
}

/// Assembles and writes the full report artefact set (spec §4.8): the JSON
/// source of truth, one `<tool>.txt` per ledger tool's raw output, and an
/// optional derived HTML summary. Asserts that every ledger tool is
/// enumerated in exactly one of executed/blocked/skipped, mirroring the
/// ledger-completeness assertion in `ledger::build_ledger`.
pub async fn emit(
    output_dir: &Path,
    profile: &TargetProfile,
    ledger: &DecisionLedger,
    records: &BTreeMap<String, ExecutionRecord>,
    cache_snapshot: CacheInner,
    findings: Vec<Finding>,
    scan_metadata: ScanMetadata,
    emit_html: bool,
) -> Result<ExecutionReport, EngineError> {
    tokio::fs::create_dir_all(output_dir).await?;

    for tool in ledger.decisions().keys() {
        debug_assert!(
            records.contains_key(tool) || ledger.denies(tool),
            "tool {tool} missing from execution records and not denied by the ledger"
        );
    }
    debug_assert!(
        ledger.decisions().keys().all(|tool| records.contains_key(tool)),
        "every ledger tool must appear in exactly one of executed/blocked/skipped"
    );

    for record in records.values() {
        write_tool_transcript(output_dir, record).await?;
    }

    let findings_summary = summarize(&findings);
    let payload_attempts = count_payload_attempts(records, &findings);

    let report = ExecutionReport {
        profile: profile.clone(),
        https_capability: profile.https_capable,
        ledger: ledger.decisions().clone(),
        execution_records: records.clone(),
        discovery_cache: cache_snapshot,
        findings,
        findings_summary,
        payload_attempts,
        scan_metadata,
    };

    let json_path = output_dir.join("execution_report.json");
    let serialized = serde_json::to_string_pretty(&report)?;
    tokio::fs::write(&json_path, serialized).await?;

    if emit_html {
        let html_path = output_dir.join("security_report.html");
        tokio::fs::write(&html_path, html::render(&report)).await?;
    }

    Ok(report)
}

async fn write_tool_transcript(output_dir: &Path, record: &ExecutionRecord) -> Result<(), EngineError> {
    let path = output_dir.join(format!("{}.txt", record.tool_name));
    let full_stdout = format!("{}{}", record.stdout_head, record.stdout_tail);
    let body = format!(
        "{full_stdout}\n----- stderr -----\n{}",
        record.stderr_head
    );
    tokio::fs::write(path, body).await?;
    Ok(())
}

/// Maps the highest-severity finding to the CI-aware exit code (spec §6).
pub fn exit_code(findings: &[Finding]) -> i32 {
    let highest = findings.iter().map(|f| f.severity).min();
    match highest {
        None => 0,
        Some(Severity::Info) | Some(Severity::Low) => 1,
        Some(Severity::Medium) => 2,
        Some(Severity::High) => 3,
        Some(Severity::Critical) => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::category::VulnCategory;
    use crate::findings::{ConfidenceLabel, CorrelationStatus};

    fn finding(severity: Severity) -> Finding {
        Finding {
            id: "abc123".into(),
            category: VulnCategory::Injection,
            severity,
            endpoint: "/login".into(),
            parameter: None,
            evidence: String::new(),
            tools: vec!["sqlmap".into()],
            owasp_category: "A03:2021".into(),
            cwe: None,
            confidence: 0.8,
            confidence_label: ConfidenceLabel::High,
            corroboration_count: 1,
            correlation_status: CorrelationStatus::SingleTool,
            success_indicator: None,
        }
    }

    #[test]
    fn exit_code_tracks_highest_severity() {
        assert_eq!(exit_code(&[]), 0);
        assert_eq!(exit_code(&[finding(Severity::Low)]), 1);
        assert_eq!(exit_code(&[finding(Severity::Medium)]), 2);
        assert_eq!(exit_code(&[finding(Severity::High), finding(Severity::Low)]), 3);
        assert_eq!(exit_code(&[finding(Severity::Critical)]), 4);
    }

    #[test]
    fn summary_counts_by_severity() {
        let summary = summarize(&[finding(Severity::High), finding(Severity::High), finding(Severity::Low)]);
        assert_eq!(summary.by_severity.get("High"), Some(&2));
        assert_eq!(summary.by_severity.get("Low"), Some(&1));
    }
}
