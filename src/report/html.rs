use std::fmt::Write as _;

use super::ExecutionReport;

/// Renders a purely presentational HTML view of an `ExecutionReport`. Never
/// recomputes anything from raw tool output — every number here already
/// exists in the JSON document this is derived from.
pub fn render(report: &ExecutionReport) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Scan report: {}</title>",
        escape(&report.profile.host)
    );
    out.push_str(STYLE);
    out.push_str("</head><body>");
    let _ = write!(
        out,
        "<h1>Scan report: {}</h1><p>target type: {:?} &middot; scan id: {} &middot; wall time: {}s</p>",
        escape(&report.profile.host),
        report.profile.target_type,
        escape(&report.scan_metadata.scan_id),
        report.scan_metadata.wall_seconds
    );

    out.push_str("<h2>Findings summary</h2><ul>");
    for (severity, count) in &report.findings_summary.by_severity {
        let _ = write!(out, "<li>{}: {}</li>", escape(severity), count);
    }
    out.push_str("</ul>");

    out.push_str("<h2>Findings</h2><table><tr><th>Severity</th><th>Category</th><th>Endpoint</th><th>Parameter</th><th>Confidence</th><th>Status</th><th>Tools</th></tr>");
    for f in &report.findings {
        let _ = write!(
            out,
            "<tr><td>{:?}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{:?}</td><td>{}</td></tr>",
            f.severity,
            escape(&f.owasp_category),
            escape(&f.endpoint),
            f.parameter.as_deref().map(escape).unwrap_or_default(),
            f.confidence,
            f.correlation_status,
            escape(&f.tools.join(", "))
        );
    }
    out.push_str("</table>");

    out.push_str("<h2>Tool execution</h2><table><tr><th>Tool</th><th>Outcome</th><th>Reason</th><th>Duration (ms)</th></tr>");
    for (tool, record) in &report.execution_records {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{:?}</td><td>{}</td><td>{}</td></tr>",
            escape(tool),
            record.outcome,
            record.failure_reason.map(|r| format!("{r:?}")).unwrap_or_default(),
            record.duration_ms
        );
    }
    out.push_str("</table>");

    out.push_str("</body></html>");
    out
}

const STYLE: &str = "<style>body{font-family:sans-serif;margin:2rem}table{border-collapse:collapse;width:100%}td,th{border:1px solid #ccc;padding:4px 8px;text-align:left}</style>";

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{FindingsSummary, PayloadAttempts, ScanMetadata};
    use std::collections::BTreeMap;

    fn empty_report() -> ExecutionReport {
        ExecutionReport {
            profile: crate::profile::TargetProfile {
                original_input: "example.com".into(),
                target_type: crate::profile::TargetType::RootDomain,
                scope: crate::profile::Scope::DomainTree,
                host: "example.com".into(),
                scheme: "https".into(),
                port: None,
                base_domain: None,
                resolved_ips: Default::default(),
                reachable: true,
                https_capable: true,
                web_target: true,
                detected_cms: None,
                detected_tech: Default::default(),
                created_at: chrono::Utc::now(),
            },
            https_capability: true,
            ledger: BTreeMap::new(),
            execution_records: BTreeMap::new(),
            discovery_cache: crate::cache::CacheInner::default(),
            findings: vec![],
            findings_summary: FindingsSummary::default(),
            payload_attempts: PayloadAttempts::default(),
            scan_metadata: ScanMetadata {
                scan_id: "abc".into(),
                started_at: chrono::Utc::now(),
                ended_at: chrono::Utc::now(),
                wall_seconds: 10,
            },
        }
    }

    #[test]
    fn renders_without_panicking_on_empty_report() {
        let html = render(&empty_report());
        assert!(html.contains("example.com"));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn escapes_html_in_host() {
        assert_eq!(escape("<script>"), "&lt;script&gt;");
    }
}
