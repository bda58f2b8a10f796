use crate::findings::category::VulnCategory;
use crate::findings::scoring::SourceStrength;
use crate::findings::{RawFinding, Registry, Severity};

/// `nuclei -u <target_url> -silent` prints one finding per line in the form
/// `[template-id] [severity] [protocol] url [extra]`.
pub async fn parse_nuclei(stdout: &str, registry: &Registry) {
    for line in stdout.lines() {
        let Some(parsed) = parse_nuclei_line(line) else { continue };
        registry.register(parsed).await;
    }
}

fn parse_nuclei_line(line: &str) -> Option<RawFinding> {
    let line = line.trim();
    if !line.starts_with('[') {
        return None;
    }
    let mut brackets = Vec::new();
    let mut rest = line;
    while let Some(open) = rest.find('[') {
        let Some(close) = rest[open..].find(']') else { break };
        brackets.push(rest[open + 1..open + close].to_string());
        rest = &rest[open + close + 1..];
        if brackets.len() >= 3 {
            break;
        }
    }
    let template_id = brackets.first()?.clone();
    let severity_token = brackets.get(1).map(String::as_str).unwrap_or("info");
    let severity = map_severity(severity_token);
    let endpoint = rest.trim().split_whitespace().next().unwrap_or("/").to_string();
    let category = VulnCategory::from_keyword(&template_id);

    Some(
        RawFinding::new(category, severity, endpoint, "nuclei", line)
            .with_source_strength(SourceStrength::Heuristic)
            .with_cwe_if_present(&template_id),
    )
}

fn map_severity(token: &str) -> Severity {
    match token.to_lowercase().as_str() {
        "critical" => Severity::Critical,
        "high" => Severity::High,
        "medium" => Severity::Medium,
        "low" => Severity::Low,
        _ => Severity::Info,
    }
}

/// `nikto -h <target_url>` prints one finding per `+ <message>` line.
pub async fn parse_nikto(stdout: &str, registry: &Registry) {
    for line in stdout.lines() {
        let trimmed = line.trim();
        let Some(message) = trimmed.strip_prefix('+') else { continue };
        let message = message.trim();
        if message.is_empty() || message.starts_with("Target") || message.starts_with("Start") || message.starts_with("End") {
            continue;
        }
        let category = VulnCategory::from_keyword(message);
        let raw = RawFinding::new(category, Severity::Low, "/", "nikto", message)
            .with_source_strength(SourceStrength::Heuristic);
        registry.register(raw).await;
    }
}

trait WithCweIfPresent {
    fn with_cwe_if_present(self, template_id: &str) -> Self;
}

impl WithCweIfPresent for RawFinding {
    fn with_cwe_if_present(self, template_id: &str) -> Self {
        if let Some(idx) = template_id.to_lowercase().find("cve-") {
            self.with_cwe(template_id[idx..].to_uppercase())
        } else {
            self
        }
    }
}
