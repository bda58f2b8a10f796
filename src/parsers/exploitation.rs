use crate::findings::category::VulnCategory;
use crate::findings::scoring::SourceStrength;
use crate::findings::{RawFinding, Registry, Severity, SuccessIndicator};

/// `sqlmap -u <target_url> --batch` reports `Parameter: <name> (...)` followed
/// by a `Type: <technique>` line for each confirmed injection point.
pub async fn parse_sqlmap(stdout: &str, registry: &Registry) {
    let mut current_param: Option<String> = None;
    for line in stdout.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("Parameter:") {
            current_param = rest.split_whitespace().next().map(str::to_string);
            continue;
        }
        if let Some(technique) = trimmed.strip_prefix("Type:") {
            let Some(param) = current_param.clone() else { continue };
            let technique = technique.trim();
            let indicator = if technique.to_lowercase().contains("time") {
                SuccessIndicator::TimeDelayed
            } else {
                SuccessIndicator::ConfirmedExecuted
            };
            let raw = RawFinding::new(VulnCategory::Injection, Severity::Critical, "/", "sqlmap", format!("sqlmap technique: {technique}"))
                .with_parameter(param)
                .with_cwe("CWE-89")
                .with_success_indicator(indicator)
                .with_source_strength(SourceStrength::UrlParam);
            registry.register(raw).await;
        }
    }
}

/// `commix --url=<target_url> --batch` prints `(+) <param> parameter ...
/// injectable` on success.
pub async fn parse_commix(stdout: &str, registry: &Registry) {
    for line in stdout.lines() {
        let trimmed = line.trim();
        if !trimmed.to_lowercase().contains("injectable") {
            continue;
        }
        let param = trimmed.split_whitespace().nth(1).unwrap_or("unknown").to_string();
        let raw = RawFinding::new(VulnCategory::Injection, Severity::Critical, "/", "commix", trimmed)
            .with_parameter(param)
            .with_cwe("CWE-78")
            .with_success_indicator(SuccessIndicator::ConfirmedExecuted)
            .with_source_strength(SourceStrength::UrlParam);
        registry.register(raw).await;
    }
}

/// `dalfox url <target_url>` prints `[POC][G][GET] <url> - param: <name> -
/// payload: ...` per confirmed reflected payload.
pub async fn parse_dalfox(stdout: &str, registry: &Registry) {
    for line in stdout.lines() {
        if !line.contains("[POC]") {
            continue;
        }
        let param = line
            .split("param:")
            .nth(1)
            .and_then(|s| s.split('-').next())
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let raw = RawFinding::new(VulnCategory::Injection, Severity::High, "/", "dalfox", line)
            .with_parameter(param)
            .with_cwe("CWE-79")
            .with_success_indicator(SuccessIndicator::ConfirmedReflected)
            .with_source_strength(SourceStrength::UrlParam);
        registry.register(raw).await;
    }
}

/// `xsstrike -u <target_url>` prints `[!] Potential XSS found` on detection,
/// weaker confidence than dalfox's confirmed POC.
pub async fn parse_xsstrike(stdout: &str, registry: &Registry) {
    for line in stdout.lines() {
        let trimmed = line.trim();
        if trimmed.contains("Potential XSS") || trimmed.contains("Vulnerable webpage") {
            let raw = RawFinding::new(VulnCategory::Injection, Severity::Medium, "/", "xsstrike", trimmed)
                .with_cwe("CWE-79")
                .with_success_indicator(SuccessIndicator::PotentialVulnerability)
                .with_source_strength(SourceStrength::UrlParam);
            registry.register(raw).await;
        }
    }
}

/// `ssrfmap -r <target_url>` prints `[+] <module> exploit successful` per
/// confirmed SSRF module.
pub async fn parse_ssrfmap(stdout: &str, registry: &Registry) {
    for line in stdout.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("[+]") && trimmed.to_lowercase().contains("success") {
            let raw = RawFinding::new(VulnCategory::Ssrf, Severity::High, "/", "ssrfmap", trimmed)
                .with_cwe("CWE-918")
                .with_success_indicator(SuccessIndicator::ConfirmedExecuted)
                .with_source_strength(SourceStrength::UrlParam);
            registry.register(raw).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sqlmap_pairs_parameter_with_technique() {
        let registry = Registry::new(crate::findings::ScoringWeights::default());
        let stdout = "Parameter: id (GET)\n    Type: boolean-based blind\n    Title: AND boolean-based\n";
        parse_sqlmap(stdout, &registry).await;
        let findings = registry.finalize().await;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].parameter.as_deref(), Some("id"));
    }

    #[tokio::test]
    async fn dalfox_poc_line_is_confirmed_reflected() {
        let registry = Registry::new(crate::findings::ScoringWeights::default());
        parse_dalfox("[POC][G][GET] https://example.com/search?q=<script> - param: q - payload: <script>", &registry).await;
        let findings = registry.finalize().await;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].success_indicator, Some(SuccessIndicator::ConfirmedReflected));
    }

    #[tokio::test]
    async fn xsstrike_potential_is_lower_severity_than_dalfox() {
        let registry = Registry::new(crate::findings::ScoringWeights::default());
        parse_xsstrike("[!] Potential XSS found in parameter q", &registry).await;
        let findings = registry.finalize().await;
        assert_eq!(findings[0].severity, Severity::Medium);
    }
}
