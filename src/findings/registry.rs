use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::scoring::ScoringWeights;
use super::{CorrelationStatus, Finding, RawFinding, Severity, SuccessIndicator, EVIDENCE_CEILING};

type DedupKey = (crate::findings::category::VulnCategory, String, Option<String>);

/// Accumulator cell for one dedup key before `finalize()` runs scoring and
/// correlation (spec §4.7). Distinct from `Finding` because these fields
/// (the corroborating success indicators, the per-tool disconfirm flag)
/// only make sense pre-finalization.
#[derive(Debug, Clone)]
struct Accumulator {
    category: crate::findings::category::VulnCategory,
    severity: Severity,
    endpoint: String,
    parameter: Option<String>,
    evidence: String,
    tools: Vec<String>,
    owasp_category: String,
    cwe: Option<String>,
    success_indicators: Vec<SuccessIndicator>,
    source_strength: super::scoring::SourceStrength,
    disconfirmed: bool,
}

impl Accumulator {
    fn from_raw(raw: RawFinding) -> Self {
        Self {
            category: raw.category,
            severity: raw.severity,
            endpoint: raw.endpoint,
            parameter: raw.parameter,
            evidence: raw.evidence,
            tools: vec![raw.tool],
            owasp_category: raw.owasp_category,
            cwe: raw.cwe,
            success_indicators: raw.success_indicator.into_iter().collect(),
            source_strength: raw.source_strength,
            disconfirmed: false,
        }
    }

    fn merge(&mut self, raw: RawFinding) {
        if raw.severity < self.severity {
            self.severity = raw.severity;
        }
        if !self.tools.contains(&raw.tool) {
            self.tools.push(raw.tool);
        }
        if self.evidence.chars().count() < EVIDENCE_CEILING {
            let remaining = EVIDENCE_CEILING - self.evidence.chars().count();
            if !self.evidence.is_empty() && !raw.evidence.is_empty() {
                self.evidence.push_str(" | ");
            }
            self.evidence.extend(raw.evidence.chars().take(remaining));
        }
        if self.cwe.is_none() {
            self.cwe = raw.cwe;
        }
        if let Some(indicator) = raw.success_indicator {
            self.success_indicators.push(indicator);
        }
        // Stronger source strength wins.
        if source_rank(raw.source_strength) < source_rank(self.source_strength) {
            self.source_strength = raw.source_strength;
        }
    }

    /// Spec §9 nuclei Open Question: "may report the same vulnerability
    /// under many template IDs". The narrow `(category, endpoint)` dedup
    /// pass only applies when every contributing tool for a key is one of
    /// these template-driven scanners.
    fn is_template_driven(&self) -> bool {
        const TEMPLATE_DRIVEN_TOOLS: &[&str] = &["nuclei", "nikto"];
        self.tools.iter().all(|t| TEMPLATE_DRIVEN_TOOLS.contains(&t.as_str()))
    }
}

fn source_rank(s: super::scoring::SourceStrength) -> u8 {
    use super::scoring::SourceStrength::*;
    match s {
        Crawled => 0,
        Form => 1,
        UrlParam => 2,
        Heuristic => 3,
    }
}

/// Ingests per-tool raw findings and produces the deduplicated, scored
/// `Finding` list (spec §4.7). Shared, serialized behind a single lock held
/// only for the duration of `register`/`finalize` (spec §5). `Clone` is
/// cheap: it shares the same underlying accumulator map, same convention as
/// `DiscoveryCache`.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<Mutex<BTreeMap<DedupKey, Accumulator>>>,
    weights: ScoringWeights,
}

impl Registry {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BTreeMap::new())),
            weights,
        }
    }

    /// Accumulates a raw per-tool finding keyed by `(category, endpoint,
    /// parameter)`. On conflict: tool set accumulates, severity keeps the
    /// max (lowest rank), evidence unions up to the ceiling.
    pub async fn register(&self, raw: RawFinding) {
        let key = (raw.category, raw.endpoint.clone(), raw.parameter.clone());
        let mut inner = self.inner.lock().await;
        match inner.get_mut(&key) {
            Some(existing) => existing.merge(raw),
            None => {
                inner.insert(key, Accumulator::from_raw(raw));
            }
        }
    }

    /// Records an explicit disconfirmation from a tool that actively tested
    /// and refuted a previously-reported finding at this key (used for the
    /// `FALSE_POSITIVE` correlation status, spec §4.7 step 2).
    pub async fn disconfirm(&self, category: crate::findings::category::VulnCategory, endpoint: &str, parameter: Option<&str>) {
        let key = (category, endpoint.to_string(), parameter.map(|p| p.to_string()));
        let mut inner = self.inner.lock().await;
        if let Some(acc) = inner.get_mut(&key) {
            acc.disconfirmed = true;
        }
    }

    /// Runs the full §4.7 pipeline: primary dedup (already enforced by the
    /// accumulator map's key), a secondary narrow `(category, endpoint)`
    /// dedup scoped to template-driven scanners only (spec §4.7 step 1 /
    /// §9's nuclei Open Question — nuclei may report the same vulnerability
    /// under many template IDs at one endpoint), then correlation status
    /// and confidence scoring.
    ///
    /// Non-template findings skip the narrow pass entirely: two distinct
    /// tools reporting different parameters at the same category+endpoint
    /// (e.g. sqlmap SQLi on `id` vs. dalfox XSS on `q`, both tagged
    /// `Injection` at `/`) are different vulnerabilities, not template
    /// noise, and must not collapse into one.
    pub async fn finalize(&self) -> Vec<Finding> {
        let inner = self.inner.lock().await;
        let primary: Vec<&Accumulator> = inner.values().collect();

        let (template_driven, other): (Vec<&Accumulator>, Vec<&Accumulator>) =
            primary.into_iter().partition(|acc| acc.is_template_driven());

        let mut narrow: BTreeMap<(crate::findings::category::VulnCategory, String), &Accumulator> = BTreeMap::new();
        for acc in &template_driven {
            let key = (acc.category, acc.endpoint.clone());
            match narrow.get(&key) {
                Some(existing) if existing.severity <= acc.severity => {}
                _ => {
                    narrow.insert(key, acc);
                }
            }
        }

        narrow
            .into_values()
            .chain(other)
            .map(|acc| self.finalize_one(acc))
            .collect()
    }

    fn finalize_one(&self, acc: &Accumulator) -> Finding {
        let corroboration_count = acc.tools.len();
        let has_payload_success = acc.success_indicators.iter().any(|i| i.is_payload_success());

        let correlation_status = if acc.disconfirmed && corroboration_count >= 1 {
            CorrelationStatus::FalsePositive
        } else if has_payload_success {
            CorrelationStatus::Confirmed
        } else if corroboration_count >= 2 {
            CorrelationStatus::Corroborated
        } else {
            CorrelationStatus::SingleTool
        };

        let success_indicator = acc.success_indicators.first().copied();
        let confidence = self
            .weights
            .compute(&acc.tools, success_indicator, acc.source_strength);

        let id = Finding::compute_id(acc.category, &acc.endpoint, acc.parameter.as_deref(), acc.cwe.as_deref());

        Finding {
            id,
            category: acc.category,
            severity: acc.severity,
            endpoint: acc.endpoint.clone(),
            parameter: acc.parameter.clone(),
            evidence: acc.evidence.clone(),
            tools: acc.tools.clone(),
            owasp_category: acc.owasp_category.clone(),
            cwe: acc.cwe.clone(),
            confidence,
            confidence_label: super::ConfidenceLabel::from_score(confidence),
            corroboration_count,
            correlation_status,
            success_indicator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::category::VulnCategory;

    fn raw(tool: &str, endpoint: &str, severity: Severity) -> RawFinding {
        RawFinding::new(VulnCategory::Injection, severity, endpoint, tool, "evidence")
    }

    #[tokio::test]
    async fn dedup_reduces_finding_count() {
        let registry = Registry::new(ScoringWeights::default());
        registry.register(raw("sqlmap", "/login", Severity::High).with_parameter("id")).await;
        registry.register(raw("commix", "/login", Severity::Medium).with_parameter("id")).await;
        let findings = registry.finalize().await;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].tools.len(), 2);
    }

    #[tokio::test]
    async fn merge_keeps_max_severity() {
        let registry = Registry::new(ScoringWeights::default());
        registry.register(raw("sqlmap", "/login", Severity::Medium).with_parameter("id")).await;
        registry.register(raw("commix", "/login", Severity::Critical).with_parameter("id")).await;
        let findings = registry.finalize().await;
        assert_eq!(findings[0].severity, Severity::Critical);
    }

    #[tokio::test]
    async fn two_tools_are_corroborated() {
        let registry = Registry::new(ScoringWeights::default());
        registry.register(raw("sqlmap", "/login", Severity::High).with_parameter("id")).await;
        registry.register(raw("commix", "/login", Severity::High).with_parameter("id")).await;
        let findings = registry.finalize().await;
        assert_eq!(findings[0].correlation_status, CorrelationStatus::Corroborated);
    }

    #[tokio::test]
    async fn single_tool_is_single_tool() {
        let registry = Registry::new(ScoringWeights::default());
        registry.register(raw("dalfox", "/search", Severity::Medium).with_parameter("q")).await;
        let findings = registry.finalize().await;
        assert_eq!(findings[0].correlation_status, CorrelationStatus::SingleTool);
    }

    #[tokio::test]
    async fn payload_success_marks_confirmed() {
        let registry = Registry::new(ScoringWeights::default());
        registry
            .register(
                raw("dalfox", "/search", Severity::High)
                    .with_parameter("q")
                    .with_success_indicator(SuccessIndicator::ConfirmedReflected),
            )
            .await;
        let findings = registry.finalize().await;
        assert_eq!(findings[0].correlation_status, CorrelationStatus::Confirmed);
    }

    #[tokio::test]
    async fn narrow_dedup_collapses_template_variants() {
        let registry = Registry::new(ScoringWeights::default());
        registry.register(raw("nuclei", "/admin", Severity::Low)).await;
        registry
            .register(RawFinding::new(VulnCategory::Injection, Severity::High, "/admin", "nuclei", "ev2"))
            .await;
        let findings = registry.finalize().await;
        // Both raw findings share the (category, endpoint, parameter=None)
        // primary key already, so this also exercises the narrow pass
        // trivially; severity keeps the max via merge.
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[tokio::test]
    async fn narrow_dedup_does_not_collapse_distinct_non_template_findings() {
        let registry = Registry::new(ScoringWeights::default());
        registry
            .register(RawFinding::new(VulnCategory::Injection, Severity::High, "/", "sqlmap", "sqli on id").with_parameter("id"))
            .await;
        registry
            .register(RawFinding::new(VulnCategory::Injection, Severity::Medium, "/", "dalfox", "xss on q").with_parameter("q"))
            .await;
        let findings = registry.finalize().await;
        // Same category+endpoint, different parameters, neither tool is
        // template-driven: these are two distinct vulnerabilities and must
        // not be collapsed by the narrow (category, endpoint) pass.
        assert_eq!(findings.len(), 2);
    }

    #[tokio::test]
    async fn dedup_after_is_never_more_than_raw() {
        let registry = Registry::new(ScoringWeights::default());
        for i in 0..5 {
            registry
                .register(raw("nuclei", &format!("/path{i}"), Severity::Info))
                .await;
        }
        let findings = registry.finalize().await;
        assert!(findings.len() <= 5);
    }
}
