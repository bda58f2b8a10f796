pub mod category;
pub mod registry;
pub mod scoring;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub use category::VulnCategory;
pub use registry::Registry;
pub use scoring::ScoringWeights;

/// Severity ladder (spec §3 Finding). Ord is derived in declared order, so
/// `Severity::Critical < Severity::Info` — useful for "keep max severity"
/// merges during dedup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

/// How strongly this finding has been corroborated (spec §4.7 step 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CorrelationStatus {
    SingleTool,
    Corroborated,
    Confirmed,
    FalsePositive,
}

/// Confidence label bucket (spec §4.7 step 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLabel {
    Low,
    Medium,
    High,
}

impl ConfidenceLabel {
    pub fn from_score(score: f64) -> Self {
        if score < 0.34 {
            ConfidenceLabel::Low
        } else if score < 0.67 {
            ConfidenceLabel::Medium
        } else {
            ConfidenceLabel::High
        }
    }
}

/// The closed `success_indicator` vocabulary (spec §3/§9). Any marker a
/// tool's parser produces outside this set is mapped to `PotentialVulnerability`,
/// per the Open Question's explicit resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessIndicator {
    ConfirmedReflected,
    ConfirmedExecuted,
    TimeDelayed,
    PotentialVulnerability,
    ConfigurationIssue,
}

impl SuccessIndicator {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "confirmed_reflected" => Self::ConfirmedReflected,
            "confirmed_executed" => Self::ConfirmedExecuted,
            "time_delayed" => Self::TimeDelayed,
            "configuration_issue" => Self::ConfigurationIssue,
            _ => Self::PotentialVulnerability,
        }
    }

    pub fn is_payload_success(&self) -> bool {
        matches!(
            self,
            Self::ConfirmedReflected | Self::ConfirmedExecuted | Self::TimeDelayed
        )
    }
}

/// Maximum evidence length before truncation (spec §3: "evidence (≤500 chars)").
pub const EVIDENCE_CEILING: usize = 500;

fn clamp_evidence(evidence: &str) -> String {
    if evidence.chars().count() <= EVIDENCE_CEILING {
        evidence.to_string()
    } else {
        evidence.chars().take(EVIDENCE_CEILING).collect()
    }
}

/// A single deduplicated, risk-scored finding (spec §3). `id` is a stable
/// hash of `(category, endpoint, parameter, cwe)` — spec.md names this
/// requirement but gives no construction recipe, so this crate resolves it
/// with a SHA-256 digest of the tuple, truncated to a 16-hex-char id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub category: VulnCategory,
    pub severity: Severity,
    pub endpoint: String,
    pub parameter: Option<String>,
    pub evidence: String,
    pub tools: Vec<String>,
    pub owasp_category: String,
    pub cwe: Option<String>,
    pub confidence: f64,
    pub confidence_label: ConfidenceLabel,
    pub corroboration_count: usize,
    pub correlation_status: CorrelationStatus,
    pub success_indicator: Option<SuccessIndicator>,
}

impl Finding {
    pub fn compute_id(category: VulnCategory, endpoint: &str, parameter: Option<&str>, cwe: Option<&str>) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("{category:?}"));
        hasher.update(b"|");
        hasher.update(endpoint.as_bytes());
        hasher.update(b"|");
        hasher.update(parameter.unwrap_or("").as_bytes());
        hasher.update(b"|");
        hasher.update(cwe.unwrap_or("").as_bytes());
        let digest = hasher.finalize();
        digest.iter().take(8).map(|b| format!("{b:02x}")).collect()
    }

    /// Dedup key used by the primary pass (spec §4.7 step 1): `(category,
    /// endpoint, parameter)`. Note `cwe` is part of the stable `id` but not
    /// the dedup key — two tools can disagree on CWE for the same finding.
    pub fn dedup_key(&self) -> (VulnCategory, String, Option<String>) {
        (self.category, self.endpoint.clone(), self.parameter.clone())
    }

    /// Secondary, narrower nuclei-style dedup key (spec §4.7 step 1 /
    /// §9 Open Question): `(category, endpoint)`.
    pub fn narrow_key(&self) -> (VulnCategory, String) {
        (self.category, self.endpoint.clone())
    }
}

/// Raw finding as reported by a single tool's parser, before registry
/// merge/dedup/scoring. Distinct from `Finding` because a raw report has
/// exactly one tool and no correlation/confidence data yet.
#[derive(Debug, Clone)]
pub struct RawFinding {
    pub category: VulnCategory,
    pub severity: Severity,
    pub endpoint: String,
    pub parameter: Option<String>,
    pub evidence: String,
    pub tool: String,
    pub owasp_category: String,
    pub cwe: Option<String>,
    pub success_indicator: Option<SuccessIndicator>,
    pub source_strength: scoring::SourceStrength,
}

impl RawFinding {
    pub fn new(
        category: VulnCategory,
        severity: Severity,
        endpoint: impl Into<String>,
        tool: impl Into<String>,
        evidence: impl Into<String>,
    ) -> Self {
        let category_owned = category;
        Self {
            owasp_category: category_owned.owasp_category().to_string(),
            category,
            severity,
            endpoint: endpoint.into(),
            parameter: None,
            evidence: clamp_evidence(&evidence.into()),
            tool: tool.into(),
            cwe: None,
            success_indicator: None,
            source_strength: scoring::SourceStrength::Heuristic,
        }
    }

    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = Some(parameter.into());
        self
    }

    pub fn with_cwe(mut self, cwe: impl Into<String>) -> Self {
        self.cwe = Some(cwe.into());
        self
    }

    pub fn with_success_indicator(mut self, indicator: SuccessIndicator) -> Self {
        self.success_indicator = Some(indicator);
        self
    }

    pub fn with_source_strength(mut self, strength: scoring::SourceStrength) -> Self {
        self.source_strength = strength;
        self
    }
}
