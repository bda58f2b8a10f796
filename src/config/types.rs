use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level user-supplied configuration file. Every field is optional; a
/// scan with no config file at all runs with the documented defaults.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ScoutlineConfig {
    pub scan: Option<ScanConfig>,
    pub credentials: Option<CredentialConfig>,
    pub heuristics: Option<HeuristicConfig>,
    pub scoring: Option<ScoringConfig>,
    pub tools: Option<HashMap<String, ToolRegistration>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ScanConfig {
    pub runtime_budget_secs: Option<u64>,
    pub workers: Option<usize>,
    pub skip_install: Option<bool>,
    pub intensity: Option<Intensity>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Quick,
    #[default]
    Standard,
    Thorough,
}

impl Intensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Standard => "standard",
            Self::Thorough => "thorough",
        }
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single credential set, passed through to tools/crawler as a cookie jar.
/// Spec §1 Non-goals bound authenticated scanning to exactly this shape.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CredentialConfig {
    pub cookie_string: Option<String>,
    pub cookie_file: Option<String>,
}

/// The heuristic parameter-category word-lists, exposed as configuration per
/// the open question in spec §9: the source never specifies how these are
/// versioned, so this engine treats them as user-overridable data rather
/// than baking them into the binary.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HeuristicConfig {
    pub command_params: Vec<String>,
    pub ssrf_params: Vec<String>,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            command_params: [
                "cmd", "exec", "shell", "ping", "host", "ip", "target", "path",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            ssrf_params: [
                "url", "uri", "redirect", "callback", "dest", "forward", "target",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Confidence-scoring weights (spec §4.7). The source carries two
/// conflicting weighting schemes; this engine fixes one and exposes it as
/// configuration rather than hard-coding it, per the spec's open question.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScoringConfig {
    pub tool_reliability: HashMap<String, f64>,
    pub corroboration_bonus_two: f64,
    pub corroboration_bonus_three_plus: f64,
    pub payload_confirmed: f64,
    pub payload_potential: f64,
    pub payload_configuration_issue: f64,
    pub source_crawled: f64,
    pub source_form: f64,
    pub source_url_param: f64,
    pub source_heuristic: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let mut tool_reliability = HashMap::new();
        tool_reliability.insert("sqlmap".to_string(), 0.95);
        tool_reliability.insert("dalfox".to_string(), 0.85);
        tool_reliability.insert("xsstrike".to_string(), 0.80);
        tool_reliability.insert("nuclei".to_string(), 0.85);
        tool_reliability.insert("gobuster".to_string(), 0.70);
        tool_reliability.insert("dirsearch".to_string(), 0.70);
        tool_reliability.insert("nikto".to_string(), 0.65);
        tool_reliability.insert("commix".to_string(), 0.85);
        tool_reliability.insert("wpscan".to_string(), 0.80);
        Self {
            tool_reliability,
            corroboration_bonus_two: 0.2,
            corroboration_bonus_three_plus: 0.15,
            payload_confirmed: 1.0,
            payload_potential: 0.5,
            payload_configuration_issue: 0.4,
            source_crawled: 0.9,
            source_form: 0.85,
            source_url_param: 0.75,
            source_heuristic: 0.5,
        }
    }
}

/// User-supplied tool-registration entry (spec §6): lets an operator add a
/// tool to the catalogue without recompiling the engine.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolRegistration {
    pub command_template: String,
    pub install_hint: Option<String>,
    pub verify_command: Option<String>,
    pub category: String,
}
