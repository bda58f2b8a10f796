use crate::config::HeuristicConfig;

/// Case-insensitive classification of a parameter name against the
/// command-shaped / SSRF-shaped word-lists (spec §3, §4.2). A parameter may
/// belong to zero, one, or both semantic subsets.
pub struct ParamClassifier {
    command_words: Vec<String>,
    ssrf_words: Vec<String>,
}

impl ParamClassifier {
    pub fn new(config: &HeuristicConfig) -> Self {
        Self {
            command_words: config.command_params.iter().map(|s| s.to_lowercase()).collect(),
            ssrf_words: config.ssrf_params.iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    pub fn is_command_shaped(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.command_words.iter().any(|w| lower.contains(w.as_str()))
    }

    pub fn is_ssrf_shaped(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.ssrf_words.iter().any(|w| lower.contains(w.as_str()))
    }
}

impl Default for ParamClassifier {
    fn default() -> Self {
        Self::new(&HeuristicConfig::default())
    }
}
