use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use super::SuccessIndicator;

/// Strength of the signal source that produced a parameter/endpoint (spec
/// §4.7 step 3: "source strength (crawled 0.9 > form 0.85 > URL-param 0.75
/// > heuristic 0.5)").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStrength {
    Crawled,
    Form,
    UrlParam,
    Heuristic,
}

/// Confidence-scoring weights (spec §4.7), loaded from `ScoringConfig` with
/// the documented defaults when no config file overrides them.
#[derive(Debug, Clone)]
pub struct ScoringWeights {
    config: ScoringConfig,
}

impl ScoringWeights {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    fn tool_reliability(&self, tool: &str) -> f64 {
        self.config
            .tool_reliability
            .get(tool)
            .copied()
            .unwrap_or(0.5)
    }

    fn corroboration_bonus(&self, tool_count: usize) -> f64 {
        match tool_count {
            0 | 1 => 0.0,
            2 => self.config.corroboration_bonus_two,
            _ => self.config.corroboration_bonus_three_plus,
        }
    }

    fn payload_weight(&self, indicator: Option<SuccessIndicator>) -> f64 {
        match indicator {
            Some(i) if i.is_payload_success() => self.config.payload_confirmed,
            Some(SuccessIndicator::ConfigurationIssue) => self.config.payload_configuration_issue,
            Some(SuccessIndicator::PotentialVulnerability) => self.config.payload_potential,
            None => self.config.payload_potential,
        }
    }

    fn source_weight(&self, strength: SourceStrength) -> f64 {
        match strength {
            SourceStrength::Crawled => self.config.source_crawled,
            SourceStrength::Form => self.config.source_form,
            SourceStrength::UrlParam => self.config.source_url_param,
            SourceStrength::Heuristic => self.config.source_heuristic,
        }
    }

    /// Weighted sum of the four components named in spec §4.7 step 3,
    /// capped at 1.0. `tools` is the finding's corroborating tool set; the
    /// reliability term uses the single most-reliable reporter, since a
    /// weak tool corroborating a strong one shouldn't drag the base down.
    pub fn compute(
        &self,
        tools: &[String],
        success_indicator: Option<SuccessIndicator>,
        source_strength: SourceStrength,
    ) -> f64 {
        let reliability = tools
            .iter()
            .map(|t| self.tool_reliability(t))
            .fold(0.0_f64, f64::max);
        let corroboration = self.corroboration_bonus(tools.len());
        let payload = self.payload_weight(success_indicator);
        let source = self.source_weight(source_strength);

        let score = (reliability + corroboration) * 0.5 + payload * 0.3 + source * 0.2;
        score.min(1.0).max(0.0)
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_in_unit_interval() {
        let weights = ScoringWeights::default();
        let score = weights.compute(
            &["sqlmap".to_string()],
            Some(SuccessIndicator::ConfirmedExecuted),
            SourceStrength::Crawled,
        );
        assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn corroboration_raises_confidence() {
        let weights = ScoringWeights::default();
        let solo = weights.compute(&["gobuster".to_string()], None, SourceStrength::Heuristic);
        let corroborated = weights.compute(
            &["gobuster".to_string(), "dirsearch".to_string()],
            None,
            SourceStrength::Heuristic,
        );
        assert!(corroborated > solo);
    }

    #[test]
    fn unknown_tool_uses_default_reliability() {
        let weights = ScoringWeights::default();
        let score = weights.compute(&["totally-unknown-tool".to_string()], None, SourceStrength::Heuristic);
        assert!(score > 0.0);
    }
}
