pub mod rules;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::TOOL_CATALOG;
use crate::errors::EngineError;
use crate::profile::TargetProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Allow,
    Deny,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDecision {
    pub decision: Decision,
    pub reason: String,
    pub priority: i32,
    pub timeout_secs: u64,
    pub blocking: bool,
}

/// Table of per-tool ALLOW/DENY decisions (spec §3/§4.3). Built once from
/// the Profile, frozen immediately after. A tool absent from the ledger is
/// an architecture violation — `runner` refuses to execute it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionLedger {
    decisions: BTreeMap<String, ToolDecision>,
    #[serde(skip)]
    frozen: bool,
}

impl DecisionLedger {
    fn new() -> Self {
        Self {
            decisions: BTreeMap::new(),
            frozen: false,
        }
    }

    fn add_decision(&mut self, tool: &str, decision: ToolDecision) -> Result<(), EngineError> {
        if self.frozen {
            return Err(EngineError::ArchitectureViolation(format!(
                "attempted to add decision for {tool} after ledger freeze"
            )));
        }
        self.decisions.insert(tool.to_string(), decision);
        Ok(())
    }

    fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn allows(&self, tool: &str) -> bool {
        matches!(
            self.decisions.get(tool).map(|d| d.decision),
            Some(Decision::Allow)
        )
    }

    pub fn denies(&self, tool: &str) -> bool {
        !self.allows(tool)
    }

    pub fn reason(&self, tool: &str) -> Option<&str> {
        self.decisions.get(tool).map(|d| d.reason.as_str())
    }

    pub fn timeout(&self, tool: &str) -> Option<u64> {
        self.decisions.get(tool).map(|d| d.timeout_secs)
    }

    pub fn priority(&self, tool: &str) -> Option<i32> {
        self.decisions.get(tool).map(|d| d.priority)
    }

    pub fn contains(&self, tool: &str) -> bool {
        self.decisions.contains_key(tool)
    }

    pub fn decisions(&self) -> &BTreeMap<String, ToolDecision> {
        &self.decisions
    }
}

/// Pure function of the Profile; does not consult the Discovery Cache.
/// Cache-dependent gates (params, reflections, SSRF params, detected CMS)
/// are expressed instead as required capabilities the runner re-checks at
/// dispatch time (spec §4.4's "runner re-checks them at dispatch time
/// against current cache state").
pub fn build_ledger(profile: &TargetProfile) -> DecisionLedger {
    let mut ledger = DecisionLedger::new();

    for tool in TOOL_CATALOG {
        let decision = rules::decide(tool.family, profile);
        ledger
            .add_decision(
                tool.name,
                ToolDecision {
                    decision: decision.0,
                    reason: decision.1,
                    priority: tool.priority,
                    timeout_secs: tool.timeout_secs,
                    blocking: tool.blocking,
                },
            )
            .expect("ledger not yet frozen during build");
    }

    ledger.freeze();

    debug_assert!(
        TOOL_CATALOG.iter().all(|t| ledger.contains(t.name)),
        "every catalogue tool must receive exactly one decision"
    );

    ledger
}
