pub mod ip;
pub mod phase;
pub mod root_domain;
pub mod subdomain;

use serde::{Deserialize, Serialize};

use crate::catalog::Capability;
use crate::ledger::DecisionLedger;
use crate::profile::{TargetProfile, TargetType};
use phase::Phase;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanEntry {
    pub tool_name: String,
    pub phase: Phase,
    pub command_template: String,
    pub required_capabilities: Vec<Capability>,
    pub priority: i32,
}

/// Looks up a catalogue entry by name and turns it into a plan entry. Pure
/// data lookup, not policy — each target-type executor still decides, on
/// its own, which names to look up and in what order.
fn entry_for(name: &str) -> Option<PlanEntry> {
    crate::catalog::TOOL_CATALOG
        .iter()
        .find(|t| t.name == name)
        .map(|t| PlanEntry {
            tool_name: t.name.to_string(),
            phase: t.phase,
            command_template: t.command_template.to_string(),
            required_capabilities: t.required_capabilities.to_vec(),
            priority: t.priority,
        })
}

/// Dispatches to one of three target-type-specific executors, each with no
/// shared execution logic (spec §4.4, §9 — scope-mismatched reuse is an
/// `ArchitectureViolation`, not something this layer attempts to prevent by
/// sharing code).
pub fn plan(profile: &TargetProfile, ledger: &DecisionLedger) -> Vec<PlanEntry> {
    match profile.target_type {
        TargetType::RootDomain => root_domain::plan_root_domain(profile, ledger),
        TargetType::Subdomain => subdomain::plan_subdomain(profile, ledger),
        TargetType::Ip => ip::plan_ip(profile, ledger),
    }
}

/// Stable ordering: by phase (declared order), then priority, then
/// insertion order (a stable sort preserves insertion order among ties).
pub fn order(mut entries: Vec<PlanEntry>) -> Vec<PlanEntry> {
    entries.sort_by(|a, b| a.phase.cmp(&b.phase).then(a.priority.cmp(&b.priority)));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_lookup_finds_catalog_tool() {
        let entry = entry_for("nmap").unwrap();
        assert_eq!(entry.tool_name, "nmap");
    }

    #[test]
    fn unknown_tool_returns_none() {
        assert!(entry_for("no-such-tool").is_none());
    }
}
