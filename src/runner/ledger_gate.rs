use crate::ledger::DecisionLedger;

/// Step 2 of spec §4.5: a tool the ledger denies is `BLOCKED(policy_denied)`
/// before any further work happens. Kept as its own module (rather than
/// inlined in `run`) so the single-concern split the spec calls for is
/// visible in the module layout, not just in a chain of `if` statements.
pub fn check(tool_name: &str, ledger: &DecisionLedger) -> bool {
    ledger.allows(tool_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::build_ledger;
    use crate::profile::{Scope, TargetProfile, TargetType};

    #[test]
    fn denied_tool_fails_gate() {
        let profile = TargetProfile {
            original_input: "192.0.2.1".into(),
            target_type: TargetType::Ip,
            scope: Scope::SingleHost,
            host: "192.0.2.1".into(),
            scheme: "https".into(),
            port: None,
            base_domain: None,
            resolved_ips: Default::default(),
            reachable: true,
            https_capable: false,
            web_target: false,
            detected_cms: None,
            detected_tech: Default::default(),
            created_at: chrono::Utc::now(),
        };
        let ledger = build_ledger(&profile);
        assert!(!check("dnsrecon", &ledger));
    }
}
