use super::{entry_for, order, PlanEntry};
use crate::ledger::DecisionLedger;
use crate::profile::TargetProfile;

/// Execution planner for `SUBDOMAIN` targets. Uses the minimal A/AAAA DNS
/// lookup instead of the comprehensive root tool, and omits subdomain
/// enumeration entirely (spec §8 scenario 2). Deliberately duplicates the
/// shape of `planner::root_domain` rather than sharing a helper — the two
/// executors are allowed to diverge independently as the catalogue grows.
pub fn plan_subdomain(_profile: &TargetProfile, ledger: &DecisionLedger) -> Vec<PlanEntry> {
    let candidates = [
        "dig-aaaa",
        "nmap",
        "naabu",
        "whatweb",
        "httpx",
        "sslscan",
        "testssl",
        "gobuster",
        "dirsearch",
        "wpscan",
        "sqlmap",
        "commix",
        "dalfox",
        "xsstrike",
        "ssrfmap",
        "nuclei",
        "nikto",
    ];

    let entries: Vec<PlanEntry> = candidates
        .into_iter()
        .filter(|name| ledger.allows(name))
        .filter_map(entry_for)
        .collect();

    order(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::build_ledger;
    use crate::profile::{Scope, TargetType};

    fn subdomain_profile() -> TargetProfile {
        TargetProfile {
            original_input: "api.example.com".into(),
            target_type: TargetType::Subdomain,
            scope: Scope::SingleHost,
            host: "api.example.com".into(),
            scheme: "https".into(),
            port: None,
            base_domain: Some("example.com".into()),
            resolved_ips: Default::default(),
            reachable: true,
            https_capable: true,
            web_target: true,
            detected_cms: None,
            detected_tech: Default::default(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn plan_omits_subdomain_enumeration_and_comprehensive_dns() {
        let profile = subdomain_profile();
        let ledger = build_ledger(&profile);
        let plan = plan_subdomain(&profile, &ledger);
        assert!(!plan.iter().any(|e| e.tool_name == "subfinder"));
        assert!(!plan.iter().any(|e| e.tool_name == "dnsrecon"));
        assert!(plan.iter().any(|e| e.tool_name == "dig-aaaa"));
    }
}
