use super::{entry_for, order, PlanEntry};
use crate::ledger::DecisionLedger;
use crate::profile::TargetProfile;

/// Execution planner for `ROOT_DOMAIN` targets. Runs the comprehensive DNS
/// tool and subdomain enumeration (both root-only), then the shared
/// network/web/exploitation tooling. No logic is shared with
/// `planner::subdomain` or `planner::ip` — each executor owns its own
/// tool list and ordering decisions end to end (spec §4.4).
pub fn plan_root_domain(_profile: &TargetProfile, ledger: &DecisionLedger) -> Vec<PlanEntry> {
    let candidates = [
        "dnsrecon",
        "subfinder",
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

    fn root_profile() -> TargetProfile {
        TargetProfile {
            original_input: "example.com".into(),
            target_type: TargetType::RootDomain,
            scope: Scope::DomainTree,
            host: "example.com".into(),
            scheme: "https".into(),
            port: None,
            base_domain: None,
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
    fn plan_includes_comprehensive_dns_and_subdomain_enum() {
        let profile = root_profile();
        let ledger = build_ledger(&profile);
        let plan = plan_root_domain(&profile, &ledger);
        assert!(plan.iter().any(|e| e.tool_name == "dnsrecon"));
        assert!(plan.iter().any(|e| e.tool_name == "subfinder"));
        assert!(!plan.iter().any(|e| e.tool_name == "dig-aaaa"));
    }

    #[test]
    fn wpscan_blocked_without_cms_still_included_pending_prereq() {
        let profile = root_profile();
        let ledger = build_ledger(&profile);
        let plan = plan_root_domain(&profile, &ledger);
        // Ledger ALLOWs wpscan (web_target); the wordpress gate is a
        // runtime prerequisite, not a planning-time exclusion.
        assert!(plan.iter().any(|e| e.tool_name == "wpscan"));
    }
}
