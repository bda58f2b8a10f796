use super::{entry_for, order, PlanEntry};
use crate::ledger::DecisionLedger;
use crate::profile::TargetProfile;

/// Execution planner for `IP` targets. Omits every DNS-family tool
/// outright (an IP has no DNS-applicable phase at all, spec §8 scenario 3)
/// rather than relying solely on the ledger to deny them. No logic shared
/// with `planner::root_domain` / `planner::subdomain`.
pub fn plan_ip(_profile: &TargetProfile, ledger: &DecisionLedger) -> Vec<PlanEntry> {
    let candidates = [
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

    fn ip_profile() -> TargetProfile {
        TargetProfile {
            original_input: "192.0.2.10".into(),
            target_type: TargetType::Ip,
            scope: Scope::SingleHost,
            host: "192.0.2.10".into(),
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
        }
    }

    #[test]
    fn plan_never_includes_dns_tools() {
        let profile = ip_profile();
        let ledger = build_ledger(&profile);
        let plan = plan_ip(&profile, &ledger);
        assert!(!plan.iter().any(|e| e.tool_name.contains("dns") || e.tool_name == "subfinder" || e.tool_name == "dig-aaaa"));
    }

    #[test]
    fn plan_includes_port_scan_always() {
        let profile = ip_profile();
        let ledger = build_ledger(&profile);
        let plan = plan_ip(&profile, &ledger);
        assert!(plan.iter().any(|e| e.tool_name == "nmap"));
    }
}
