use super::Decision;
use crate::catalog::ToolFamily;
use crate::profile::{TargetProfile, TargetType};

/// Gate rules from spec §4.3. Cache-dependent families (param injection,
/// reflection-dependent, SSRF, CMS-specific) are tentatively ALLOWed here —
/// their actual gating happens as a capability prerequisite the runner
/// checks against live cache state (spec §8 scenario 6: these come back
/// `BLOCKED(prereq_missing)`, not `BLOCKED(policy_denied)`, when the crawl
/// finds nothing).
pub fn decide(family: ToolFamily, profile: &TargetProfile) -> (Decision, String) {
    match family {
        ToolFamily::DnsComprehensive => {
            if profile.target_type == TargetType::RootDomain {
                (Decision::Allow, String::new())
            } else {
                (
                    Decision::Deny,
                    format!("DNS not applicable to {:?}", profile.target_type),
                )
            }
        }
        ToolFamily::DnsMinimal => {
            if matches!(profile.target_type, TargetType::RootDomain | TargetType::Subdomain) {
                (Decision::Allow, String::new())
            } else {
                (Decision::Deny, "DNS not applicable to IP".to_string())
            }
        }
        ToolFamily::SubdomainEnum => {
            if profile.target_type == TargetType::RootDomain {
                (Decision::Allow, String::new())
            } else {
                (Decision::Deny, "subdomain enum only on root".to_string())
            }
        }
        ToolFamily::PortScan => (Decision::Allow, String::new()),
        ToolFamily::WebFingerprint | ToolFamily::DirectoryBrute | ToolFamily::TemplateScanner => {
            if profile.web_target {
                (Decision::Allow, String::new())
            } else {
                (Decision::Deny, "not a web target".to_string())
            }
        }
        ToolFamily::TlsAnalyzer => {
            if profile.https_capable {
                (Decision::Allow, String::new())
            } else {
                (Decision::Deny, "no https service".to_string())
            }
        }
        ToolFamily::CmsSpecific => {
            if profile.web_target {
                (Decision::Allow, String::new())
            } else {
                (Decision::Deny, "not a web target".to_string())
            }
        }
        ToolFamily::ParamInjection | ToolFamily::ReflectionDependent | ToolFamily::Ssrf => {
            (Decision::Allow, String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(target_type: TargetType, web_target: bool, https_capable: bool) -> TargetProfile {
        TargetProfile {
            original_input: "x".into(),
            target_type,
            scope: crate::profile::Scope::SingleHost,
            host: "x".into(),
            scheme: "https".into(),
            port: None,
            base_domain: None,
            resolved_ips: Default::default(),
            reachable: true,
            https_capable,
            web_target,
            detected_cms: None,
            detected_tech: Default::default(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn whatweb_failure_does_not_gate_nuclei() {
        // Both families gate on web_target alone, independently.
        let p = profile(TargetType::RootDomain, true, false);
        let (whatweb, _) = decide(ToolFamily::WebFingerprint, &p);
        let (nuclei, _) = decide(ToolFamily::TemplateScanner, &p);
        assert_eq!(whatweb, Decision::Allow);
        assert_eq!(nuclei, Decision::Allow);
    }

    #[test]
    fn tls_denied_without_https() {
        let p = profile(TargetType::RootDomain, true, false);
        let (decision, reason) = decide(ToolFamily::TlsAnalyzer, &p);
        assert_eq!(decision, Decision::Deny);
        assert!(reason.contains("https"));
    }
}
