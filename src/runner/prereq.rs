use crate::cache::DiscoveryCache;
use crate::catalog::Capability;
use crate::planner::PlanEntry;
use crate::profile::TargetProfile;

/// Step 3 of spec §4.5: re-evaluates declared capabilities against the
/// *current* cache state, because signals accumulate during the scan.
/// Returns `true` when every required capability is satisfied.
pub async fn check(entry: &PlanEntry, profile: &TargetProfile, cache: &DiscoveryCache) -> bool {
    for capability in &entry.required_capabilities {
        let satisfied = match capability {
            Capability::WebTarget => profile.web_target,
            Capability::Https => profile.https_capable,
            Capability::LiveEndpoints => cache.has_live_endpoints().await,
            Capability::Reflections => cache.has_reflections().await,
            Capability::Params => cache.has_params().await,
            Capability::CommandParams => cache.has_command_params().await,
            Capability::SsrfParams => cache.has_ssrf_params().await,
            Capability::Wordpress => profile
                .detected_cms
                .as_deref()
                .map(|cms| cms.eq_ignore_ascii_case("wordpress"))
                .unwrap_or(false),
            Capability::TlsService => profile.https_capable,
        };
        if !satisfied {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::heuristics::ParamClassifier;
    use crate::planner::phase::Phase;
    use crate::profile::{Scope, TargetType};

    fn profile(web_target: bool) -> TargetProfile {
        TargetProfile {
            original_input: "x".into(),
            target_type: TargetType::RootDomain,
            scope: Scope::DomainTree,
            host: "x".into(),
            scheme: "https".into(),
            port: None,
            base_domain: None,
            resolved_ips: Default::default(),
            reachable: true,
            https_capable: false,
            web_target,
            detected_cms: None,
            detected_tech: Default::default(),
            created_at: chrono::Utc::now(),
        }
    }

    fn entry(caps: Vec<Capability>) -> PlanEntry {
        PlanEntry {
            tool_name: "sqlmap".into(),
            phase: Phase::Exploitation,
            command_template: "sqlmap -u {target_url}".into(),
            required_capabilities: caps,
            priority: 10,
        }
    }

    #[tokio::test]
    async fn missing_params_blocks_sqlmap() {
        let cache = DiscoveryCache::new(ParamClassifier::default());
        let ok = check(&entry(vec![Capability::Params]), &profile(true), &cache).await;
        assert!(!ok);
    }

    #[tokio::test]
    async fn present_params_unblocks_sqlmap() {
        let cache = DiscoveryCache::new(ParamClassifier::default());
        cache.add_param("id", "crawler").await;
        let ok = check(&entry(vec![Capability::Params]), &profile(true), &cache).await;
        assert!(ok);
    }

    #[tokio::test]
    async fn no_capabilities_always_passes() {
        let cache = DiscoveryCache::new(ParamClassifier::default());
        let ok = check(&entry(vec![]), &profile(false), &cache).await;
        assert!(ok);
    }

    #[tokio::test]
    async fn forms_alone_satisfy_reflections_capability() {
        let cache = DiscoveryCache::new(ParamClassifier::default());
        cache.mark_forms_present().await;
        let ok = check(&entry(vec![Capability::Reflections]), &profile(true), &cache).await;
        assert!(ok, "forms suffice for dalfox/xsstrike per spec §4.6, no canary reflection needed");
    }
}
