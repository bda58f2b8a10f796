pub mod heuristics;
pub mod normalize;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use heuristics::ParamClassifier;

/// Monotonic, append-only store of signals observed during a scan (spec
/// §3/§4.2). Shared, single-writer-many-readers: every mutating method
/// takes the write lock internally, so callers never race on who holds it.
#[derive(Clone)]
pub struct DiscoveryCache {
    inner: Arc<RwLock<CacheInner>>,
    classifier: Arc<ParamClassifier>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CacheInner {
    pub ports: BTreeSet<u16>,
    pub endpoints: BTreeSet<String>,
    pub live_endpoints: BTreeSet<String>,
    pub params: BTreeSet<String>,
    pub command_params: BTreeSet<String>,
    pub ssrf_params: BTreeSet<String>,
    pub reflections: BTreeSet<String>,
    pub subdomains: BTreeSet<String>,
    pub verified_subdomains: BTreeSet<String>,
    pub tech_hints: BTreeMap<String, Option<String>>,
    pub source_of: BTreeMap<String, String>,
    /// Set once the crawl observes at least one HTML form (spec §4.6:
    /// "forms suffice for dalfox/xsstrike" — the reflection-dependent
    /// family's prerequisite is reflections *or* forms, not reflections
    /// alone).
    pub forms_present: bool,
}

impl DiscoveryCache {
    pub fn new(classifier: ParamClassifier) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheInner::default())),
            classifier: Arc::new(classifier),
        }
    }

    fn record_source(inner: &mut CacheInner, key: &str, source: &str) {
        inner.source_of.entry(key.to_string()).or_insert_with(|| source.to_string());
    }

    pub async fn add_port(&self, port: u16, source: &str) {
        let mut inner = self.inner.write().await;
        inner.ports.insert(port);
        Self::record_source(&mut inner, &format!("port:{port}"), source);
    }

    /// Adds an endpoint. Identity is the normalized path; the query string
    /// (if present) is retained only implicitly via the caller's own record
    /// keeping — the cache's identity set is path-only per spec §4.2.
    pub async fn add_endpoint(&self, raw: &str, source: &str) -> String {
        let normalized = normalize::normalize_path(raw);
        let mut inner = self.inner.write().await;
        inner.endpoints.insert(normalized.clone());
        Self::record_source(&mut inner, &format!("endpoint:{normalized}"), source);
        normalized
    }

    /// Implies `add_endpoint`.
    pub async fn add_live_endpoint(&self, raw: &str, source: &str) -> String {
        let normalized = self.add_endpoint(raw, source).await;
        let mut inner = self.inner.write().await;
        inner.live_endpoints.insert(normalized.clone());
        normalized
    }

    pub async fn add_param(&self, name: &str, source: &str) {
        let mut inner = self.inner.write().await;
        inner.params.insert(name.to_string());
        if self.classifier.is_command_shaped(name) {
            inner.command_params.insert(name.to_string());
        }
        if self.classifier.is_ssrf_shaped(name) {
            inner.ssrf_params.insert(name.to_string());
        }
        Self::record_source(&mut inner, &format!("param:{name}"), source);
    }

    pub async fn add_reflection(&self, name: &str, source: &str) {
        let mut inner = self.inner.write().await;
        inner.reflections.insert(name.to_string());
        Self::record_source(&mut inner, &format!("reflection:{name}"), source);
    }

    /// Records that the crawl observed an HTML form. Idempotent: flips a
    /// monotone flag, never cleared.
    pub async fn mark_forms_present(&self) {
        let mut inner = self.inner.write().await;
        inner.forms_present = true;
    }

    pub async fn add_subdomain(&self, host: &str, source: &str) {
        let mut inner = self.inner.write().await;
        inner.subdomains.insert(host.to_string());
        Self::record_source(&mut inner, &format!("subdomain:{host}"), source);
    }

    pub async fn add_tech(&self, name: &str, version: Option<String>, source: &str) {
        let mut inner = self.inner.write().await;
        inner.tech_hints.insert(name.to_string(), version);
        Self::record_source(&mut inner, &format!("tech:{name}"), source);
    }

    /// Drops subdomains not resolvable via A/AAAA lookup into
    /// `verified_subdomains`. Never removes anything from `subdomains`
    /// itself — the cache is add-only.
    pub async fn verify_subdomains(&self) {
        let candidates: Vec<String> = {
            let inner = self.inner.read().await;
            inner.subdomains.iter().cloned().collect()
        };
        let mut verified = Vec::new();
        for host in candidates {
            let lookup = format!("{host}:0");
            if let Ok(Ok(mut addrs)) =
                tokio::time::timeout(Duration::from_secs(3), tokio::net::lookup_host(lookup)).await
            {
                if addrs.next().is_some() {
                    verified.push(host);
                }
            }
        }
        let mut inner = self.inner.write().await;
        for host in verified {
            inner.verified_subdomains.insert(host);
        }
    }

    pub async fn has_live_endpoints(&self) -> bool {
        !self.inner.read().await.live_endpoints.is_empty()
    }

    pub async fn has_params(&self) -> bool {
        !self.inner.read().await.params.is_empty()
    }

    pub async fn has_command_params(&self) -> bool {
        !self.inner.read().await.command_params.is_empty()
    }

    pub async fn has_ssrf_params(&self) -> bool {
        !self.inner.read().await.ssrf_params.is_empty()
    }

    /// Reflection-dependent tools gate on this: a confirmed reflected
    /// parameter, *or* a form observed during the crawl (spec §4.6).
    pub async fn has_reflections(&self) -> bool {
        let inner = self.inner.read().await;
        !inner.reflections.is_empty() || inner.forms_present
    }

    pub async fn ports(&self) -> BTreeSet<u16> {
        self.inner.read().await.ports.clone()
    }

    pub async fn port_open(&self, port: u16) -> bool {
        self.inner.read().await.ports.contains(&port)
    }

    pub async fn detected_cms_is(&self, cms: &str) -> bool {
        let inner = self.inner.read().await;
        inner
            .tech_hints
            .keys()
            .any(|k| k.eq_ignore_ascii_case(cms))
    }

    /// Snapshot for report emission; does not mutate the cache.
    pub async fn snapshot(&self) -> CacheInner {
        let inner = self.inner.read().await;
        CacheInner {
            ports: inner.ports.clone(),
            endpoints: inner.endpoints.clone(),
            live_endpoints: inner.live_endpoints.clone(),
            params: inner.params.clone(),
            command_params: inner.command_params.clone(),
            ssrf_params: inner.ssrf_params.clone(),
            reflections: inner.reflections.clone(),
            subdomains: inner.subdomains.clone(),
            verified_subdomains: inner.verified_subdomains.clone(),
            tech_hints: inner.tech_hints.clone(),
            source_of: inner.source_of.clone(),
            forms_present: inner.forms_present,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cache() -> DiscoveryCache {
        DiscoveryCache::new(ParamClassifier::default())
    }

    #[tokio::test]
    async fn insertions_are_idempotent() {
        let cache = make_cache();
        cache.add_port(80, "nmap").await;
        cache.add_port(80, "nmap").await;
        assert_eq!(cache.ports().await.len(), 1);
    }

    #[tokio::test]
    async fn add_endpoint_normalizes() {
        let cache = make_cache();
        cache.add_endpoint("//foo//bar/", "crawler").await;
        let snap = cache.snapshot().await;
        assert!(snap.endpoints.contains("/foo/bar"));
    }

    #[tokio::test]
    async fn live_endpoint_implies_endpoint() {
        let cache = make_cache();
        cache.add_live_endpoint("/login", "crawler").await;
        assert!(cache.has_live_endpoints().await);
        let snap = cache.snapshot().await;
        assert!(snap.endpoints.contains("/login"));
    }

    #[tokio::test]
    async fn param_classification_on_insert() {
        let cache = make_cache();
        cache.add_param("redirect_to", "crawler").await;
        assert!(cache.has_ssrf_params().await);
        assert!(!cache.has_command_params().await);
    }

    #[tokio::test]
    async fn no_element_is_ever_removed() {
        let cache = make_cache();
        cache.add_subdomain("nonexistent.invalid.example", "subfinder").await;
        cache.verify_subdomains().await;
        let snap = cache.snapshot().await;
        assert!(snap.subdomains.contains("nonexistent.invalid.example"));
        assert!(!snap.verified_subdomains.contains("nonexistent.invalid.example"));
    }
}
