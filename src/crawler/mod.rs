pub mod http_crawler;

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cache::DiscoveryCache;
use crate::profile::{TargetProfile, TargetType};

/// Where a parameter edge in the endpoint graph came from (spec §3 Endpoint
/// Graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParamProvenance {
    UrlQuery,
    Form,
    JsDetected,
    ApiSchema,
    Historic,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParamNode {
    pub reflectable: bool,
    pub injectable_sql: bool,
    pub injectable_cmd: bool,
    pub injectable_ssrf: bool,
    pub provenances: BTreeSet<ParamProvenance>,
}

/// Frozen graph of endpoints and parameters built by one crawl (spec §3,
/// §4.6). `run` builds it, then it is never mutated again.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointGraph {
    pub endpoints: BTreeSet<String>,
    /// endpoint -> (parameter -> node)
    pub params_by_endpoint: BTreeMap<String, BTreeMap<String, ParamNode>>,
    pub forms_present: bool,
    pub timed_out: bool,
}

impl EndpointGraph {
    pub fn reflectable_endpoints(&self) -> Vec<&str> {
        self.params_by_endpoint
            .iter()
            .filter(|(_, params)| params.values().any(|p| p.reflectable))
            .map(|(endpoint, _)| endpoint.as_str())
            .collect()
    }

    pub fn parametric_endpoints(&self) -> Vec<&str> {
        self.params_by_endpoint
            .iter()
            .filter(|(_, params)| !params.is_empty())
            .map(|(endpoint, _)| endpoint.as_str())
            .collect()
    }

    pub fn command_parametric_endpoints(&self) -> Vec<&str> {
        self.params_by_endpoint
            .iter()
            .filter(|(_, params)| params.values().any(|p| p.injectable_cmd))
            .map(|(endpoint, _)| endpoint.as_str())
            .collect()
    }

    /// Readiness-gate verdicts for payload tools (spec §4.6): computed once
    /// the graph is frozen.
    pub fn dalfox_ready(&self) -> bool {
        !self.reflectable_endpoints().is_empty() || self.forms_present
    }

    pub fn sqlmap_ready(&self) -> bool {
        !self.parametric_endpoints().is_empty()
    }

    pub fn commix_ready(&self) -> bool {
        !self.command_parametric_endpoints().is_empty()
    }
}

/// Interface-only collaborator for a JS-capable (full-DOM) crawler (spec §1:
/// "a lightweight HTTP crawler suffices; a stateful crawler is an optional
/// collaborator"). No bundled implementation ships in this engine.
#[async_trait]
pub trait JsCrawler: Send + Sync {
    async fn crawl(&self, target_url: &str) -> EndpointGraph;
}

/// Runs exactly one crawl between WebDetect and Exploitation (spec §4.6).
/// Primary: fast HTTP-only crawler, ≤15s wall-clock. Optional: a JS-capable
/// crawler for SUBDOMAIN/IP targets only (ROOT_DOMAIN skips it — "observed
/// to be too slow on large roots").
pub async fn run(profile: &TargetProfile, cache: &DiscoveryCache, js_crawler: Option<&dyn JsCrawler>) -> EndpointGraph {
    let target_url = profile.target_url();

    let primary = tokio::time::timeout(
        Duration::from_secs(15),
        http_crawler::crawl(&target_url, cache),
    )
    .await;

    let mut graph = match primary {
        Ok(graph) => graph,
        Err(_) => {
            warn!(target = %target_url, "crawl timed out; proceeding without gating");
            EndpointGraph {
                timed_out: true,
                ..Default::default()
            }
        }
    };

    if let Some(js) = js_crawler {
        if matches!(profile.target_type, TargetType::Subdomain | TargetType::Ip) {
            let js_graph = js.crawl(&target_url).await;
            if js_graph.forms_present {
                cache.mark_forms_present().await;
            }
            merge_graph(&mut graph, js_graph);
        } else {
            info!(target = %target_url, "skipping JS crawler on root domain");
        }
    }

    graph
}

fn merge_graph(into: &mut EndpointGraph, other: EndpointGraph) {
    into.endpoints.extend(other.endpoints);
    into.forms_present |= other.forms_present;
    for (endpoint, params) in other.params_by_endpoint {
        let entry = into.params_by_endpoint.entry(endpoint).or_default();
        for (name, node) in params {
            let slot = entry.entry(name).or_default();
            slot.reflectable |= node.reflectable;
            slot.injectable_sql |= node.injectable_sql;
            slot.injectable_cmd |= node.injectable_cmd;
            slot.injectable_ssrf |= node.injectable_ssrf;
            slot.provenances.extend(node.provenances);
        }
    }
}
