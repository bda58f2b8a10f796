use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use scraper::{Html, Selector};
use tracing::debug;

use crate::cache::DiscoveryCache;
use super::{EndpointGraph, ParamNode, ParamProvenance};

const REFLECTION_CANARY: &str = "scoutline_canary_7f3a";
const MAX_PROBED_PARAMS: usize = 8;

/// Fast HTTP-only crawl (spec §4.6 primary crawler): fetches the target
/// root page, extracts links/forms/query params, and probes a bounded set
/// of discovered parameters for verbatim reflection. No JS execution.
pub async fn crawl(target_url: &str, cache: &DiscoveryCache) -> EndpointGraph {
    let mut graph = EndpointGraph::default();

    let client = match reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .timeout(Duration::from_secs(10))
        .build()
    {
        Ok(c) => c,
        Err(_) => return graph,
    };

    let body = match client.get(target_url).send().await {
        Ok(resp) => resp.text().await.unwrap_or_default(),
        Err(e) => {
            debug!(error = %e, "crawl GET failed");
            return graph;
        }
    };

    let document = Html::parse_document(&body);

    record_endpoint(&mut graph, cache, "/", "crawler").await;

    if let Ok(link_selector) = Selector::parse("a[href]") {
        for el in document.select(&link_selector) {
            if let Some(href) = el.value().attr("href") {
                ingest_url(&mut graph, cache, href, ParamProvenance::UrlQuery).await;
            }
        }
    }

    if let Ok(form_selector) = Selector::parse("form") {
        for form in document.select(&form_selector) {
            graph.forms_present = true;
            cache.mark_forms_present().await;
            let action = form.value().attr("action").unwrap_or("/");
            let path = crate::cache::normalize::normalize_path(action);
            record_endpoint(&mut graph, cache, &path, "crawler").await;

            if let Ok(input_selector) = Selector::parse("input[name]") {
                for input in form.select(&input_selector) {
                    if let Some(name) = input.value().attr("name") {
                        record_param(&mut graph, cache, &path, name, ParamProvenance::Form).await;
                    }
                }
            }
        }
    }

    if let Ok(script_selector) = Selector::parse("script") {
        for script in document.select(&script_selector) {
            let text = script.text().collect::<String>();
            for captured in extract_js_params(&text) {
                record_param(&mut graph, cache, "/", &captured, ParamProvenance::JsDetected).await;
            }
        }
    }

    probe_reflections(&client, target_url, &mut graph, cache).await;

    graph
}

async fn ingest_url(graph: &mut EndpointGraph, cache: &DiscoveryCache, raw: &str, provenance: ParamProvenance) {
    if raw.starts_with('#') || raw.starts_with("javascript:") || raw.starts_with("mailto:") {
        return;
    }
    let (path_part, query) = crate::cache::normalize::split_query(raw);
    let path = crate::cache::normalize::normalize_path(&path_part);
    record_endpoint(graph, cache, &path, "crawler").await;

    if let Some(query) = query {
        for pair in query.split('&') {
            if let Some((name, _)) = pair.split_once('=') {
                if !name.is_empty() {
                    record_param(graph, cache, &path, name, provenance).await;
                }
            }
        }
    }
}

async fn record_endpoint(graph: &mut EndpointGraph, cache: &DiscoveryCache, path: &str, source: &str) {
    let normalized = cache.add_live_endpoint(path, source).await;
    graph.endpoints.insert(normalized);
}

async fn record_param(graph: &mut EndpointGraph, cache: &DiscoveryCache, endpoint: &str, name: &str, provenance: ParamProvenance) {
    cache.add_param(name, "crawler").await;
    let node = graph
        .params_by_endpoint
        .entry(endpoint.to_string())
        .or_default()
        .entry(name.to_string())
        .or_insert_with(ParamNode::default);
    node.provenances.insert(provenance);
}

/// Extracts `fetch('/api?x=')`/`data-param="x"`-style identifiers from
/// inline script text. Deliberately shallow — a full JS-execution crawler
/// is an optional collaborator (spec §4.6), not this engine's job.
fn extract_js_params(script: &str) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    if let Ok(re) = regex::Regex::new(r#"[?&]([a-zA-Z_][a-zA-Z0-9_]{1,30})="#) {
        for cap in re.captures_iter(script) {
            found.insert(cap[1].to_string());
        }
    }
    found
}

/// Probes a bounded set of discovered parameters for verbatim reflection by
/// appending a canary value to the query string and checking the response
/// body. Bounded by `MAX_PROBED_PARAMS` so a parameter-heavy target can't
/// blow past the crawl's own wall-clock budget.
async fn probe_reflections(client: &reqwest::Client, target_url: &str, graph: &mut EndpointGraph, cache: &DiscoveryCache) {
    let candidates: Vec<(String, String)> = graph
        .params_by_endpoint
        .iter()
        .flat_map(|(endpoint, params)| params.keys().map(move |p| (endpoint.clone(), p.clone())))
        .take(MAX_PROBED_PARAMS)
        .collect();

    for (endpoint, param) in candidates {
        let probe_url = format!("{target_url}{endpoint}?{param}={REFLECTION_CANARY}");
        let reflected = match client.get(&probe_url).send().await {
            Ok(resp) => resp.text().await.map(|body| body.contains(REFLECTION_CANARY)).unwrap_or(false),
            Err(_) => false,
        };
        if reflected {
            cache.add_reflection(&param, "crawler").await;
            if let Some(node) = graph.params_by_endpoint.get_mut(&endpoint).and_then(|p| p.get_mut(&param)) {
                node.reflectable = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_js_query_params() {
        let script = r#"fetch('/api/search?term=' + q); axios.get('/x?redirect=' + r);"#;
        let found = extract_js_params(script);
        assert!(found.contains("term"));
        assert!(found.contains("redirect"));
    }

    #[test]
    fn ignores_script_with_no_params() {
        let found = extract_js_params("console.log('hello world')");
        assert!(found.is_empty());
    }
}
