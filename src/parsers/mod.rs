pub mod dns;
pub mod exploitation;
pub mod network;
pub mod templates;
pub mod tls;
pub mod web;
pub mod webenum;

use crate::cache::DiscoveryCache;
use crate::findings::Registry;
use crate::profile::TargetProfile;

/// Parses one tool's captured stdout, writing discovered signals into the
/// cache and any vulnerability reports into the findings registry (spec
/// §4.5 step 8). Unknown tools (e.g. user-registered ones) are a no-op —
/// they surface only through their raw execution record, per spec §7's
/// `ParseFailure` policy of "finding omitted, stdout preserved, scan
/// continues" applied to the entire class of unparsed tools.
pub async fn parse(tool_name: &str, stdout: &str, cache: &DiscoveryCache, registry: &Registry, profile: &mut TargetProfile) {
    match tool_name {
        "dnsrecon" => dns::parse_dnsrecon(stdout, cache).await,
        "subfinder" => dns::parse_subfinder(stdout, cache).await,
        "nmap" => network::parse_nmap(stdout, cache).await,
        "naabu" => network::parse_naabu(stdout, cache).await,
        "whatweb" => web::parse_whatweb(stdout, cache, profile).await,
        "httpx" => web::parse_httpx(stdout, cache, profile).await,
        "sslscan" => tls::parse_sslscan(stdout, registry).await,
        "testssl" => tls::parse_testssl(stdout, registry).await,
        "gobuster" | "dirsearch" => webenum::parse_dir_brute(stdout, cache).await,
        "wpscan" => webenum::parse_wpscan(stdout, registry).await,
        "nuclei" => templates::parse_nuclei(stdout, registry).await,
        "nikto" => templates::parse_nikto(stdout, registry).await,
        "sqlmap" => exploitation::parse_sqlmap(stdout, registry).await,
        "commix" => exploitation::parse_commix(stdout, registry).await,
        "dalfox" => exploitation::parse_dalfox(stdout, registry).await,
        "xsstrike" => exploitation::parse_xsstrike(stdout, registry).await,
        "ssrfmap" => exploitation::parse_ssrfmap(stdout, registry).await,
        _ => {}
    }
}
