use serde::{Deserialize, Serialize};

use crate::config::ToolRegistration;
use crate::planner::phase::Phase;

/// Required capability a tool declares against the Discovery Cache /
/// Profile (spec §3 Execution Plan metadata, §4.4, §4.5 step 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    WebTarget,
    Https,
    LiveEndpoints,
    Reflections,
    Params,
    CommandParams,
    SsrfParams,
    Wordpress,
    TlsService,
}

/// The tool family drives the ledger's gate rule (spec §4.3 table). Kept
/// separate from `Capability` because some families gate on the Profile
/// alone (DNS, TLS) while others gate on the Cache (params, reflections).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolFamily {
    DnsComprehensive,
    DnsMinimal,
    SubdomainEnum,
    PortScan,
    WebFingerprint,
    TlsAnalyzer,
    DirectoryBrute,
    TemplateScanner,
    CmsSpecific,
    ParamInjection,
    ReflectionDependent,
    Ssrf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub phase: Phase,
    pub family: ToolFamily,
    pub command_template: &'static str,
    pub required_capabilities: &'static [Capability],
    pub priority: i32,
    pub timeout_secs: u64,
    pub blocking: bool,
}

/// The fixed tool catalogue. Every tool listed here receives exactly one
/// ledger decision (spec §4.3); `ledger::build_ledger` asserts this.
pub static TOOL_CATALOG: &[ToolDefinition] = &[
    ToolDefinition {
        name: "dnsrecon",
        phase: Phase::Dns,
        family: ToolFamily::DnsComprehensive,
        command_template: "dnsrecon -d {target} -t std",
        required_capabilities: &[],
        priority: 10,
        timeout_secs: 60,
        blocking: false,
    },
    ToolDefinition {
        name: "dig-aaaa",
        phase: Phase::Dns,
        family: ToolFamily::DnsMinimal,
        command_template: "dig {target} A AAAA +short",
        required_capabilities: &[],
        priority: 10,
        timeout_secs: 20,
        blocking: false,
    },
    ToolDefinition {
        name: "subfinder",
        phase: Phase::Subdomains,
        family: ToolFamily::SubdomainEnum,
        command_template: "subfinder -d {target} -silent",
        required_capabilities: &[],
        priority: 10,
        timeout_secs: 120,
        blocking: false,
    },
    ToolDefinition {
        name: "nmap",
        phase: Phase::Network,
        family: ToolFamily::PortScan,
        command_template: "nmap -sV -T4 {target}",
        required_capabilities: &[],
        priority: 10,
        timeout_secs: 300,
        blocking: false,
    },
    ToolDefinition {
        name: "naabu",
        phase: Phase::Network,
        family: ToolFamily::PortScan,
        command_template: "naabu -host {target} -silent",
        required_capabilities: &[],
        priority: 20,
        timeout_secs: 120,
        blocking: false,
    },
    ToolDefinition {
        name: "whatweb",
        phase: Phase::WebDetect,
        family: ToolFamily::WebFingerprint,
        command_template: "whatweb {target_url}",
        required_capabilities: &[Capability::WebTarget],
        priority: 10,
        timeout_secs: 60,
        blocking: false,
    },
    ToolDefinition {
        name: "httpx",
        phase: Phase::WebDetect,
        family: ToolFamily::WebFingerprint,
        command_template: "httpx -u {target_url} -silent -tech-detect",
        required_capabilities: &[Capability::WebTarget],
        priority: 20,
        timeout_secs: 60,
        blocking: false,
    },
    ToolDefinition {
        name: "sslscan",
        phase: Phase::Tls,
        family: ToolFamily::TlsAnalyzer,
        command_template: "sslscan {target}:443",
        required_capabilities: &[Capability::Https],
        priority: 10,
        timeout_secs: 60,
        blocking: false,
    },
    ToolDefinition {
        name: "testssl",
        phase: Phase::Tls,
        family: ToolFamily::TlsAnalyzer,
        command_template: "testssl.sh --quiet {target}:443",
        required_capabilities: &[Capability::Https],
        priority: 20,
        timeout_secs: 180,
        blocking: false,
    },
    ToolDefinition {
        name: "gobuster",
        phase: Phase::WebEnum,
        family: ToolFamily::DirectoryBrute,
        command_template: "gobuster dir -u {target_url} -w /usr/share/wordlists/dirb/common.txt",
        required_capabilities: &[Capability::WebTarget],
        priority: 10,
        timeout_secs: 300,
        blocking: false,
    },
    ToolDefinition {
        name: "dirsearch",
        phase: Phase::WebEnum,
        family: ToolFamily::DirectoryBrute,
        command_template: "dirsearch -u {target_url}",
        required_capabilities: &[Capability::WebTarget],
        priority: 20,
        timeout_secs: 300,
        blocking: false,
    },
    ToolDefinition {
        name: "wpscan",
        phase: Phase::WebEnum,
        family: ToolFamily::CmsSpecific,
        command_template: "wpscan --url {target_url}",
        required_capabilities: &[Capability::WebTarget, Capability::Wordpress],
        priority: 30,
        timeout_secs: 180,
        blocking: false,
    },
    ToolDefinition {
        name: "sqlmap",
        phase: Phase::Exploitation,
        family: ToolFamily::ParamInjection,
        command_template: "sqlmap -u {target_url} --batch --cookie='{cookie_string}'",
        required_capabilities: &[Capability::Params],
        priority: 10,
        timeout_secs: 600,
        blocking: false,
    },
    ToolDefinition {
        name: "commix",
        phase: Phase::Exploitation,
        family: ToolFamily::ParamInjection,
        command_template: "commix --url={target_url} --batch",
        required_capabilities: &[Capability::CommandParams],
        priority: 20,
        timeout_secs: 600,
        blocking: false,
    },
    ToolDefinition {
        name: "dalfox",
        phase: Phase::Exploitation,
        family: ToolFamily::ReflectionDependent,
        command_template: "dalfox url {target_url}",
        required_capabilities: &[Capability::Reflections],
        priority: 30,
        timeout_secs: 300,
        blocking: false,
    },
    ToolDefinition {
        name: "xsstrike",
        phase: Phase::Exploitation,
        family: ToolFamily::ReflectionDependent,
        command_template: "xsstrike -u {target_url}",
        required_capabilities: &[Capability::Reflections],
        priority: 40,
        timeout_secs: 300,
        blocking: false,
    },
    ToolDefinition {
        name: "ssrfmap",
        phase: Phase::Exploitation,
        family: ToolFamily::Ssrf,
        command_template: "ssrfmap -r {target_url}",
        required_capabilities: &[Capability::SsrfParams],
        priority: 50,
        timeout_secs: 300,
        blocking: false,
    },
    ToolDefinition {
        name: "nuclei",
        phase: Phase::Templates,
        family: ToolFamily::TemplateScanner,
        command_template: "nuclei -u {target_url} -silent",
        required_capabilities: &[Capability::WebTarget],
        priority: 10,
        timeout_secs: 600,
        blocking: false,
    },
    ToolDefinition {
        name: "nikto",
        phase: Phase::Templates,
        family: ToolFamily::TemplateScanner,
        command_template: "nikto -h {target_url}",
        required_capabilities: &[Capability::WebTarget],
        priority: 20,
        timeout_secs: 300,
        blocking: false,
    },
];

/// A catalogue entry sourced from the user's tool-registration file (spec
/// §6). Registered tools are treated as `TemplateScanner`-family (gated on
/// `web_target` alone) unless a future config schema revision says
/// otherwise — the closed gate-rule table in spec §4.3 has no family for
/// free-form user tools, so this is the least-surprising default.
pub fn from_registration(name: String, reg: &ToolRegistration) -> OwnedToolDefinition {
    OwnedToolDefinition {
        name,
        phase: Phase::WebEnum,
        family: ToolFamily::TemplateScanner,
        command_template: reg.command_template.clone(),
        required_capabilities: vec![Capability::WebTarget],
        priority: 100,
        timeout_secs: 120,
        blocking: false,
    }
}

/// Owned counterpart of `ToolDefinition` for catalogue entries that don't
/// come from the static `'static` table (i.e. user-registered tools).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedToolDefinition {
    pub name: String,
    pub phase: Phase,
    pub family: ToolFamily,
    pub command_template: String,
    pub required_capabilities: Vec<Capability>,
    pub priority: i32,
    pub timeout_secs: u64,
    pub blocking: bool,
}
