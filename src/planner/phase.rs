use serde::{Deserialize, Serialize};

/// The fixed phase order (spec §2, §4.4). Phases execute strictly in this
/// order; phase boundaries are synchronisation points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Dns,
    Subdomains,
    Network,
    WebDetect,
    Tls,
    Crawl,
    WebEnum,
    Exploitation,
    Templates,
}

impl Phase {
    pub const ALL: [Phase; 9] = [
        Phase::Dns,
        Phase::Subdomains,
        Phase::Network,
        Phase::WebDetect,
        Phase::Tls,
        Phase::Crawl,
        Phase::WebEnum,
        Phase::Exploitation,
        Phase::Templates,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::Dns => "DNS",
            Phase::Subdomains => "Subdomains",
            Phase::Network => "Network",
            Phase::WebDetect => "Web Detection",
            Phase::Tls => "TLS",
            Phase::Crawl => "Crawl",
            Phase::WebEnum => "Web Enumeration",
            Phase::Exploitation => "Exploitation",
            Phase::Templates => "Templates",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
