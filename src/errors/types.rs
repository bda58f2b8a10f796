use thiserror::Error;

/// The closed error taxonomy for the scan engine. Every terminal path in the
/// engine resolves to exactly one of these variants.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("target unreachable: {0}")]
    TargetUnreachable(String),

    #[error("architecture violation: {0}")]
    ArchitectureViolation(String),

    #[error("tool not installed: {0}")]
    ToolNotInstalled(String),

    #[error("tool timed out: {0}")]
    ToolTimeout(String),

    #[error("tool argument error: {0}")]
    ToolArgumentError(String),

    #[error("parse failure: {0}")]
    ParseFailure(String),

    #[error("budget exhausted: {0}")]
    BudgetExhausted(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("internal error: {0}")]
    Internal(String),
}
