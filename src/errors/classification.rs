use super::types::EngineError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub retryable: bool,
}

impl EngineError {
    /// Classify this error to determine whether the scheduler may retry the
    /// operation that produced it. Only `ToolTimeout` is retried by policy
    /// (see `runner::retry`); everything else here is informational/logging
    /// support for the ambient error path.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            EngineError::ToolTimeout(_) => ErrorClassification {
                error_type: "ToolTimeout",
                retryable: true,
            },
            EngineError::TargetUnreachable(_) => ErrorClassification {
                error_type: "TargetUnreachable",
                retryable: true,
            },
            EngineError::Http(_) => ErrorClassification {
                error_type: "Http",
                retryable: true,
            },
            EngineError::Io(_) => ErrorClassification {
                error_type: "Io",
                retryable: true,
            },
            EngineError::InvalidInput(_) => ErrorClassification {
                error_type: "InvalidInput",
                retryable: false,
            },
            EngineError::ArchitectureViolation(_) => ErrorClassification {
                error_type: "ArchitectureViolation",
                retryable: false,
            },
            EngineError::ToolNotInstalled(_) => ErrorClassification {
                error_type: "ToolNotInstalled",
                retryable: false,
            },
            EngineError::ToolArgumentError(_) => ErrorClassification {
                error_type: "ToolArgumentError",
                retryable: false,
            },
            EngineError::ParseFailure(_) => ErrorClassification {
                error_type: "ParseFailure",
                retryable: false,
            },
            EngineError::BudgetExhausted(_) => ErrorClassification {
                error_type: "BudgetExhausted",
                retryable: false,
            },
            EngineError::Config(_) => ErrorClassification {
                error_type: "Config",
                retryable: false,
            },
            EngineError::Json(_) => ErrorClassification {
                error_type: "Json",
                retryable: false,
            },
            EngineError::Yaml(_) => ErrorClassification {
                error_type: "Yaml",
                retryable: false,
            },
            EngineError::Internal(_) => ErrorClassification {
                error_type: "Internal",
                retryable: false,
            },
        }
    }
}
