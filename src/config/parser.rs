use std::path::Path;

use super::security::validate_security_patterns;
use super::types::ScoutlineConfig;
use crate::errors::EngineError;

pub async fn parse_config(path: &Path) -> Result<ScoutlineConfig, EngineError> {
    if !path.exists() {
        return Err(EngineError::Config(format!(
            "config file not found: {}",
            path.display()
        )));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(EngineError::Config("config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&content)?;

    validate_security_patterns(&yaml)?;

    let config: ScoutlineConfig = serde_yaml::from_value(yaml)?;
    Ok(config)
}
