use std::collections::HashMap;
use std::path::PathBuf;

use crate::cli::commands::ValidateArgs;
use crate::config::ToolRegistration;
use crate::errors::EngineError;

/// Validates a user-supplied tool-registration file (spec §6) without
/// running a scan: parses it as JSON and reports the tools it declares.
pub async fn handle_validate(args: ValidateArgs) -> Result<i32, EngineError> {
    let path = PathBuf::from(&args.tools_file);
    if !path.exists() {
        return Err(EngineError::Config(format!(
            "tool-registration file not found: {}",
            path.display()
        )));
    }

    let content = tokio::fs::read_to_string(&path).await?;
    let registrations: HashMap<String, ToolRegistration> = serde_json::from_str(&content)
        .map_err(|e| EngineError::Config(format!("invalid tool-registration JSON: {e}")))?;

    if registrations.is_empty() {
        println!("{}: no tool registrations declared", args.tools_file);
        return Ok(0);
    }

    println!("{} tool registration(s) valid in {}:", registrations.len(), args.tools_file);
    for (name, reg) in &registrations {
        println!("  {name}: {} [{}]", reg.command_template, reg.category);
    }
    Ok(0)
}
