use crate::errors::EngineError;

const DANGEROUS_PATTERNS: &[&str] = &[
    "../",
    "..\\",
    "<script",
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
];

pub fn validate_security_patterns(value: &serde_yaml::Value) -> Result<(), EngineError> {
    check_value(value, &[])?;
    Ok(())
}

fn check_value(value: &serde_yaml::Value, path: &[String]) -> Result<(), EngineError> {
    match value {
        serde_yaml::Value::String(s) => {
            let lower = s.to_lowercase();
            for pattern in DANGEROUS_PATTERNS {
                if lower.contains(pattern) {
                    let path_str = if path.is_empty() {
                        "root".to_string()
                    } else {
                        path.join(".")
                    };
                    return Err(EngineError::Config(format!(
                        "dangerous pattern '{}' found at config path: {}",
                        pattern, path_str
                    )));
                }
            }
            Ok(())
        }
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                let key = k.as_str().unwrap_or("unknown").to_string();
                let mut new_path = path.to_vec();
                new_path.push(key);
                check_value(v, &new_path)?;
            }
            Ok(())
        }
        serde_yaml::Value::Sequence(seq) => {
            for (i, v) in seq.iter().enumerate() {
                let mut new_path = path.to_vec();
                new_path.push(format!("[{}]", i));
                check_value(v, &new_path)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_path_traversal() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("tools:\n  evil: ../../etc/passwd").unwrap();
        assert!(validate_security_patterns(&yaml).is_err());
    }

    #[test]
    fn accepts_clean_config() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("scan:\n  workers: 4").unwrap();
        assert!(validate_security_patterns(&yaml).is_ok());
    }
}
