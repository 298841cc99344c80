use std::path::Path;

use crate::config::schema::Config;
use crate::error::ConfigError;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.sweep.interval_minutes == 0 {
        return Err(ConfigError::Validation {
            message: "sweep.interval_minutes must be at least 1".to_string(),
        });
    }

    if config.classifier.timeout_secs == 0 {
        return Err(ConfigError::Validation {
            message: "classifier.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.classifier.api_key.is_some() && config.classifier.endpoint.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "classifier.endpoint must not be empty when an API key is set".to_string(),
        });
    }

    Ok(())
}
