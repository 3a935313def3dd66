// file: src/config/loader.rs
// version: 2.0.0
// guid: 5aed87da-4742-4c68-90f7-a0a28a12478d

//! Configuration file loading and environment variable substitution

use super::ProvisioningConfig;
use crate::error::ProvisionError;
use crate::Result;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
    env_vars: HashMap<String, String>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            env_vars: std::env::vars().collect(),
        }
    }

    /// Load provisioning configuration from YAML file
    pub fn load_provisioning_config<P: AsRef<Path>>(&self, path: P) -> Result<ProvisioningConfig> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ProvisionError::file_not_found(format!(
                "Missing configuration file for DHCP pool: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ProvisionError::config(format!(
                "Failed to read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

        let expanded = self.expand_env_vars(&content)?;
        let config: ProvisioningConfig = serde_yaml::from_str(&expanded)?;

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());

        Ok(config)
    }

    /// Expand `${VAR}` references outside of comment lines
    fn expand_env_vars(&self, content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
            .map_err(|e| ProvisionError::config(format!("Invalid regex pattern: {}", e)))?;

        let mut missing_vars: Vec<String> = Vec::new();
        let expanded: Vec<String> = content
            .lines()
            .map(|line| {
                if line.trim_start().starts_with('#') {
                    return line.to_string();
                }
                re.replace_all(line, |caps: &Captures| match self.env_vars.get(&caps[1]) {
                    Some(value) => value.clone(),
                    None => {
                        if !missing_vars.iter().any(|v| v == &caps[1]) {
                            missing_vars.push(caps[1].to_string());
                        }
                        String::new()
                    }
                })
                .into_owned()
            })
            .collect();

        if !missing_vars.is_empty() {
            return Err(ProvisionError::config(format!(
                "Missing environment variables: {}",
                missing_vars.join(", ")
            )));
        }

        Ok(expanded.join("\n"))
    }

    /// Set environment variable for substitution
    pub fn set_env_var(&mut self, key: String, value: String) {
        self.env_vars.insert(key, value);
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
