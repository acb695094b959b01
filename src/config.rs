//! Module configuration.

use std::env;

/// Default module name; also seeds the escrow account.
pub const DEFAULT_MODULE_NAME: &str = crate::MODULE_NAME;

/// Scavenge module configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScavengeConfig {
    /// Module name. Changing it changes the escrow account, so it must stay
    /// fixed for the lifetime of a store.
    pub module_name: String,
    /// Maximum puzzle description length in bytes.
    pub max_description_len: usize,
}

impl Default for ScavengeConfig {
    fn default() -> Self {
        Self {
            module_name: DEFAULT_MODULE_NAME.to_string(),
            max_description_len: 4096,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Env var present but unparsable.
    #[error("invalid value for {var}: {value:?}")]
    InvalidVar {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },

    /// Module name is blank.
    #[error("module name is empty")]
    EmptyModuleName,

    /// A length limit is zero.
    #[error("{0} must be positive")]
    ZeroLimit(&'static str),
}

impl ScavengeConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            module_name: env::var("SCAVENGE_MODULE_NAME").unwrap_or(defaults.module_name),
            max_description_len: parse_var("SCAVENGE_MAX_DESCRIPTION_LEN", defaults.max_description_len)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check limits and names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.module_name.trim().is_empty() {
            return Err(ConfigError::EmptyModuleName);
        }
        if self.max_description_len == 0 {
            return Err(ConfigError::ZeroLimit("max_description_len"));
        }
        Ok(())
    }
}

fn parse_var(var: &'static str, default: usize) -> Result<usize, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidVar { var, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ScavengeConfig::default();
        assert_eq!(config.module_name, "scavenge");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ScavengeConfig {
            module_name: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyModuleName));

        let config = ScavengeConfig {
            max_description_len: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroLimit("max_description_len")));
    }
}
