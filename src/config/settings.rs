//! Environment overrides layered over the file configuration.

use figment::{Figment, providers::Env};
use serde::Deserialize;

use super::ConfigError;

pub const ENV_PREFIX: &str = "GIT_HOOKS_";

/// Values read from `GIT_HOOKS_*` variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EnvOverrides {
    pub verbose: Option<bool>,
    pub auto_restage: Option<bool>,
    pub timeout: Option<u64>,
}

impl EnvOverrides {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_figment(Figment::from(
            Env::prefixed(ENV_PREFIX).only(&["verbose", "auto_restage", "timeout"]),
        ))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let overrides: Self = figment
            .extract()
            .map_err(|e| ConfigError::Env(e.to_string()))?;
        if overrides.timeout == Some(0) {
            return Err(ConfigError::invalid(
                format!("{ENV_PREFIX}TIMEOUT"),
                "must be at least one second",
            ));
        }
        Ok(overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_no_variables_means_no_overrides() {
        Jail::expect_with(|_jail| {
            let overrides = EnvOverrides::from_env().map_err(|e| e.to_string())?;
            assert_eq!(overrides, EnvOverrides::default());
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_variables_are_read() {
        Jail::expect_with(|jail| {
            jail.set_env("GIT_HOOKS_VERBOSE", "true");
            jail.set_env("GIT_HOOKS_AUTO_RESTAGE", "false");
            jail.set_env("GIT_HOOKS_TIMEOUT", "30");
            jail.set_env("GIT_HOOKS_UNRELATED", "ignored");

            let overrides = EnvOverrides::from_env().map_err(|e| e.to_string())?;
            assert_eq!(overrides.verbose, Some(true));
            assert_eq!(overrides.auto_restage, Some(false));
            assert_eq!(overrides.timeout, Some(30));
            Ok(())
        });
    }

    #[test]
    fn test_overrides_replace_global_values() {
        Jail::expect_with(|jail| {
            jail.set_env("GIT_HOOKS_AUTO_RESTAGE", "false");

            let mut config = crate::config::HooksConfig::from_json_str(
                r#"{"autoRestage": true, "verbose": false}"#,
            )
            .map_err(|e| e.to_string())?;
            config.apply_env(&EnvOverrides::from_env().map_err(|e| e.to_string())?);

            assert_eq!(config.auto_restage, Some(false));
            assert!(!config.verbose);
            Ok(())
        });
    }

    #[test]
    fn test_malformed_value_is_an_error() {
        Jail::expect_with(|jail| {
            jail.set_env("GIT_HOOKS_TIMEOUT", "soon");
            assert!(matches!(EnvOverrides::from_env(), Err(ConfigError::Env(_))));
            Ok(())
        });
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("GIT_HOOKS_TIMEOUT", "0");
            assert!(matches!(
                EnvOverrides::from_env(),
                Err(ConfigError::InvalidValue { key, .. }) if key == "GIT_HOOKS_TIMEOUT"
            ));
            Ok(())
        });
    }
}
