//! Effective runtime settings
//!
//! Precedence, highest first: command line, environment, config file,
//! built-in defaults.

use crate::commands::parser::GlobalArgs;
use crate::config::{CAPACITY_ENV, DEFAULT_CAPACITY, LOG_ENV, MAX_CAPACITY};
use crate::error::{errors, PcbResult};
use crate::render::OutputFormat;
use crate::utils::config_paths::{ConfigPaths, UserConfig};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub capacity: usize,
    pub format: OutputFormat,
    pub strict: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            format: OutputFormat::Text,
            strict: false,
            log_level: None,
            log_file: None,
        }
    }
}

impl Settings {
    /// Resolve against the real process environment and config file.
    pub fn load(args: &GlobalArgs, paths: &ConfigPaths) -> PcbResult<Self> {
        let config_file = args.config.as_ref().unwrap_or(&paths.config_file);
        let user = UserConfig::load(config_file)?;
        Self::resolve(args, &user, paths, |key| std::env::var(key).ok())
    }

    pub fn resolve(
        args: &GlobalArgs,
        user: &UserConfig,
        paths: &ConfigPaths,
        env: impl Fn(&str) -> Option<String>,
    ) -> PcbResult<Self> {
        let env_capacity = match env(CAPACITY_ENV) {
            Some(raw) => Some(raw.trim().parse::<usize>().map_err(|err| {
                errors::config_error_with_source(
                    format!("{} must be a positive integer, got {:?}", CAPACITY_ENV, raw),
                    err,
                )
            })?),
            None => None,
        };

        let capacity = args
            .capacity
            .or(env_capacity)
            .or(user.capacity)
            .unwrap_or(DEFAULT_CAPACITY);
        if capacity == 0 || capacity > MAX_CAPACITY {
            return Err(errors::config_error(format!(
                "capacity must be between 1 and {}, got {}",
                MAX_CAPACITY, capacity
            )));
        }

        let log_file = args.log_file.clone().or_else(|| {
            user.log_to_file
                .unwrap_or(false)
                .then(|| paths.log_file.clone())
        });

        Ok(Self {
            capacity,
            format: args.format.or(user.format).unwrap_or_default(),
            strict: args.strict || user.strict.unwrap_or(false),
            log_level: args
                .log_level
                .clone()
                .or_else(|| env(LOG_ENV))
                .or_else(|| user.log_level.clone()),
            log_file,
        })
    }

    /// Render as TOML for the `config` subcommand.
    pub fn to_toml(&self) -> PcbResult<String> {
        toml::to_string(self)
            .map_err(|err| errors::config_error_with_source("cannot serialize settings", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    fn paths() -> ConfigPaths {
        ConfigPaths::with_home(Path::new("/home/tester"))
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let settings =
            Settings::resolve(&GlobalArgs::default(), &UserConfig::default(), &paths(), no_env)
                .unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.capacity, 64);
    }

    #[test]
    fn test_precedence() {
        let user = UserConfig {
            capacity: Some(8),
            format: Some(OutputFormat::Table),
            log_level: Some("info".to_string()),
            ..UserConfig::default()
        };
        let env: HashMap<&str, &str> = [(CAPACITY_ENV, "16"), (LOG_ENV, "debug")].into();
        let lookup = |key: &str| env.get(key).map(|v| v.to_string());

        let settings = Settings::resolve(&GlobalArgs::default(), &user, &paths(), &lookup).unwrap();
        assert_eq!(settings.capacity, 16);
        assert_eq!(settings.format, OutputFormat::Table);
        assert_eq!(settings.log_level.as_deref(), Some("debug"));

        let args = GlobalArgs {
            capacity: Some(4),
            format: Some(OutputFormat::Json),
            log_level: Some("trace".to_string()),
            ..GlobalArgs::default()
        };
        let settings = Settings::resolve(&args, &user, &paths(), &lookup).unwrap();
        assert_eq!(settings.capacity, 4);
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.log_level.as_deref(), Some("trace"));
    }

    #[test]
    fn test_invalid_capacity() {
        let args = GlobalArgs {
            capacity: Some(0),
            ..GlobalArgs::default()
        };
        assert!(Settings::resolve(&args, &UserConfig::default(), &paths(), no_env).is_err());

        let bad_env = |key: &str| (key == CAPACITY_ENV).then(|| "many".to_string());
        assert!(
            Settings::resolve(&GlobalArgs::default(), &UserConfig::default(), &paths(), bad_env)
                .is_err()
        );
    }

    #[test]
    fn test_log_to_file_uses_runtime_dir() {
        let user = UserConfig {
            log_to_file: Some(true),
            ..UserConfig::default()
        };
        let settings = Settings::resolve(&GlobalArgs::default(), &user, &paths(), no_env).unwrap();
        assert_eq!(settings.log_file, Some(paths().log_file));
    }

    #[test]
    fn test_to_toml() {
        let text = Settings::default().to_toml().unwrap();
        assert!(text.contains("capacity = 64"));
        assert!(text.contains("format = \"text\""));
        assert!(text.contains("strict = false"));
    }
}
