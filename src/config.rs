use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sandbox::{DEFAULT_TEST_CMD, DEFAULT_TIMEOUT, StagingLayout, TestRunner};

pub const DEFAULT_CONFIG_FILE: &str = "spec2test.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runner: RunnerConfig,

    #[serde(default)]
    pub staging: StagingLayout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Test command; the tests file name is appended as the last argument.
    #[serde(default = "default_command")]
    pub command: String,

    /// Wall-clock budget for a single test run.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_command() -> String {
    DEFAULT_TEST_CMD.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load from `path`, or from `spec2test.toml` in the current directory
    /// when no path is given. A missing default file yields the defaults; a
    /// missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config_path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !required && !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %config_path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.runner.command.trim().is_empty() {
            return Err(ConfigError::Invalid("runner.command must not be empty".into()));
        }
        if self.runner.timeout_secs == 0 {
            return Err(ConfigError::Invalid("runner.timeout_secs must be greater than 0".into()));
        }
        for (key, name) in [
            ("staging.impl_file", &self.staging.impl_file),
            ("staging.tests_file", &self.staging.tests_file),
        ] {
            if !is_plain_file_name(name) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a plain file name, got '{}'",
                    key, name
                )));
            }
        }
        if self.staging.impl_file == self.staging.tests_file {
            return Err(ConfigError::Invalid(
                "staging.impl_file and staging.tests_file must differ".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.runner.timeout_secs)
    }

    pub fn test_runner(&self) -> TestRunner {
        TestRunner::from_command(&self.runner.command, self.timeout())
    }
}

fn is_plain_file_name(name: &str) -> bool {
    let path = Path::new(name);
    !name.is_empty()
        && path.file_name().map(|f| f == path.as_os_str()).unwrap_or(false)
        && name != "."
        && name != ".."
}
