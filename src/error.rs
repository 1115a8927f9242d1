use std::path::PathBuf;

use thiserror::Error;

/// A strategy could not produce test source for a task.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("strategy '{strategy}' has no test generator for task '{task}'")]
    NoGenerator { strategy: String, task: String },

    #[error("failed to read generated tests from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("strategy '{strategy}' produced empty tests for task '{task}'")]
    Empty { strategy: String, task: String },
}

/// The disposable staging directory could not be created or written.
#[derive(Debug, Error)]
pub enum StagingError {
    #[error("failed to create staging directory: {0}")]
    Create(#[source] std::io::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate task name '{0}'")]
    DuplicateTask(String),

    #[error("task with empty {field} (task #{index})")]
    MissingField { index: usize, field: &'static str },

    #[error("failed to read task file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse task file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
