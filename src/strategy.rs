//! Pluggable test-generation strategies.
//!
//! A strategy turns a [`Task`] into self-contained test source. The tests must
//! import the subject from the module named by the staging layout's
//! `impl_file` (default [`IMPL_MODULE`]) and exercise `task.entry_point`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::GenerationError;
use crate::katas;
use crate::sandbox::IMPL_MODULE;
use crate::tasks::Task;

pub trait TestStrategy {
    /// Short identifier shown in reports.
    fn name(&self) -> &str;

    fn generate_tests(&self, task: &Task) -> Result<String, GenerationError>;
}

/// Builds test source for a task whose subject is importable as `module`.
pub type GeneratorFn = fn(&Task, &str) -> String;

/// Hand-written suites, one generator function per task name.
pub struct HandWrittenStrategy {
    generators: BTreeMap<String, GeneratorFn>,
    module: String,
}

impl HandWrittenStrategy {
    pub fn new() -> Self {
        Self {
            generators: BTreeMap::new(),
            module: IMPL_MODULE.to_string(),
        }
    }

    /// Suites for every built-in kata.
    pub fn builtin() -> Self {
        Self::new()
            .with_generator(katas::SUM_POSITIVES, katas::sum_positives_tests)
            .with_generator(katas::IS_PALINDROME, katas::is_palindrome_tests)
    }

    pub fn with_generator(mut self, task: impl Into<String>, generator: GeneratorFn) -> Self {
        self.generators.insert(task.into(), generator);
        self
    }

    /// Import the subject from `module` instead of [`IMPL_MODULE`]. Must match
    /// the stem of the staged implementation file.
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn covers(&self, task: &str) -> bool {
        self.generators.contains_key(task)
    }
}

impl TestStrategy for HandWrittenStrategy {
    fn name(&self) -> &str {
        "hand-written"
    }

    fn generate_tests(&self, task: &Task) -> Result<String, GenerationError> {
        let generator = self
            .generators
            .get(&task.name)
            .ok_or_else(|| GenerationError::NoGenerator {
                strategy: self.name().to_string(),
                task: task.name.clone(),
            })?;
        Ok(generator(task, &self.module))
    }
}

/// Reads tests produced ahead of time by an external generator, one file per
/// task named `<task>.<extension>`.
pub struct DirectoryStrategy {
    dir: PathBuf,
    extension: String,
    label: String,
}

impl DirectoryStrategy {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let dir = dir.into();
        let label = format!("dir:{}", dir.display());
        Self {
            dir,
            extension: extension.into(),
            label,
        }
    }

    pub fn path_for(&self, task: &Task) -> PathBuf {
        let file = if self.extension.is_empty() {
            task.name.clone()
        } else {
            format!("{}.{}", task.name, self.extension)
        };
        self.dir.join(file)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TestStrategy for DirectoryStrategy {
    fn name(&self) -> &str {
        &self.label
    }

    fn generate_tests(&self, task: &Task) -> Result<String, GenerationError> {
        let path = self.path_for(task);
        let source = std::fs::read_to_string(&path)
            .map_err(|source| GenerationError::Read { path, source })?;
        if source.trim().is_empty() {
            return Err(GenerationError::Empty {
                strategy: self.label.clone(),
                task: task.name.clone(),
            });
        }
        Ok(source)
    }
}

