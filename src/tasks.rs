use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::RegistryError;

/// One spec-driven kata: a reference implementation plus deliberately broken
/// variants of the same entry point.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Task {
    pub name: String,
    pub description: String,
    pub entry_point: String,
    #[serde(rename = "reference")]
    pub reference_source: String,
    #[serde(rename = "mutants", default)]
    pub mutant_sources: Vec<String>,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        entry_point: impl Into<String>,
        reference_source: impl Into<String>,
        mutant_sources: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            entry_point: entry_point.into(),
            reference_source: reference_source.into(),
            mutant_sources,
        }
    }

    /// Label of the 1-based mutant `index`, e.g. `mutant_2`.
    pub fn mutant_label(index: usize) -> String {
        format!("mutant_{}", index)
    }
}

#[derive(Deserialize)]
struct TaskFile {
    #[serde(rename = "task", default)]
    tasks: Vec<Task>,
}

/// Ordered, immutable set of tasks evaluated in one run.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
}

impl TaskRegistry {
    pub fn new(tasks: Vec<Task>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for (index, task) in tasks.iter().enumerate() {
            if task.name.trim().is_empty() {
                return Err(RegistryError::MissingField { index, field: "name" });
            }
            if task.entry_point.trim().is_empty() {
                return Err(RegistryError::MissingField { index, field: "entry_point" });
            }
            if !seen.insert(task.name.as_str()) {
                return Err(RegistryError::DuplicateTask(task.name.clone()));
            }
            if task.mutant_sources.is_empty() {
                tracing::warn!(task = %task.name, "task has no mutants; bug detection cannot be measured");
            }
        }
        Ok(Self { tasks })
    }

    /// Parse a TOML task file made of `[[task]]` tables.
    pub fn from_toml_str(contents: &str) -> Result<Self, RegistryError> {
        let file: TaskFile = toml::from_str(contents)?;
        Self::new(file.tasks)
    }

    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let contents = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }
}

impl<'a> IntoIterator for &'a TaskRegistry {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
