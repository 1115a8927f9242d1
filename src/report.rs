use serde::{Deserialize, Serialize};

/// How one execution of the generated tests ended. Only `Passed` counts as a
/// pass; every other status is scored as "did not pass".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Passed,
    Failed,
    TimedOut,
    SpawnError,
    NotRun,
}

impl RunStatus {
    pub fn passed(self) -> bool {
        self == RunStatus::Passed
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
            Self::TimedOut => write!(f, "timed_out"),
            Self::SpawnError => write!(f, "spawn_error"),
            Self::NotRun => write!(f, "not_run"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutantOutcome {
    /// 1-based position in the task's mutant list.
    pub index: usize,
    pub label: String,
    /// The tests failed against this mutant.
    pub caught: bool,
    pub status: RunStatus,
    pub duration_ms: u64,
    /// Line diff from the reference implementation to the mutant.
    #[serde(default)]
    pub diff: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    pub task: String,
    pub tests_ok_on_canonical: bool,
    pub canonical_status: RunStatus,
    pub mutant_outcomes: Vec<MutantOutcome>,
    /// Why the task could not be evaluated normally, if it could not.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    pub duration_ms: u64,
}

impl TaskResult {
    pub fn caught_count(&self) -> usize {
        self.mutant_outcomes.iter().filter(|m| m.caught).count()
    }

    pub fn escaped(&self) -> impl Iterator<Item = &MutantOutcome> {
        self.mutant_outcomes.iter().filter(|m| !m.caught)
    }

    /// Tests pass on the reference and catch every mutant.
    pub fn is_clean(&self) -> bool {
        self.tests_ok_on_canonical && self.mutant_outcomes.iter().all(|m| m.caught)
    }

    pub fn mutant(&self, index: usize) -> Option<&MutantOutcome> {
        self.mutant_outcomes.iter().find(|m| m.index == index)
    }
}

/// Every task result of one evaluation pass, in registry order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub strategy: String,
    pub session: String,
    pub tasks: Vec<TaskResult>,
}

impl RunReport {
    /// Order is preserved and nothing is filtered.
    pub fn collect(
        strategy: impl Into<String>,
        session: impl Into<String>,
        results: impl IntoIterator<Item = TaskResult>,
    ) -> Self {
        Self {
            strategy: strategy.into(),
            session: session.into(),
            tasks: results.into_iter().collect(),
        }
    }

    pub fn task(&self, name: &str) -> Option<&TaskResult> {
        self.tasks.iter().find(|t| t.task == name)
    }

    pub fn total_mutants(&self) -> usize {
        self.tasks.iter().map(|t| t.mutant_outcomes.len()).sum()
    }

    pub fn caught_mutants(&self) -> usize {
        self.tasks.iter().map(TaskResult::caught_count).sum()
    }

    pub fn canonical_passes(&self) -> usize {
        self.tasks.iter().filter(|t| t.tests_ok_on_canonical).count()
    }

    /// Fraction of mutants caught; 1.0 when there are none.
    pub fn detection_rate(&self) -> f64 {
        let total = self.total_mutants();
        if total == 0 {
            1.0
        } else {
            self.caught_mutants() as f64 / total as f64
        }
    }

    pub fn all_tasks_clean(&self) -> bool {
        self.tasks.iter().all(TaskResult::is_clean)
    }

    pub fn duration_ms(&self) -> u64 {
        self.tasks.iter().map(|t| t.duration_ms).sum()
    }
}
