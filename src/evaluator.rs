//! Scores generated tests: they must pass on the reference implementation and
//! fail on every mutant.

use std::time::Instant;

use similar::{ChangeTag, TextDiff};

use crate::agent::TestGenAgent;
use crate::report::{MutantOutcome, RunReport, RunStatus, TaskResult};
use crate::sandbox::{StagingArea, StagingLayout, TestRunner};
use crate::tasks::{Task, TaskRegistry};

pub struct Evaluator {
    runner: TestRunner,
    layout: StagingLayout,
    session: String,
}

impl Evaluator {
    pub fn new(runner: TestRunner, layout: StagingLayout, session: impl Into<String>) -> Self {
        Self {
            runner,
            layout,
            session: session.into(),
        }
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    /// Evaluate every task in registry order. A failing task never stops the
    /// ones after it.
    pub fn evaluate_all(&self, agent: &TestGenAgent, registry: &TaskRegistry) -> RunReport {
        let results = registry.iter().map(|task| self.evaluate_task(agent, task));
        RunReport::collect(agent.strategy_name(), &self.session, results)
    }

    pub fn evaluate_task(&self, agent: &TestGenAgent, task: &Task) -> TaskResult {
        let start = Instant::now();
        tracing::debug!(task = %task.name, mutants = task.mutant_sources.len(), "evaluating task");

        let generated = match agent.generate_for_task(task) {
            Ok(g) => g,
            Err(e) => {
                tracing::warn!(task = %task.name, error = %e, "test generation failed");
                return not_evaluated(task, e.to_string(), start);
            }
        };

        let staging = match StagingArea::create(&self.layout, &self.session, &task.name) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(task = %task.name, error = %e, "failed to create staging area");
                return not_evaluated(task, e.to_string(), start);
            }
        };

        if let Err(e) = staging
            .stage_tests(&generated.source)
            .and_then(|_| staging.stage_implementation(&task.reference_source))
        {
            tracing::warn!(task = %task.name, error = %e, "failed to stage reference run");
            return not_evaluated(task, e.to_string(), start);
        }

        let canonical = self.runner.run(&staging);
        if !canonical.passed() {
            tracing::info!(
                task = %task.name,
                status = %canonical.status,
                output = %canonical.output,
                "generated tests do not pass on the reference implementation"
            );
        }

        let mut failure = None;
        let mut mutant_outcomes = Vec::with_capacity(task.mutant_sources.len());
        for (i, mutant) in task.mutant_sources.iter().enumerate() {
            let index = i + 1;
            let diff = generate_diff(&task.reference_source, mutant);

            // Once staging breaks, the remaining mutants cannot be trusted to
            // run against the right subject.
            if failure.is_none() {
                if let Err(e) = staging.stage_implementation(mutant) {
                    tracing::warn!(task = %task.name, mutant = index, error = %e, "failed to stage mutant");
                    failure = Some(e.to_string());
                }
            }
            if failure.is_some() {
                mutant_outcomes.push(MutantOutcome {
                    index,
                    label: Task::mutant_label(index),
                    caught: false,
                    status: RunStatus::NotRun,
                    duration_ms: 0,
                    diff,
                });
                continue;
            }

            let record = self.runner.run(&staging);
            tracing::debug!(task = %task.name, mutant = index, status = %record.status, "mutant run finished");
            mutant_outcomes.push(MutantOutcome {
                index,
                label: Task::mutant_label(index),
                caught: !record.passed(),
                status: record.status,
                duration_ms: record.duration_ms,
                diff,
            });
        }

        let result = TaskResult {
            task: task.name.clone(),
            tests_ok_on_canonical: canonical.passed(),
            canonical_status: canonical.status,
            mutant_outcomes,
            failure,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        tracing::info!(
            task = %result.task,
            canonical = %result.canonical_status,
            caught = result.caught_count(),
            mutants = result.mutant_outcomes.len(),
            "task evaluated"
        );
        result
    }
}

/// Degraded result for a task whose tests could not be generated or staged:
/// nothing passed and nothing was caught.
fn not_evaluated(task: &Task, reason: String, start: Instant) -> TaskResult {
    let mutant_outcomes = task
        .mutant_sources
        .iter()
        .enumerate()
        .map(|(i, mutant)| MutantOutcome {
            index: i + 1,
            label: Task::mutant_label(i + 1),
            caught: false,
            status: RunStatus::NotRun,
            duration_ms: 0,
            diff: generate_diff(&task.reference_source, mutant),
        })
        .collect();
    TaskResult {
        task: task.name.clone(),
        tests_ok_on_canonical: false,
        canonical_status: RunStatus::NotRun,
        mutant_outcomes,
        failure: Some(reason),
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

/// Changed lines only, each prefixed with `- ` (reference) or `+ ` (mutant).
pub fn generate_diff(reference: &str, mutant: &str) -> String {
    TextDiff::from_lines(reference, mutant)
        .iter_all_changes()
        .filter_map(|change| {
            let sign = match change.tag() {
                ChangeTag::Delete => '-',
                ChangeTag::Insert => '+',
                ChangeTag::Equal => return None,
            };
            Some(format!("{} {}", sign, change))
        })
        .collect()
}
