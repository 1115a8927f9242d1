pub mod agent;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod katas;
pub mod output;
pub mod report;
pub mod sandbox;
pub mod state;
pub mod strategy;
pub mod tasks;

pub use agent::{GeneratedTests, TestGenAgent};
pub use evaluator::Evaluator;
pub use report::{MutantOutcome, RunReport, RunStatus, TaskResult};
pub use tasks::{Task, TaskRegistry};

/// Random session id used to tag staging directories.
pub fn generate_session_id() -> String {
    format!("{:08x}", fastrand::u32(..))
}
