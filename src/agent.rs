use crate::error::GenerationError;
use crate::strategy::TestStrategy;
use crate::tasks::Task;

/// Tests generated for exactly one task by one strategy invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTests {
    pub task: String,
    pub strategy: String,
    pub source: String,
}

/// Binds a strategy to the evaluation flow.
pub struct TestGenAgent {
    strategy: Box<dyn TestStrategy>,
}

impl TestGenAgent {
    pub fn new(strategy: impl TestStrategy + 'static) -> Self {
        Self {
            strategy: Box::new(strategy),
        }
    }

    pub fn from_boxed(strategy: Box<dyn TestStrategy>) -> Self {
        Self { strategy }
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Errors from the strategy are passed through untouched.
    pub fn generate_for_task(&self, task: &Task) -> Result<GeneratedTests, GenerationError> {
        let source = self.strategy.generate_tests(task)?;
        Ok(GeneratedTests {
            task: task.name.clone(),
            strategy: self.strategy.name().to_string(),
            source,
        })
    }
}
