use spec2test::error::GenerationError;
use spec2test::sandbox::StagingLayout;
use spec2test::strategy::{DirectoryStrategy, HandWrittenStrategy, TestStrategy};
use spec2test::{Task, TestGenAgent, katas};
use std::path::PathBuf;

fn task(name: &str) -> Task {
    Task::new(name, "", name, "", vec![])
}

// --- HandWrittenStrategy ---

#[test]
fn builtin_covers_every_builtin_kata() {
    let strategy = HandWrittenStrategy::builtin();
    assert!(strategy.covers(katas::SUM_POSITIVES));
    assert!(strategy.covers(katas::IS_PALINDROME));
    assert!(!strategy.covers("fizzbuzz"));
}

#[test]
fn builtin_tests_import_the_staged_module() {
    let tests = HandWrittenStrategy::builtin()
        .generate_tests(&katas::sum_positives())
        .unwrap();
    assert!(tests.contains("from impl_under_test import sum_positives"));
    assert!(tests.contains("([1, 2, 3], 6)"));
    assert!(tests.contains("([0, 1, -2, 3, -4], 4)"));
}

#[test]
fn palindrome_tests_cover_mixed_case() {
    let tests = HandWrittenStrategy::builtin()
        .generate_tests(&katas::is_palindrome())
        .unwrap();
    assert!(tests.contains("from impl_under_test import is_palindrome"));
    assert!(tests.contains("(\"RaceCar\", True)"));
}

#[test]
fn unknown_task_is_a_generation_error() {
    let err = HandWrittenStrategy::builtin().generate_tests(&task("fizzbuzz")).unwrap_err();
    assert!(matches!(err, GenerationError::NoGenerator { .. }));
    assert!(err.to_string().contains("fizzbuzz"));
}

#[test]
fn custom_generator_receives_the_task() {
    let strategy = HandWrittenStrategy::new().with_generator("echo", |t: &Task, m: &str| format!("calls {} from {}", t.entry_point, m));
    assert_eq!(strategy.generate_tests(&task("echo")).unwrap(), "calls echo from impl_under_test");
    assert_eq!(strategy.name(), "hand-written");
}

#[test]
fn builtin_tests_follow_configured_module() {
    let layout = StagingLayout {
        impl_file: "subject.py".to_string(),
        ..StagingLayout::default()
    };
    let strategy = HandWrittenStrategy::builtin().with_module(layout.impl_module());
    assert_eq!(strategy.module(), "subject");

    let tests = strategy.generate_tests(&katas::sum_positives()).unwrap();
    assert!(tests.contains("from subject import sum_positives"), "tests: {}", tests);
    assert!(!tests.contains("impl_under_test"));
}

#[test]
fn default_module_is_impl_under_test() {
    assert_eq!(HandWrittenStrategy::new().module(), spec2test::sandbox::IMPL_MODULE);
}

// --- DirectoryStrategy ---

#[test]
fn directory_path_uses_task_name_and_extension() {
    let strategy = DirectoryStrategy::new("/tmp/gen", "py");
    assert_eq!(strategy.path_for(&task("sum_positives")), PathBuf::from("/tmp/gen/sum_positives.py"));
    assert_eq!(strategy.dir(), std::path::Path::new("/tmp/gen"));
}

#[test]
fn directory_path_without_extension() {
    let strategy = DirectoryStrategy::new("/tmp/gen", "");
    assert_eq!(strategy.path_for(&task("t")), PathBuf::from("/tmp/gen/t"));
}

#[test]
fn directory_strategy_reads_generated_file() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("double.py"), "def test_x(): pass\n").unwrap();
    let strategy = DirectoryStrategy::new(dir.path(), "py");
    assert_eq!(strategy.generate_tests(&task("double")).unwrap(), "def test_x(): pass\n");
    assert!(strategy.name().starts_with("dir:"));
}

#[test]
fn directory_strategy_missing_file_is_read_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let strategy = DirectoryStrategy::new(dir.path(), "py");
    let err = strategy.generate_tests(&task("absent")).unwrap_err();
    assert!(matches!(err, GenerationError::Read { .. }));
    assert!(err.to_string().contains("absent.py"));
}

#[test]
fn directory_strategy_empty_file_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("blank.py"), "  \n").unwrap();
    let strategy = DirectoryStrategy::new(dir.path(), "py");
    let err = strategy.generate_tests(&task("blank")).unwrap_err();
    assert!(matches!(err, GenerationError::Empty { .. }));
}

// --- TestGenAgent ---

#[test]
fn agent_wraps_strategy_output() {
    let agent = TestGenAgent::new(HandWrittenStrategy::builtin());
    let generated = agent.generate_for_task(&katas::is_palindrome()).unwrap();
    assert_eq!(generated.task, "is_palindrome");
    assert_eq!(generated.strategy, "hand-written");
    assert!(generated.source.contains("def test_is_palindrome_tricky_spacing"));
    assert_eq!(agent.strategy_name(), "hand-written");
}

#[test]
fn agent_propagates_generation_errors() {
    let agent = TestGenAgent::from_boxed(Box::new(HandWrittenStrategy::new()));
    let err = agent.generate_for_task(&task("anything")).unwrap_err();
    assert!(matches!(err, GenerationError::NoGenerator { ref task, .. } if task == "anything"));
}
