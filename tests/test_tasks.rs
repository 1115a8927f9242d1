use spec2test::error::RegistryError;
use spec2test::{Task, TaskRegistry, katas};

const TASK_FILE: &str = r#"
[[task]]
name = "double"
description = "Return twice the input."
entry_point = "double"
reference = '''
def double(x):
    return x * 2
'''
mutants = [
    '''
def double(x):
    return x + 2
''',
    '''
def double(x):
    return x * 3
''',
]

[[task]]
name = "identity"
description = "Return the input."
entry_point = "identity"
reference = "def identity(x): return x"
"#;

#[test]
fn builtin_registry_holds_both_katas_in_order() {
    let registry = katas::builtin_registry().unwrap();
    let names: Vec<_> = registry.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["sum_positives", "is_palindrome"]);
    for task in &registry {
        assert_eq!(task.mutant_sources.len(), 2);
        assert_eq!(task.entry_point, task.name);
    }
}

#[test]
fn builtin_reference_matches_documented_behavior() {
    let task = katas::sum_positives();
    assert!(task.reference_source.contains("sum(n for n in nums if n > 0)"));
    assert!(task.mutant_sources[0].contains("range(len(nums) - 1)"));
    assert!(task.mutant_sources[1].contains("n >= 0"));
}

#[test]
fn parses_task_file_in_order() {
    let registry = TaskRegistry::from_toml_str(TASK_FILE).unwrap();
    assert_eq!(registry.len(), 2);

    let double = registry.get("double").unwrap();
    assert_eq!(double.entry_point, "double");
    assert_eq!(double.mutant_sources.len(), 2);
    assert!(double.reference_source.contains("return x * 2"));
    assert!(double.mutant_sources[1].contains("return x * 3"));

    assert_eq!(registry.tasks()[1].name, "identity");
}

#[test]
fn mutants_default_to_empty() {
    let registry = TaskRegistry::from_toml_str(TASK_FILE).unwrap();
    assert!(registry.get("identity").unwrap().mutant_sources.is_empty());
}

#[test]
fn duplicate_task_names_are_rejected() {
    let task = Task::new("a", "", "f", "", vec![]);
    let err = TaskRegistry::new(vec![task.clone(), task]).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateTask(ref name) if name == "a"));
}

#[test]
fn empty_name_is_rejected() {
    let err = TaskRegistry::new(vec![Task::new(" ", "", "f", "", vec![])]).unwrap_err();
    assert!(matches!(err, RegistryError::MissingField { index: 0, field: "name" }));
}

#[test]
fn empty_entry_point_is_rejected() {
    let err = TaskRegistry::new(vec![Task::new("a", "", "", "", vec![])]).unwrap_err();
    assert!(matches!(err, RegistryError::MissingField { field: "entry_point", .. }));
}

#[test]
fn malformed_task_file_is_a_parse_error() {
    let err = TaskRegistry::from_toml_str("[[task]]\nname = 3\n").unwrap_err();
    assert!(matches!(err, RegistryError::Parse(_)));
}

#[test]
fn load_reads_from_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("tasks.toml");
    std::fs::write(&path, TASK_FILE).unwrap();
    let registry = TaskRegistry::load(&path).unwrap();
    assert_eq!(registry.len(), 2);
}

#[test]
fn load_missing_file_is_a_read_error() {
    let err = TaskRegistry::load(std::path::Path::new("/nonexistent/tasks.toml")).unwrap_err();
    assert!(matches!(err, RegistryError::Read { .. }));
    assert!(err.to_string().contains("/nonexistent/tasks.toml"));
}

#[test]
fn mutant_labels_are_one_based() {
    assert_eq!(Task::mutant_label(1), "mutant_1");
    assert_eq!(Task::mutant_label(12), "mutant_12");
}
