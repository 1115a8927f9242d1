use spec2test::config::{Config, RunnerConfig};
use spec2test::error::ConfigError;
use spec2test::katas;
use spec2test::strategy::{HandWrittenStrategy, TestStrategy};
use std::time::Duration;

#[test]
fn defaults_run_pytest_with_fifteen_seconds() {
    let config = Config::default();
    assert_eq!(config.runner.command, "python3 -m pytest -q -p no:cacheprovider");
    assert_eq!(config.runner.timeout_secs, 15);
    assert_eq!(config.staging.impl_file, "impl_under_test.py");
    assert_eq!(config.staging.tests_file, "test_generated.py");
    assert_eq!(config.timeout(), Duration::from_secs(15));
    assert!(config.validate().is_ok());
}

#[test]
fn empty_file_yields_defaults() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn partial_sections_keep_other_defaults() {
    let config = Config::from_toml_str("[runner]\ntimeout_secs = 3\n").unwrap();
    assert_eq!(config.runner.timeout_secs, 3);
    assert_eq!(config.runner.command, RunnerConfig::default().command);
    assert_eq!(config.staging.tests_file, "test_generated.py");
}

#[test]
fn full_config_parses() {
    let config = Config::from_toml_str(
        r#"
[runner]
command = "sh"
timeout_secs = 2

[staging]
impl_file = "impl.sh"
tests_file = "test_generated.sh"
"#,
    )
    .unwrap();
    assert_eq!(config.test_runner().command_line(), "sh");
    assert_eq!(config.test_runner().timeout(), Duration::from_secs(2));
    assert_eq!(config.staging.tests_extension(), "sh");
}

#[test]
fn zero_timeout_is_invalid() {
    let err = Config::from_toml_str("[runner]\ntimeout_secs = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("timeout_secs")));
}

#[test]
fn blank_command_is_invalid() {
    let err = Config::from_toml_str("[runner]\ncommand = \"  \"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn staging_names_must_be_plain_file_names() {
    for bad in ["../impl.py", "sub/impl.py", "", ".."] {
        let toml = format!("[staging]\nimpl_file = \"{}\"\n", bad);
        let err = Config::from_toml_str(&toml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "accepted {:?}", bad);
    }
}

#[test]
fn staging_names_must_differ() {
    let err = Config::from_toml_str("[staging]\nimpl_file = \"a.py\"\ntests_file = \"a.py\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("differ")));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = Config::from_toml_str("[runner\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_explicit_missing_file_fails() {
    let err = Config::load(Some(std::path::Path::new("/nonexistent/spec2test.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn load_explicit_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[runner]\ncommand = \"sh\"\n").unwrap();
    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.runner.command, "sh");
}

#[test]
fn renamed_impl_file_changes_the_import_in_builtin_tests() {
    let config = Config::from_toml_str("[staging]\nimpl_file = \"subject.py\"\n").unwrap();
    assert_eq!(config.staging.impl_module(), "subject");

    let strategy = HandWrittenStrategy::builtin().with_module(config.staging.impl_module());
    let tests = strategy.generate_tests(&katas::sum_positives()).unwrap();
    assert!(tests.contains("from subject import sum_positives"), "tests: {}", tests);
}
