// tests/config_test.rs
use semantic_branch::config::{load_config, LoadedConfig, SemanticBranchConfig};
use semantic_branch::SemanticBranchError;
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_load_pyproject_fixture() {
    let config = load_config(Some("tests/fixtures/pyproject.toml")).unwrap();
    assert_eq!(config.rules.release, vec!["main"]);
    assert_eq!(config.rules.minor, vec!["feature/.*"]);
    assert_eq!(config.rules.patch, vec!["fix/.*", "hotfix/.*"]);
    assert_eq!(config.rules.release_ignore, vec!["wip/.*"]);
    assert_eq!(config.rules.prerelease_ignore, vec!["experiment/.*"]);
    assert!(config.path.is_some());
}

#[test]
fn test_load_cargo_metadata_fixture() {
    let config = load_config(Some("tests/fixtures/cargo_metadata.toml")).unwrap();
    assert_eq!(config.rules.release, vec!["main"]);
    assert_eq!(config.rules.minor, vec!["feature/.*"]);
    assert!(config.rules.major.is_empty());
}

#[test]
fn test_underscore_spellings_accepted() {
    let config = load_config(Some("tests/fixtures/underscore_keys.toml")).unwrap();
    assert_eq!(config.rules.prerelease_ignore, vec!["draft/.*"]);
    assert_eq!(config.rules.release_ignore, vec!["wip/.*"]);
}

#[test]
fn test_missing_explicit_path_is_config_error() {
    let result = load_config(Some("tests/fixtures/does_not_exist.toml"));
    assert!(matches!(result, Err(SemanticBranchError::Config(_))));
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[tool.semantic-branch\nrelease = ").unwrap();
    temp_file.flush().unwrap();

    let result = load_config(Some(temp_file.path().to_str().unwrap()));
    assert!(matches!(result, Err(SemanticBranchError::TomlParse(_))));
}

#[test]
fn test_wrong_shape_is_config_error() {
    let result = LoadedConfig::parse("[tool.semantic-branch]\nrelease = \"main\"\n", None);
    assert!(matches!(result, Err(SemanticBranchError::Config(_))));
}

#[test]
fn test_document_without_rules_is_empty() {
    let config = LoadedConfig::parse("[project]\nversion = \"2.0.0\"\n", None).unwrap();
    assert_eq!(config.rules, SemanticBranchConfig::default());
    assert!(config.document.contains_key("project"));
}

#[test]
#[serial]
fn test_discovers_pyproject_in_working_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("pyproject.toml"),
        "[tool.semantic-branch]\nrelease = [\"trunk\"]\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("Cargo.toml"),
        "[package.metadata.semantic-branch]\nrelease = [\"main\"]\n",
    )
    .unwrap();

    let original = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).unwrap();
    let result = load_config(None);
    env::set_current_dir(original).unwrap();

    let config = result.unwrap();
    assert_eq!(config.rules.release, vec!["trunk"]);
}

#[test]
#[serial]
fn test_discovers_cargo_manifest_without_pyproject() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("Cargo.toml"),
        "[package]\nversion = \"0.3.0\"\n\n[package.metadata.semantic-branch]\nminor = [\"feat/.*\"]\n",
    )
    .unwrap();

    let original = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).unwrap();
    let result = load_config(None);
    env::set_current_dir(original).unwrap();

    let config = result.unwrap();
    assert_eq!(config.rules.minor, vec!["feat/.*"]);
    assert!(config
        .path
        .as_deref()
        .is_some_and(|p| p.ends_with("Cargo.toml")));
}
