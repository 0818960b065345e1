use std::fs;

use serial_test::serial;
use tempfile::TempDir;

use git_semtag::config::{load_config, Config};
use git_semtag::SemtagError;

#[test]
fn test_defaults_when_no_file_exists() {
    let config = load_config(None).expect("Should load default config");
    assert_eq!(config.remote, "origin");
    assert_eq!(config, Config::default());
}

#[test]
fn test_explicit_path_overrides_remote() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gitsemtag.toml");
    fs::write(&path, "remote = \"upstream\"\n").unwrap();

    let config = load_config(path.to_str()).expect("Should load config file");
    assert_eq!(config.remote, "upstream");
}

#[test]
fn test_missing_explicit_path_is_an_error() {
    let result = load_config(Some("/nonexistent/gitsemtag.toml"));
    assert!(matches!(result, Err(SemtagError::Io(_))));
}

#[test]
fn test_unparseable_file_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gitsemtag.toml");
    fs::write(&path, "remote = [not valid toml").unwrap();

    let result = load_config(path.to_str());
    assert!(matches!(result, Err(SemtagError::Config(_))));
}

#[test]
#[serial]
fn test_file_in_working_directory_is_picked_up() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("gitsemtag.toml"), "remote = \"mirror\"\n").unwrap();

    let original_dir = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let config = load_config(None);
    std::env::set_current_dir(original_dir).unwrap();

    assert_eq!(config.unwrap().remote, "mirror");
}
