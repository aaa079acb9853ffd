use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use cibctl_core::logging_facility::Profile;
use cibctl_store::config::{DEFAULT_CIB_FILE, ENV_CIB_FILE, ENV_CONFIG};
use cibctl_store::StoreConfig;
use tempfile::TempDir;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn write_config(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_default_without_any_source() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig::resolve(None, env_of(&[]), dir.path()).unwrap();

    assert_eq!(config.cib_path(), PathBuf::from(DEFAULT_CIB_FILE));
}

#[test]
fn test_local_config_file_is_used() {
    let dir = TempDir::new().unwrap();
    write_config(
        dir.path(),
        "cibctl.toml",
        "cib_file = \"/srv/cib.xml\"\nlog_profile = \"production\"\n",
    );

    let config = StoreConfig::resolve(None, env_of(&[]), dir.path()).unwrap();

    assert_eq!(config.cib_path(), PathBuf::from("/srv/cib.xml"));
    assert_eq!(config.log_profile().unwrap(), Profile::Production);
}

#[test]
fn test_env_overrides_config_file() {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "cibctl.toml", "cib_file = \"/srv/cib.xml\"\n");

    let config =
        StoreConfig::resolve(None, env_of(&[(ENV_CIB_FILE, "/env/cib.xml")]), dir.path()).unwrap();

    assert_eq!(config.cib_path(), PathBuf::from("/env/cib.xml"));
}

#[test]
fn test_flag_overrides_env() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig::resolve(
        Some(Path::new("/flag/cib.xml")),
        env_of(&[(ENV_CIB_FILE, "/env/cib.xml")]),
        dir.path(),
    )
    .unwrap();

    assert_eq!(config.cib_path(), PathBuf::from("/flag/cib.xml"));
}

#[test]
fn test_explicit_config_path_replaces_local_file() {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "cibctl.toml", "cib_file = \"/local.xml\"\n");
    let other = write_config(dir.path(), "other.toml", "cib_file = \"/other.xml\"\n");

    let config = StoreConfig::resolve(
        None,
        env_of(&[(ENV_CONFIG, other.to_str().unwrap())]),
        dir.path(),
    )
    .unwrap();

    assert_eq!(config.cib_path(), PathBuf::from("/other.xml"));
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let err = StoreConfig::resolve(
        None,
        env_of(&[(ENV_CONFIG, missing.to_str().unwrap())]),
        dir.path(),
    )
    .unwrap_err();

    assert_eq!(err.code(), "ERR_IO");
}

#[test]
fn test_invalid_local_config_is_reported() {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "cibctl.toml", "cib_file = [1, 2]\n");

    let err = StoreConfig::resolve(None, env_of(&[]), dir.path()).unwrap_err();

    assert_eq!(err.code(), "ERR_INVALID_INPUT");
    assert!(err.message().contains("cibctl.toml"));
}
