//! Integration tests for loading a runtime from a directory plus environment.
//!
//! Every test injects its own environment map, so the real process
//! environment is never read or modified.

use samp_runtime_env::config::{
    DEFAULT_HOSTNAME, DEFAULT_PORT, EnvSnapshot, OverlayWarning, PluginVersion, Runtime,
    RuntimeLoader, overlay,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn env(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn server_json() -> &'static str {
    r#"{
    "gamemodes": ["grandlarc"],
    "filterscripts": ["base"],
    "plugins": ["streamer", "Zeex/samp-plugin-crashdetect:v4.19.4"],
    "hostname": "File Server",
    "port": 8080,
    "rcon_password": "hunter2",
    "announce": false
}"#
}

fn server_dir(contents: &str, file: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(file), contents).unwrap();
    temp
}

fn load(dir: &Path, vars: &[(&str, &str)]) -> RuntimeLoader {
    RuntimeLoader::load_with_env(dir, &env(vars)).expect("runtime should load")
}

#[test]
fn test_file_values_survive_without_environment() {
    let temp = server_dir(server_json(), "samp.json");
    let rt = load(temp.path(), &[]).into_runtime();

    assert_eq!(rt.hostname.as_deref(), Some("File Server"));
    assert_eq!(rt.port, Some(8080));
    assert_eq!(rt.announce, Some(false));
    // Filled by defaults
    assert_eq!(rt.maxplayers, Some(50));
}

#[test]
fn test_environment_beats_file() {
    let temp = server_dir(server_json(), "samp.json");
    let rt = load(
        temp.path(),
        &[
            ("SAMP_PORT", "7777"),
            ("SAMP_HOSTNAME", "Env Server"),
            ("SAMP_ANNOUNCE", "true"),
        ],
    )
    .into_runtime();

    assert_eq!(rt.port, Some(7777));
    assert_eq!(rt.hostname.as_deref(), Some("Env Server"));
    assert_eq!(rt.announce, Some(true));
}

#[test]
fn test_environment_beats_defaults() {
    let temp = server_dir("gamemodes:\n  - rivershell\n", "samp.yaml");
    let rt = load(
        temp.path(),
        &[("SAMP_MAXPLAYERS", "100"), ("SAMP_STREAM_DISTANCE", "350.5")],
    )
    .into_runtime();

    assert_eq!(rt.maxplayers, Some(100));
    assert_eq!(rt.stream_distance, Some(350.5));
    assert_eq!(rt.hostname.as_deref(), Some(DEFAULT_HOSTNAME));
    assert_eq!(rt.port, Some(DEFAULT_PORT));
}

#[test]
fn test_malformed_value_keeps_file_value_and_warns() {
    let temp = server_dir(server_json(), "samp.json");
    let loader = load(temp.path(), &[("SAMP_PORT", "notanumber")]);

    assert_eq!(loader.runtime().port, Some(8080));
    let warnings: Vec<_> = loader.report().warnings_for("port").collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].to_string().contains("notanumber"));
}

#[test]
fn test_list_variables_are_ignored_with_warning() {
    let temp = server_dir(server_json(), "samp.json");
    let loader = load(
        temp.path(),
        &[
            ("SAMP_GAMEMODES", "other"),
            ("SAMP_FILTERSCRIPTS", "a,b"),
            ("SAMP_PLUGINS", "mysql"),
        ],
    );

    let rt = loader.runtime();
    assert_eq!(rt.gamemodes, vec!["grandlarc".to_string()]);
    assert_eq!(rt.filterscripts, vec!["base".to_string()]);
    assert_eq!(rt.plugins.len(), 2);

    let report = loader.report();
    assert_eq!(report.warnings.len(), 3);
    assert!(
        report
            .warnings
            .iter()
            .all(|w| matches!(w, OverlayWarning::NotYetSupported { .. }))
    );
}

#[test]
fn test_remote_plugins_resolved_after_load() {
    let temp = server_dir(server_json(), "samp.json");
    let rt = load(temp.path(), &[]).into_runtime();

    assert_eq!(rt.plugin_deps.len(), 1);
    assert_eq!(rt.plugin_deps[0].user, "Zeex");
    assert_eq!(
        rt.plugin_deps[0].version,
        PluginVersion::Tag("v4.19.4".into())
    );
}

#[test]
fn test_platform_is_stamped() {
    let temp = server_dir(server_json(), "samp.json");
    let rt = load(temp.path(), &[]).into_runtime();
    assert_eq!(rt.platform, std::env::consts::OS);
}

#[test]
fn test_environment_can_fail_validation() {
    let temp = server_dir(server_json(), "samp.json");
    let err = RuntimeLoader::load_with_env(temp.path(), &env(&[("SAMP_PORT", "0")])).unwrap_err();

    assert_eq!(err.to_string(), "runtime configuration validation failed");
    assert!(format!("{:#}", err).contains("port must be between 1 and 65535"));
}

#[test]
fn test_changeme_password_from_environment_is_rejected() {
    let temp = server_dir(server_json(), "samp.json");
    let err = Runtime::from_environment_with(
        temp.path(),
        &env(&[("SAMP_RCON_PASSWORD", "changeme")]),
    )
    .unwrap_err();
    assert!(format!("{:#}", err).contains("changeme"));
}

#[test]
fn test_snapshot_source_matches_map_source() {
    let temp = server_dir(server_json(), "samp.json");
    let vars = [("SAMP_PORT", "9000"), ("HOME", "/root"), ("SAMP_QUERY", "0")];

    let from_map = Runtime::from_environment_with(temp.path(), &env(&vars)).unwrap();
    let from_snapshot =
        Runtime::from_environment_with(temp.path(), &EnvSnapshot::from_vars(vars)).unwrap();

    assert_eq!(from_map, from_snapshot);
    assert_eq!(from_snapshot.query, Some(false));
}

#[test]
fn test_overlay_on_loaded_runtime_is_idempotent() {
    let temp = server_dir(server_json(), "samp.json");
    let vars = env(&[
        ("SAMP_PORT", "7000"),
        ("SAMP_LANMODE", "yes"),
        ("SAMP_SLEEP", "x"),
    ]);

    let mut once = Runtime::from_dir(temp.path()).unwrap();
    overlay(&mut once, &vars);
    let mut twice = once.clone();
    let report = overlay(&mut twice, &vars);

    assert_eq!(once, twice);
    assert_eq!(report.warnings_for("sleep").count(), 1);
}

#[cfg(unix)]
#[test]
fn test_non_unicode_variable_keeps_file_value_and_warns() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let temp = server_dir(server_json(), "samp.json");
    let snapshot = EnvSnapshot::from_vars([(
        "SAMP_HOSTNAME",
        OsString::from_vec(b"Caf\xe9 Server".to_vec()),
    )]);
    let loader = RuntimeLoader::load_with_env(temp.path(), &snapshot).unwrap();

    assert_eq!(loader.runtime().hostname.as_deref(), Some("File Server"));
    let warnings: Vec<_> = loader.report().warnings_for("hostname").collect();
    assert_eq!(warnings.len(), 1);
    assert!(matches!(warnings[0], OverlayWarning::Malformed { .. }));
    assert!(warnings[0].to_string().contains("SAMP_HOSTNAME"));
}
