//! Integration tests for the holosoma-plugins CLI library.
//!
//! A config file points discovery at a temporary plugin directory and the
//! listing and host checks run against what was found there.

use holosoma_plugin_api::{PluginHost, Symbols};
use holosoma_plugins::config::Config;
use holosoma_plugins::listing;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

// ==============================================================================
// Test Fixture Helpers
// ==============================================================================

fn write_package(dir: &Path, name: &str, body: &str) {
    let package_dir = dir.join(name);
    std::fs::create_dir_all(&package_dir).unwrap();
    std::fs::write(
        package_dir.join("manifest.toml"),
        format!("[package]\nname = \"{name}\"\nversion = \"0.1.0\"\n\n{body}"),
    )
    .unwrap();
}

fn plugin_dir() -> TempDir {
    let dir = TempDir::new().unwrap();

    write_package(
        dir.path(),
        "holosoma-core",
        r#"[entry_points."holosoma.bridge"]
basic = "holosoma.bridge.basic:BasicSdk2Bridge"

[entry_points."holosoma.sdk"]
unitree = "holosoma.sdk.unitree:UnitreeInterface"
booster = "holosoma.sdk.booster:BoosterInterface"
"#,
    );
    write_package(
        dir.path(),
        "holosoma-ext-ros2",
        r#"[entry_points."holosoma.sdk"]
ros2 = "holosoma_ext_ros2.sdk:Ros2Interface"
"#,
    );

    dir
}

fn config_for(dir: &Path) -> (NamedTempFile, Config) {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "[discovery]\nsearch_paths = [{:?}]\ninclude_default_paths = false\n",
        dir.display().to_string()
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    (file, config)
}

// ==============================================================================
// Listing
// ==============================================================================

#[test]
fn test_list_from_configured_directory() {
    let dir = plugin_dir();
    let (_file, config) = config_for(dir.path());

    let rows = listing::collect(&config.search_paths(), None).unwrap();
    let names: Vec<_> = rows.iter().map(|r| format!("{}:{}", r.group, r.name)).collect();

    assert_eq!(
        names,
        vec![
            "holosoma.bridge:basic",
            "holosoma.sdk:booster",
            "holosoma.sdk:ros2",
            "holosoma.sdk:unitree",
        ]
    );
}

#[test]
fn test_list_empty_directory() {
    let dir = TempDir::new().unwrap();
    let (_file, config) = config_for(dir.path());

    let rows = listing::collect(&config.search_paths(), None).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_list_malformed_manifest_fails() {
    let dir = plugin_dir();
    write_package(dir.path(), "broken", "[entry_points\n");
    let (_file, config) = config_for(dir.path());

    assert!(listing::collect(&config.search_paths(), None).is_err());
}

// ==============================================================================
// Check
// ==============================================================================

#[test]
fn test_check_known_and_unknown_names() {
    let dir = plugin_dir();
    let (_file, config) = config_for(dir.path());

    let host = PluginHost::discover(&config.search_paths(), Symbols::new()).unwrap();

    assert!(host.check("holosoma.sdk", "ros2").is_ok());

    let err = host.check("holosoma.sdk", "z").unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(
        err.to_string(),
        "Unsupported sdk_type: z. Available: [booster, ros2, unitree]"
    );
}
