//! Integration tests for formwork-config

use formwork_config::*;
use serde::Deserialize;
use std::io::Write;

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
struct EngineSettings {
    stop_policy: String,
    character_encoding: String,
    strict_dependencies: bool,
    custom_rules: Vec<String>,
}

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn test_toml_file_then_env_file() {
    let dir = tempfile::tempdir().unwrap();
    let toml = write_file(
        &dir,
        "engine.toml",
        r#"
        stop_policy = "continue_all"
        character_encoding = "UTF-8"
        custom_rules = ["zip_code"]
        "#,
    );
    let env = write_file(
        &dir,
        "override.env",
        "STOP_POLICY=stop_all_if_any\nSTRICT_DEPENDENCIES=true\n",
    );

    let settings: EngineSettings = ConfigBuilder::new()
        .hint("strict_dependencies", ValueHint::Bool)
        .add_file(&toml)
        .add_file(&env)
        .build()
        .unwrap();

    assert_eq!(
        settings,
        EngineSettings {
            stop_policy: "stop_all_if_any".into(),
            character_encoding: "UTF-8".into(),
            strict_dependencies: true,
            custom_rules: vec!["zip_code".into()],
        }
    );
}

#[test]
fn test_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let json = write_file(
        &dir,
        "engine.json",
        r#"{"character_encoding": "Shift_JIS", "custom_rules": []}"#,
    );

    let settings: EngineSettings = ConfigBuilder::new().add_file(&json).build().unwrap();
    assert_eq!(settings.character_encoding, "Shift_JIS");
    assert!(settings.custom_rules.is_empty());
}

#[test]
fn test_missing_file() {
    let result: Result<EngineSettings> = ConfigBuilder::new()
        .add_file("/nonexistent/formwork/engine.toml")
        .build();

    assert!(matches!(result, Err(ConfigError::LoadError(_))));
}

#[test]
fn test_unknown_extension() {
    let result: Result<EngineSettings> = ConfigBuilder::new().add_file("engine.ini").build();
    assert!(matches!(result, Err(ConfigError::LoadError(_))));
}
