use super::{load_cli_config, validate_cli_config, CliConfig, ConfigError, ProcessManagerConfig};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[test]
fn load_cli_config_parses_yaml_with_manager() {
    let path = write_temp_file(
        "cli-config-ok",
        "yaml",
        r#"
schema: oapip-cli/0.0.1
max_schema_depth: 16
validate_input_schemas: false
manager:
  name: TinyDB
  connection: /tmp/process-jobs.db
  output_dir: /tmp
"#,
    );

    let config = load_cli_config(path.as_path()).expect("config must load");
    assert_eq!(config.max_schema_depth, 16);
    assert_eq!(config.schema_options().max_depth, 16);
    assert!(!config.conformance_options().validate_schemas);
    assert_eq!(
        config.manager.as_ref().map(|manager| manager.name.as_str()),
        Some("TinyDB")
    );
}

#[test]
fn load_cli_config_fills_defaults_from_json() {
    let path = write_temp_file("cli-config-json", "json", r#"{ "schema": "oapip-cli/0.0.1" }"#);
    let config = load_cli_config(path.as_path()).expect("config must load");
    assert_eq!(config, CliConfig::default());
}

#[test]
fn load_cli_config_reports_every_validation_issue() {
    let path = write_temp_file(
        "cli-config-invalid",
        "yaml",
        r#"
schema: oapip-cli/9
max_schema_depth: 0
manager:
  name: TinyDB
  connection: " "
  output_dir: /tmp
"#,
    );

    match load_cli_config(path.as_path()).expect_err("must reject") {
        ConfigError::Validation(issues) => {
            let references = issues
                .iter()
                .filter_map(|issue| issue.reference.as_deref())
                .collect::<Vec<_>>();
            assert_eq!(issues.len(), 3);
            assert!(references.contains(&"cli.config.schema"));
            assert!(references.contains(&"cli.config.max_schema_depth.range"));
            assert!(references.contains(&"cli.config.manager.non_empty"));
            assert!(issues
                .iter()
                .any(|issue| issue.field_path.to_string() == "$.manager.connection"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn load_cli_config_reports_missing_file_and_bad_syntax() {
    let missing = std::env::temp_dir().join("oapip-cli-config-does-not-exist.yaml");
    assert!(matches!(
        load_cli_config(missing.as_path()),
        Err(ConfigError::ReadFile { .. })
    ));

    let path = write_temp_file("cli-config-syntax", "json", "{ \"schema\": ");
    assert!(matches!(
        load_cli_config(path.as_path()),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn load_cli_config_expands_env_placeholders() {
    let env_key = format!("OAPIP_CLI_TEST_OUTPUT_DIR_{}", std::process::id());
    let env_value = "/var/lib/oapip";
    unsafe {
        std::env::set_var(env_key.as_str(), env_value);
    }

    let path = write_temp_file(
        "cli-config-env",
        "yaml",
        format!(
            r#"
schema: oapip-cli/0.0.1
manager:
  name: TinyDB
  connection: jobs.db
  output_dir: ${{{env_key}}}
"#
        )
        .as_str(),
    );

    let config = load_cli_config(path.as_path()).expect("config must load");
    assert_eq!(
        config.manager.expect("manager").output_dir.as_str(),
        env_value
    );
}

#[test]
fn unset_env_placeholder_is_a_parse_error() {
    let path = write_temp_file(
        "cli-config-env-missing",
        "yaml",
        "schema: ${OAPIP_CLI_TEST_SURELY_UNSET_VARIABLE}\n",
    );
    match load_cli_config(path.as_path()).expect_err("must reject") {
        ConfigError::Parse(message) => assert!(message.contains("OAPIP_CLI_TEST_SURELY_UNSET_VARIABLE")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn validate_cli_config_accepts_well_formed_manager() {
    let config = CliConfig {
        manager: Some(ProcessManagerConfig {
            name: "PostgreSQL".to_string(),
            connection: "postgresql://localhost/jobs".to_string(),
            output_dir: "/srv/outputs".to_string(),
        }),
        ..CliConfig::default()
    };
    assert!(validate_cli_config(&config).is_empty());
}

fn write_temp_file(prefix: &str, extension: &str, content: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time must be monotonic")
        .as_nanos();
    path.push(format!(
        "oapip-{prefix}-{}-{nanos}.{extension}",
        std::process::id()
    ));
    fs::write(&path, content).expect("must write temp file");
    path
}
