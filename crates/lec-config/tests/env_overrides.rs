//! Environment variables take precedence over TOML files.

use figment::Jail;
use lec_config::{ConfigError, LecternConfig};

#[test]
fn env_overrides_nested_values() {
    Jail::expect_with(|jail| {
        jail.set_env("LECTERN_TOOLCHAIN__BINARY", "/opt/forge");
        jail.set_env("LECTERN_WORKSPACE__ROOT", "/tmp/ws");

        let config = LecternConfig::load().expect("config loads");
        assert_eq!(config.toolchain.binary, "/opt/forge");
        assert_eq!(config.workspace.root, "/tmp/ws");
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".lectern")?;
        jail.create_file(
            ".lectern/config.toml",
            r#"
[toolchain]
compile_timeout_secs = 5
"#,
        )?;
        jail.set_env("LECTERN_TOOLCHAIN__COMPILE_TIMEOUT_SECS", "45");

        let config = LecternConfig::load().expect("config loads");
        assert_eq!(config.toolchain.compile_timeout_secs, 45);
        Ok(())
    });
}

#[test]
fn invalid_env_value_fails_validation() {
    Jail::expect_with(|jail| {
        jail.set_env("LECTERN_TOOLCHAIN__COMPILE_TIMEOUT_SECS", "0");

        let result = LecternConfig::load();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        Ok(())
    });
}
