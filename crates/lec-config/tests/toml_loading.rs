//! Integration tests for TOML configuration loading.
//!
//! Uses `figment::Jail` for sandboxed file and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use lec_config::LecternConfig;
use pretty_assertions::assert_eq;

#[test]
fn loads_workspace_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[workspace]
root = "/srv/lectern/workspaces"
reference_projects_root = "/srv/lectern/reference"
fallback_library_path = "/opt/foundry/lib"
templates_dir = "/srv/lectern/templates"
dependencies = ["forge-std", "solmate"]
"#,
        )?;

        let config: LecternConfig = Figment::from(Serialized::defaults(LecternConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.workspace.root, "/srv/lectern/workspaces");
        assert_eq!(
            config.workspace.reference_projects_root,
            "/srv/lectern/reference"
        );
        assert_eq!(config.workspace.fallback_library_path, "/opt/foundry/lib");
        assert_eq!(config.workspace.templates_dir, "/srv/lectern/templates");
        assert_eq!(config.workspace.dependencies, vec!["forge-std", "solmate"]);
        Ok(())
    });
}

#[test]
fn loads_toolchain_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[toolchain]
binary = "/usr/local/bin/forge"
compile_timeout_secs = 10
test_timeout_secs = 20
force_rebuild = false
"#,
        )?;

        let config: LecternConfig = Figment::from(Serialized::defaults(LecternConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.toolchain.binary, "/usr/local/bin/forge");
        assert_eq!(config.toolchain.compile_timeout_secs, 10);
        assert_eq!(config.toolchain.test_timeout_secs, 20);
        assert!(!config.toolchain.force_rebuild);
        Ok(())
    });
}

#[test]
fn partial_sections_keep_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[toolchain]
test_timeout_secs = 90
"#,
        )?;

        let config: LecternConfig = Figment::from(Serialized::defaults(LecternConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.toolchain.test_timeout_secs, 90);
        assert_eq!(config.toolchain.compile_timeout_secs, 30);
        assert_eq!(config.toolchain.binary, "forge");
        assert_eq!(config.database.path, ".lectern/lectern.db");
        Ok(())
    });
}

#[test]
fn project_local_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".lectern")?;
        jail.create_file(
            ".lectern/config.toml",
            r#"
[database]
path = "custom.db"
"#,
        )?;

        let config = LecternConfig::load().expect("config loads");
        assert_eq!(config.database.path, "custom.db");
        Ok(())
    });
}
