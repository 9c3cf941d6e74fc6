//! Integration tests for p4reg

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn p4reg() -> Command {
        let mut cmd = cargo_bin_cmd!("p4reg");
        cmd.env_remove("P4REG_CONFIG")
            .env("P4REG_NON_INTERACTIVE", "1");
        cmd
    }

    fn write_config(dir: &Path, p4_program: &str) -> std::path::PathBuf {
        let path = dir.join("config.toml");
        let registry = dir.join("registry");
        std::fs::create_dir_all(&registry).unwrap();
        let content = format!(
            "[registry]\nregistry_path = {:?}\nworkspace = \"pkg_ws\"\np4_program = {:?}\ncache_dir = {:?}\n",
            registry.display().to_string(),
            p4_program,
            dir.join("lookup").display().to_string(),
        );
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn help_displays() {
        p4reg()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Perforce-backed package registry"));
    }

    #[test]
    fn version_displays() {
        p4reg()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("p4reg"));
    }

    #[test]
    fn config_path_follows_flag() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");

        p4reg()
            .arg("--config")
            .arg(&path)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("custom.toml"));
    }

    #[test]
    fn config_show_defaults() {
        let temp = TempDir::new().unwrap();

        p4reg()
            .arg("--config")
            .arg(temp.path().join("absent.toml"))
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[registry]"))
            .stdout(predicate::str::contains("dev_tag = \"dev\""));
    }

    #[test]
    fn config_set_then_show() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        p4reg()
            .arg("--config")
            .arg(&path)
            .args(["config", "set", "registry.workspace", "pkg_ws"])
            .assert()
            .success();

        p4reg()
            .arg("--config")
            .arg(&path)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("workspace = \"pkg_ws\""));
    }

    #[test]
    fn config_set_unknown_key_fails() {
        let temp = TempDir::new().unwrap();

        p4reg()
            .arg("--config")
            .arg(temp.path().join("config.toml"))
            .args(["config", "set", "registry.colour", "blue"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn lookup_without_config_suggests_configure() {
        let temp = TempDir::new().unwrap();

        p4reg()
            .arg("--config")
            .arg(temp.path().join("absent.toml"))
            .args(["lookup", "widget"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("registry.registry_path"))
            .stderr(predicate::str::contains("p4reg configure"));
    }

    #[test]
    fn lookup_invalid_name_is_not_retriable() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "p4");

        p4reg()
            .arg("--config")
            .arg(&config)
            .args(["lookup", "../secrets"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid package name"))
            .stderr(predicate::str::contains("retriable").not());
    }

    #[test]
    fn missing_p4_is_retriable() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "/nonexistent/bin/p4");

        p4reg()
            .arg("--config")
            .arg(&config)
            .args(["lookup", "widget"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to run"))
            .stderr(predicate::str::contains("(retriable)"));
    }

    #[test]
    fn cache_path_uses_configured_dir() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "p4");

        p4reg()
            .arg("--config")
            .arg(&config)
            .args(["cache", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("lookup"));
    }

    #[test]
    fn cache_clear_empty() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "p4");

        p4reg()
            .arg("--config")
            .arg(&config)
            .args(["cache", "clear", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed 0"));
    }

    #[cfg(unix)]
    #[test]
    fn lookup_against_scripted_p4() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let script = temp.path().join("p4");
        std::fs::write(
            &script,
            concat!(
                "#!/bin/sh\n",
                "case \"$*\" in\n",
                "  \"set P4CLIENT\") echo \"P4CLIENT=pkg_ws (set)\" ;;\n",
                "  *\" labels \"*) echo \"Label 1.0.0 2024/01/01 'Release '\" ;;\n",
                "  *\" changes \"*) echo \"Change 42 on 2024/02/11 by jdoe@pkg_ws 'Update '\" ;;\n",
                "  *) echo \"unexpected: $*\" >&2; exit 1 ;;\n",
                "esac\n",
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        let config = write_config(temp.path(), &script.display().to_string());

        p4reg()
            .arg("--config")
            .arg(&config)
            .args(["lookup", "acme/widget", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::diff("1.0.0\ndev\n"));

        p4reg()
            .arg("--config")
            .arg(&config)
            .args(["lookup", "acme/widget", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"latest\": \"1.0.0\""))
            .stdout(predicate::str::contains("\"stable\": false"));

        assert!(temp.path().join("lookup").join("acme").join("widget.json").exists());
    }
}
