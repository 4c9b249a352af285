//! Integration tests for rootenv

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn rootenv() -> Command {
        let mut cmd = cargo_bin_cmd!("rootenv");
        cmd.env_remove("ROOTENV_CONFIG");
        cmd
    }

    /// Config pointing at an `su` that cannot exist
    fn no_su_config(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[shell]\nsu_binary = \"/nonexistent/su\"\ngrant_timeout_secs = 2\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn help_displays() {
        rootenv()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Root environment discovery"));
    }

    #[test]
    fn version_displays() {
        rootenv()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("rootenv"));
    }

    #[test]
    fn config_path_honors_flag() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");

        rootenv()
            .arg("--config")
            .arg(&path)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("custom.toml"));
    }

    #[test]
    fn config_path_from_env() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("from-env.toml");

        rootenv()
            .env("ROOTENV_CONFIG", &path)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("from-env.toml"));
    }

    #[test]
    fn config_show_defaults() {
        let temp = TempDir::new().unwrap();

        rootenv()
            .arg("--config")
            .arg(temp.path().join("missing.toml"))
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[resolver]"))
            .stdout(predicate::str::contains("path_support_version = 26300"));
    }

    #[test]
    fn config_init_writes_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        rootenv()
            .arg("--config")
            .arg(&path)
            .args(["config", "init"])
            .assert()
            .success();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("su_binary"));
    }

    #[test]
    fn invalid_config_shows_hint() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[resolver]\nmax_transient_retries = \"many\"\n").unwrap();

        rootenv()
            .arg("--config")
            .arg(&path)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn path_fails_without_root_shell() {
        let temp = TempDir::new().unwrap();

        rootenv()
            .arg("--config")
            .arg(no_su_config(&temp))
            .arg("path")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Runtime path not resolved"));
    }

    #[test]
    fn status_json_without_root_shell() {
        let temp = TempDir::new().unwrap();

        rootenv()
            .arg("--config")
            .arg(no_su_config(&temp))
            .args(["status", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"failure\": \"NO_PATH\""))
            .stdout(predicate::str::contains("\"path\": null"))
            .stdout(predicate::str::contains("\"has_gotten_root_access\": false"));
    }

    #[test]
    fn path_flags_conflict() {
        rootenv()
            .args(["path", "--mirror", "--modules"])
            .assert()
            .failure();
    }
}
