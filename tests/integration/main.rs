//! Integration tests for MediSketch

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const HTA: &str = r#"{
        "id": "hta",
        "title": "Hypertension artérielle",
        "duration": "45 min",
        "sections": [
            {"id": "s1", "type": "heading", "content": "Définition"},
            {"id": "s2", "type": "highlight", "content": "PA ≥ 140/90 mmHg", "color": "pink"}
        ]
    }"#;

    /// A static origin plus a config file pointing at it
    struct Fixture {
        _temp: TempDir,
        config: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let public = temp.path().join("public");
            let subject = public.join("data").join("DCEM2").join("Cardiologie");
            fs::create_dir_all(&subject).unwrap();

            fs::write(public.join("index.html"), "<html>MediSketch shell</html>").unwrap();
            fs::write(public.join("manifest.json"), r#"{"name":"MediSketch"}"#).unwrap();
            fs::write(subject.join("hta.json"), HTA).unwrap();
            fs::write(
                subject.join("lectures.json"),
                r#"[{"id":"hta","title":"Hypertension artérielle","duration":"45 min","file":"hta.json"}]"#,
            )
            .unwrap();

            let config = temp.path().join("config.toml");
            fs::write(&config, config_toml(&public, &temp.path().join("cache"))).unwrap();

            Self {
                _temp: temp,
                config,
            }
        }

        fn cmd(&self) -> Command {
            let mut cmd = medisketch();
            cmd.arg("--config").arg(&self.config);
            cmd
        }
    }

    fn config_toml(public: &Path, cache: &Path) -> String {
        format!(
            "[origin]\nstatic_dir = '{}'\n\n[cache]\ndir = '{}'\nruntime_prefixes = [\"/data/\"]\n",
            public.display(),
            cache.display()
        )
    }

    fn medisketch() -> Command {
        let mut cmd = cargo_bin_cmd!("medisketch");
        cmd.env_remove("MEDISKETCH_CONFIG").env_remove("MEDISKETCH_ORIGIN");
        cmd
    }

    #[test]
    fn help_displays() {
        medisketch()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("offline"));
    }

    #[test]
    fn version_displays() {
        medisketch()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("medisketch"));
    }

    #[test]
    fn config_path_uses_flag() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");

        medisketch()
            .arg("--config")
            .arg(&path)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("custom.toml"));
    }

    #[test]
    fn config_show_lists_sections() {
        let fixture = Fixture::new();
        fixture
            .cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"))
            .stdout(predicate::str::contains("medisketch"));
    }

    #[test]
    fn install_then_offline_navigation() {
        let fixture = Fixture::new();

        fixture
            .cmd()
            .arg("install")
            .assert()
            .success()
            .stdout(predicate::str::contains("medisketch-v1 active"));

        fixture
            .cmd()
            .args(["--offline", "fetch", "/planner", "--document"])
            .assert()
            .success()
            .stdout(predicate::str::contains("offline-fallback"));

        fixture
            .cmd()
            .args(["--offline", "fetch", "/planner", "--document", "--body"])
            .assert()
            .success()
            .stdout(predicate::str::contains("MediSketch shell"));
    }

    #[test]
    fn offline_navigation_without_install_fails() {
        let fixture = Fixture::new();

        fixture
            .cmd()
            .args(["--offline", "fetch", "/planner", "--document"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error:"));
    }

    #[test]
    fn lecture_loads_offline_after_first_view() {
        let fixture = Fixture::new();
        fixture.cmd().arg("install").assert().success();

        fixture
            .cmd()
            .args(["load", "DCEM2", "Cardiologie", "lecture", "hta.json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Hypertension artérielle"));

        fixture
            .cmd()
            .args([
                "--offline",
                "load",
                "DCEM2",
                "Cardiologie",
                "lecture",
                "hta.json",
                "--format",
                "json",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"id\": \"hta\""));
    }

    #[test]
    fn missing_document_reports_not_found() {
        let fixture = Fixture::new();

        fixture
            .cmd()
            .args(["load", "DCEM2", "Cardiologie", "quiz", "absent.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Content not found"));
    }

    #[test]
    fn list_missing_index_is_empty() {
        let fixture = Fixture::new();

        fixture
            .cmd()
            .args(["list", "DCEM2", "Cardiologie", "quiz"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No QCM found"));
    }

    #[test]
    fn list_lectures_plain() {
        let fixture = Fixture::new();

        fixture
            .cmd()
            .args(["list", "DCEM2", "Cardiologie", "lecture", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("hta"));
    }

    #[test]
    fn cache_list_and_clear() {
        let fixture = Fixture::new();
        fixture.cmd().arg("install").assert().success();

        fixture
            .cmd()
            .args(["cache", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("medisketch-v1"));

        fixture
            .cmd()
            .args(["cache", "clear", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Deleted 1 generation(s)"));
    }
}
