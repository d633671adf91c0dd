use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("depfilter").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("FORCE_COLOR")
        .env_remove("CLICOLOR_FORCE");
    cmd
}

#[test]
fn check_excluded_version_exits_one() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["check", "torch", "1.12.5", "--python", "3.10", "--platform", "Windows"])
        .assert()
        .code(1)
        .stdout(contains("excluded"))
        .stdout(contains("line"));
}

#[test]
fn check_allowed_when_condition_does_not_hold() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["check", "torch", "1.12.5", "--python", "3.9", "--platform", "Windows"])
        .assert()
        .success()
        .stdout(contains("allowed"));
}

#[test]
fn check_series_json() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args([
            "--json", "check", "torch", "1.13.*", "--python", "3.10", "--platform", "windows",
        ])
        .assert()
        .code(1)
        .stdout(contains("\"excluded\": true"))
        .stdout(contains("\"package\": \"torch\""));
}

#[test]
fn check_without_python_version_is_an_error() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["check", "onnx", "1.14.0"])
        .assert()
        .code(2)
        .stderr(contains("error:"));
}

#[test]
fn check_picks_up_config_from_working_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("extra.txt"), "numpy != 1.25.0\n").unwrap();
    std::fs::write(
        dir.path().join("depfilter.toml"),
        "[environment]\npython_version = \"3.11\"\nplatform_system = \"Linux\"\n\n\
         [rules]\nfiles = [\"extra.txt\"]\n",
    )
    .unwrap();

    cmd(&dir)
        .args(["check", "numpy", "1.25.0"])
        .assert()
        .code(1)
        .stdout(contains("line 1: numpy !=1.25.0"));
    cmd(&dir).args(["check", "onnx", "1.14.0"]).assert().code(1);
}

#[test]
fn check_no_builtin_with_rules_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("rules.txt"),
        "# crashes on import\nrequests != 2.30.0\n",
    )
    .unwrap();

    cmd(&dir)
        .args([
            "check", "onnx", "1.14.0", "--python", "3.10", "--no-builtin", "--rules", "rules.txt",
        ])
        .assert()
        .success();
    cmd(&dir)
        .args([
            "check", "requests", "2.30.0", "--python", "3.10", "--no-builtin", "--rules",
            "rules.txt",
        ])
        .assert()
        .code(1)
        .stdout(contains("crashes on import"));
}

#[test]
fn select_highest_allowed() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args([
            "select", "torch", "1.11.0", "1.12.1", "2.0.1", "--python", "3.10", "--platform",
            "Windows",
        ])
        .assert()
        .success()
        .stdout(contains("1.11.0"));
}

#[test]
fn select_json_lists_allowed_versions() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args([
            "--json", "select", "torch", "2.0.1", "2.1.0rc1", "--python", "3.11", "--platform",
            "Linux", "--pre",
        ])
        .assert()
        .success()
        .stdout(contains("\"selected\": \"2.1.0rc1\""))
        .stdout(contains("\"2.0.1\""));
}

#[test]
fn select_nothing_allowed_exits_one() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["select", "onnx", "1.14.0", "--python", "3.10"])
        .assert()
        .code(1)
        .stderr(contains("no allowed version of onnx"));
}

#[test]
fn lint_reports_counts_and_errors() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("good.txt"),
        "onnx != 1.14.0\nipython != 8.13.0; python_version < '3.9'\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("bad.txt"), "onnx != 1.14.0\ntorch => 2.0\n").unwrap();

    cmd(&dir)
        .args(["lint", "good.txt"])
        .assert()
        .success()
        .stdout(contains("2 constraints"));
    cmd(&dir)
        .args(["lint", "good.txt", "bad.txt"])
        .assert()
        .code(1)
        .stdout(contains("Unknown operator `=>` on line 2"));
}

#[test]
fn lint_json() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.txt"), "torch != 2.0.1 python_version\n").unwrap();

    cmd(&dir)
        .args(["--json", "lint", "bad.txt"])
        .assert()
        .code(1)
        .stdout(contains("\"line\": 1"));
}

#[test]
fn piped_output_has_no_color_codes() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["check", "torch", "1.12.5", "--python", "3.10", "--platform", "Windows"])
        .assert()
        .code(1)
        .stdout(contains("torch 1.12.5: excluded"))
        .stdout(contains("\u{1b}[").not());
    cmd(&dir)
        .args(["select", "onnx", "1.14.0", "--python", "3.10"])
        .assert()
        .code(1)
        .stderr(contains("error: no allowed version of onnx"));
}
