// End-to-end tests for the rhythms binary.

use std::io::Write;
use std::process::{Command, Stdio};

fn write_config(project_root: &std::path::Path, state_dir: &std::path::Path) {
    let config_dir = project_root.join(".rhythms");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        format!("[store]\nbase_dir = \"{}\"\n", state_dir.display()),
    )
    .unwrap();
}

#[test]
fn cli_help_displays_correctly() {
    let output = Command::new(env!("CARGO_BIN_EXE_rhythms"))
        .arg("--help")
        .output()
        .expect("failed to run rhythms --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("standup"));
    assert!(stdout.contains("history"));
    assert!(stdout.contains("blockers"));
    assert!(stdout.contains("config"));
}

#[test]
fn standup_help_shows_options() {
    let output = Command::new(env!("CARGO_BIN_EXE_rhythms"))
        .args(["standup", "--help"])
        .output()
        .expect("failed to run rhythms standup --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--sample"));
    assert!(stdout.contains("--activity"));
    assert!(stdout.contains("--date"));
}

#[test]
fn sample_cycle_finalizes_and_is_recorded() {
    let td = tempfile::tempdir().unwrap();
    write_config(td.path(), &td.path().join("state"));
    let cd = td.path().to_string_lossy().into_owned();

    let mut child = Command::new(env!("CARGO_BIN_EXE_rhythms"))
        .args(["standup", "--sample", "--date", "2026-08-05", "--cd", &cd])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn rhythms standup");

    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(b"looks good\n")
        .unwrap();

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("FINAL STANDUP:"));
    assert!(stdout.contains("## Accomplishments"));
    assert!(stdout.contains("## Blockers"));
    assert!(stdout.contains("## Plans"));

    let history = Command::new(env!("CARGO_BIN_EXE_rhythms"))
        .args(["history", "--days", "3650", "--cd", &cd])
        .output()
        .unwrap();
    assert!(history.status.success());
    let history_out = String::from_utf8_lossy(&history.stdout);
    assert!(history_out.contains("2026-08-05"));
    assert!(history_out.contains("submitted"));

    let blockers = Command::new(env!("CARGO_BIN_EXE_rhythms"))
        .args(["blockers", "--cd", &cd])
        .output()
        .unwrap();
    assert!(blockers.status.success());
    assert!(
        String::from_utf8_lossy(&blockers.stdout)
            .contains("Waiting on vendor API quota increase")
    );
}

#[test]
fn aborted_cycle_records_nothing() {
    let td = tempfile::tempdir().unwrap();
    write_config(td.path(), &td.path().join("state"));
    let cd = td.path().to_string_lossy().into_owned();

    // Closing stdin without a reply is an operator abort.
    let output = Command::new(env!("CARGO_BIN_EXE_rhythms"))
        .args(["standup", "--sample", "--cd", &cd])
        .stdin(Stdio::null())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let history = Command::new(env!("CARGO_BIN_EXE_rhythms"))
        .args(["history", "--cd", &cd])
        .output()
        .unwrap();
    assert!(
        String::from_utf8_lossy(&history.stdout).contains("no standups recorded")
    );
}

#[test]
fn config_init_then_validate() {
    let td = tempfile::tempdir().unwrap();
    let cd = td.path().to_string_lossy().into_owned();

    let init = Command::new(env!("CARGO_BIN_EXE_rhythms"))
        .args(["config", "init", "--cd", &cd])
        .output()
        .unwrap();
    assert!(init.status.success());

    let validate = Command::new(env!("CARGO_BIN_EXE_rhythms"))
        .args(["config", "validate", "--cd", &cd])
        .output()
        .unwrap();
    assert!(validate.status.success());
    assert!(String::from_utf8_lossy(&validate.stdout).contains("config OK"));

    // Re-running init must refuse to clobber the existing file.
    let again = Command::new(env!("CARGO_BIN_EXE_rhythms"))
        .args(["config", "init", "--cd", &cd])
        .output()
        .unwrap();
    assert!(!again.status.success());
}
