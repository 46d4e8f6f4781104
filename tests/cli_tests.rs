use std::fs;
use std::process::Output;

use assert_cmd::Command;
use tempfile::TempDir;

fn vidchew(cwd: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vidchew").unwrap();
    cmd.current_dir(cwd.path())
        .env_remove("VIDCHEW_CONFIG")
        .env_remove("VIDCHEW_DRY_RUN")
        .env_remove("VIDCHEW_DEST_DIR")
        .env_remove("VIDCHEW_TARGET_LANGUAGE")
        .env_remove("RUST_LOG");
    cmd
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_help_lists_commands() {
    let temp = TempDir::new().unwrap();
    let output = vidchew(&temp).arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("run"));
    assert!(stdout.contains("inspect"));
}

#[test]
fn test_conflicting_audio_modes_fail_before_processing() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("vidchew.toml"),
        "log_file = true\n[audio.reencode]\nenabled = true\n[audio.downmix]\nenabled = true\n",
    )
    .unwrap();

    let output = vidchew(&temp).args(["run", "."]).output().unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("cannot both be enabled"));
    // Nothing ran, so no log file was opened
    let logs = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".log"))
        .count();
    assert_eq!(logs, 0);
}

#[test]
fn test_missing_destination_directory_is_fatal() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nowhere");

    let output = vidchew(&temp)
        .args(["run", "."])
        .arg("--dest-dir")
        .arg(&missing)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("does not exist"));
}

#[test]
fn test_missing_input_folder_is_fatal() {
    let temp = TempDir::new().unwrap();
    let output = vidchew(&temp).args(["run", "no-such-folder"]).output().unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Input folder does not exist"));
}

#[test]
fn test_dry_run_on_empty_folder_writes_log_file() {
    let temp = TempDir::new().unwrap();
    let media = temp.path().join("media");
    fs::create_dir(&media).unwrap();

    let output = vidchew(&temp)
        .arg("run")
        .arg(&media)
        .arg("--dry-run")
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("Dry run enabled"));

    let logs: Vec<String> = fs::read_dir(&media)
        .unwrap()
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(logs.len(), 1);
    assert!(logs[0].starts_with("vidchew-"));
    assert!(logs[0].ends_with(".log"));
}

#[test]
fn test_inspect_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    let output = vidchew(&temp)
        .args(["inspect", "missing.mkv"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("missing.mkv"));
}
