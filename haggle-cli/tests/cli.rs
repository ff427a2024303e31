use std::io::Write;
use std::process::{Command, Stdio};

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "haggle-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn haggle() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_haggle"));
    command.env_remove("HAGGLE_ITEM_NAMES");
    command
}

#[test]
fn cli_autoplay_writes_json_report() {
    let output_path = temp_path("autoplay");
    let status = haggle()
        .args([
            "--autoplay",
            "bargain",
            "--seed",
            "7",
            "--leaderboard",
            "memory",
            "--name",
            "Bot",
            "--report",
            "json",
            "--output",
        ])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());

    let content = std::fs::read_to_string(&output_path).expect("read output");
    let report: serde_json::Value = serde_json::from_str(&content).expect("json report");
    assert_eq!(report["seed"], 7);
    assert_eq!(report["strategy"], "bargain");
    assert_eq!(report["completed"], true);
    assert_eq!(report["day"], 30);
    assert_eq!(report["units_unsold"], 0);
    assert_eq!(report["rank"], 1);
    assert_eq!(report["leaderboard"][0]["name"], "Bot");
    assert_eq!(report["leaderboard"][0]["score"], report["final_score"]);
}

#[test]
fn cli_autoplay_is_reproducible_by_seed() {
    let run = || {
        let output = haggle()
            .args([
                "--variant",
                "lean",
                "--autoplay",
                "random",
                "--seed",
                "99",
                "--leaderboard",
                "off",
                "--report",
                "json",
            ])
            .output()
            .expect("run cli");
        assert!(output.status.success());
        String::from_utf8_lossy(&output.stdout).into_owned()
    };
    let first = run();
    assert_eq!(first, run());
    assert!(first.contains("\"variant\": \"lean\""));
}

#[test]
fn cli_interactive_quit_reports_unfinished_run() {
    let mut child = haggle()
        .args(["--seed", "3", "--leaderboard", "off", "--items", "Tea,Salt"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn cli");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"status\nnext\nquit\n")
        .expect("write commands");
    let output = child.wait_with_output().expect("wait for cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Tea"));
    assert!(stdout.contains("Left on day 2"));
}

#[test]
fn cli_list_scores_on_empty_board() {
    let output_path = temp_path("scores");
    let status = haggle()
        .args(["--list-scores", "--report", "json", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert_eq!(content.trim(), "[]");
}

#[test]
fn cli_rejects_missing_jsonbin_credentials() {
    let output = haggle()
        .args(["--leaderboard", "jsonbin", "--autoplay", "hold", "--seed", "1"])
        .env_remove("HAGGLE_JSONBIN_KEY")
        .env_remove("HAGGLE_JSONBIN_BIN")
        .current_dir(std::env::temp_dir())
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("jsonbin leaderboard not configured"));
}
