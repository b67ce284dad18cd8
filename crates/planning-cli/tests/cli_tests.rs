use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command against the temporary database and blob dir, plain output.
fn cpl_cmd(temp_dir: &Path, user: Option<&str>) -> Command {
    let mut cmd = Command::cargo_bin("cpl").expect("Failed to find cpl binary");
    cmd.arg("--no-color")
        .arg("--database-file")
        .arg(temp_dir.join("planning.db"))
        .arg("--blob-dir")
        .arg(temp_dir.join("blobs"))
        .args(["--tenant", "org", "--unit", "tower-a"]);
    if let Some(user) = user {
        cmd.args(["--user", user]);
    }
    cmd
}

/// Value of the first `- ID: ` line in rendered output.
fn extract_id(stdout: &[u8]) -> String {
    String::from_utf8_lossy(stdout)
        .lines()
        .find_map(|line| line.trim().strip_prefix("- ID: ").map(String::from))
        .expect("output should contain an ID line")
}

fn create_planning(temp_dir: &Path, title: &str) -> String {
    let output = cpl_cmd(temp_dir, Some("ana"))
        .args([
            "planning",
            "create",
            title,
            "--start",
            "2024-01-01",
            "--end",
            "2024-03-31",
            "--budget",
            "1500.5",
        ])
        .output()
        .expect("Failed to run cpl");
    assert!(output.status.success());
    extract_id(&output.stdout)
}

#[test]
fn test_cli_list_empty_plannings() {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");

    cpl_cmd(temp_dir.path(), Some("ana"))
        .args(["planning", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No plannings found."));
}

#[test]
fn test_cli_without_user_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");

    cpl_cmd(temp_dir.path(), None)
        .args(["planning", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No authenticated user session"));
}

#[test]
fn test_cli_create_list_and_show_planning() {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let planning_id = create_planning(temp_dir.path(), "Roof repair");

    cpl_cmd(temp_dir.path(), Some("ana"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Roof repair"))
        .stdout(predicate::str::contains("draft"));

    cpl_cmd(temp_dir.path(), Some("ana"))
        .args(["planning", "show", &planning_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Roof repair"))
        .stdout(predicate::str::contains("- Budget: 1500.50"))
        .stdout(predicate::str::contains("- Created: "))
        .stdout(predicate::str::contains("No tasks found."))
        .stdout(predicate::str::contains("No comments yet."));
}

#[test]
fn test_cli_create_planning_rejects_inverted_period() {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");

    cpl_cmd(temp_dir.path(), Some("ana"))
        .args([
            "planning",
            "create",
            "Backwards",
            "--start",
            "2024-03-01",
            "--end",
            "2024-01-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to create planning"));
}

#[test]
fn test_cli_task_progress_updates_planning() {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let planning_id = create_planning(temp_dir.path(), "Garden");

    let output = cpl_cmd(temp_dir.path(), Some("ana"))
        .args([
            "task",
            "add",
            &planning_id,
            "Trim hedges",
            "--start",
            "2024-01-02",
            "--due",
            "2024-01-10",
        ])
        .output()
        .expect("Failed to run cpl");
    assert!(output.status.success());
    let task_id = extract_id(&output.stdout);

    cpl_cmd(temp_dir.path(), Some("ana"))
        .args([
            "task",
            "add",
            &planning_id,
            "Buy shears",
            "--start",
            "2024-01-02",
            "--due",
            "2024-01-05",
            "--parent",
            &task_id,
        ])
        .assert()
        .success();

    cpl_cmd(temp_dir.path(), Some("ana"))
        .args(["task", "progress", &planning_id, &task_id, "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed"));

    cpl_cmd(temp_dir.path(), Some("ana"))
        .args(["task", "list", &planning_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("- ✓ Completed **Trim hedges** 100%"))
        .stdout(predicate::str::contains("  - ○ Pending **Buy shears** 0%"));

    cpl_cmd(temp_dir.path(), Some("ana"))
        .args(["planning", "show", &planning_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Progress: 50%"));
}

#[test]
fn test_cli_comment_edit_by_other_user_is_forbidden() {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let planning_id = create_planning(temp_dir.path(), "Lobby");

    let output = cpl_cmd(temp_dir.path(), Some("ana"))
        .args(["comment", "add", &planning_id, "Paint is peeling"])
        .output()
        .expect("Failed to run cpl");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let comment_id = stdout
        .lines()
        .find_map(|line| {
            let start = line.rfind('[')?;
            line[start + 1..].strip_suffix(']').map(String::from)
        })
        .expect("comment output should contain its ID");

    cpl_cmd(temp_dir.path(), Some("luis"))
        .args(["comment", "edit", &planning_id, &comment_id, "Not really"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Forbidden"));

    cpl_cmd(temp_dir.path(), Some("ana"))
        .args(["comment", "edit", &planning_id, &comment_id, "Paint is flaking"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(edited)"))
        .stdout(predicate::str::contains("> Paint is flaking"));
}

#[test]
fn test_cli_upload_and_delete_planning() {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let planning_id = create_planning(temp_dir.path(), "Elevator");
    let file = temp_dir.path().join("quote.pdf");
    std::fs::write(&file, b"%PDF-1.4").expect("Failed to write file");

    cpl_cmd(temp_dir.path(), Some("ana"))
        .args(["document", "upload", &planning_id])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("**quote.pdf** (application/pdf, 8 bytes)"));

    cpl_cmd(temp_dir.path(), Some("ana"))
        .args(["planning", "delete", &planning_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success:"));

    cpl_cmd(temp_dir.path(), Some("ana"))
        .args(["planning", "show", &planning_id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
