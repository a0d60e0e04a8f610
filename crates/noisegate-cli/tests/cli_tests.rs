use std::path::Path;

use assert_cmd::Command;
use noisegate_core::{Database, Decomposition, Plan};
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Command with plain output, the given database and no API key
fn ng_cmd(db_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ng").expect("Failed to find ng binary");
    cmd.env_remove("GEMINI_API_KEY")
        .env_remove("API_KEY")
        .arg("--no-color")
        .args(["--database-file", db_path.to_str().unwrap()]);
    cmd
}

fn login(db_path: &Path) {
    ng_cmd(db_path)
        .args(["login", "ada@example.com"])
        .assert()
        .success();
}

/// Stores a two-step plan for the signed-in user, bypassing decomposition.
fn seed_plan(db_path: &Path) -> Plan {
    seed_plan_with(db_path, |_| {})
}

/// Like `seed_plan`, letting the caller adjust the plan before it is stored.
fn seed_plan_with(db_path: &Path, adjust: impl FnOnce(&mut Plan)) -> Plan {
    let db = Database::new(db_path).unwrap();
    let user = db.current_user().unwrap().expect("signed in");
    let mut plan = Plan::from_decomposition(
        Decomposition {
            one_thing: "Publish the garden blog".to_string(),
            steps: vec!["Pick a theme".to_string(), "Write the first post".to_string()],
            call_to_action: "Plant the first seed.".to_string(),
        },
        1500,
    );
    adjust(&mut plan);
    db.save_active_plan(&user.id, &plan).unwrap();
    plan
}

fn stored_plan(db_path: &Path) -> Plan {
    let db = Database::new(db_path).unwrap();
    let user = db.current_user().unwrap().expect("signed in");
    db.load_active_plan(&user.id).unwrap().expect("stored plan")
}

/// Asserts `first` appears in `output` before `second`.
fn assert_in_order(output: &str, first: &str, second: &str) {
    let a = output.find(first).unwrap_or_else(|| panic!("missing {first:?} in {output}"));
    let b = output.find(second).unwrap_or_else(|| panic!("missing {second:?} in {output}"));
    assert!(a < b, "{first:?} should come before {second:?} in {output}");
}

#[test]
fn test_cli_requires_sign_in() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    ng_cmd(&db_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));

    ng_cmd(&db_path)
        .arg("history")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ng login"));
}

#[test]
fn test_cli_login_whoami_logout() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("nested").join("cli_test.db");

    ng_cmd(&db_path)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in."));

    ng_cmd(&db_path)
        .args(["login", "ada@example.com", "--name", "Ada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome, Ada. Your account was created."));

    ng_cmd(&db_path)
        .args(["login", "ada@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome back, Ada."));

    ng_cmd(&db_path)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada"))
        .stdout(predicate::str::contains("ada@example.com"));

    for _ in 0..2 {
        ng_cmd(&db_path)
            .arg("logout")
            .assert()
            .success()
            .stdout(predicate::str::contains("Success: Signed out"));
    }
}

#[test]
fn test_cli_login_rejects_bad_email() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    ng_cmd(&db_path)
        .args(["login", "not-an-email"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("email"));
}

#[test]
fn test_cli_status_shows_capture_screen() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    login(&db_path);

    ng_cmd(&db_path)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Noise Gate"))
        .stdout(predicate::str::contains("one thing"));
}

#[test]
fn test_cli_empty_history() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    login(&db_path);

    ng_cmd(&db_path)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("# History"))
        .stdout(predicate::str::contains("No missions archived yet."));
}

#[test]
fn test_cli_mission_without_api_key_fails() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    login(&db_path);

    ng_cmd(&db_path)
        .args(["mission", "write", "the", "report"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Try again"));

    ng_cmd(&db_path)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Noise Gate"));
}

#[test]
fn test_cli_step_commands_need_a_mission() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    login(&db_path);

    ng_cmd(&db_path)
        .args(["start", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No mission in progress"));

    ng_cmd(&db_path)
        .arg("abort")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No mission in progress"));
}

#[test]
fn test_cli_invalid_focus_minutes() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    ng_cmd(&db_path)
        .args(["--focus-minutes", "0", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("focus-minutes"));
}

#[test]
fn test_cli_mission_lifecycle() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    login(&db_path);
    seed_plan(&db_path);

    ng_cmd(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Publish the garden blog"))
        .stdout(predicate::str::contains("### 1. Pick a theme (○ Todo)"))
        .stdout(predicate::str::contains("Timer: idle"));

    ng_cmd(&db_path)
        .args(["edit", "2", "05:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: Step 2 set to 05:00"))
        .stdout(predicate::str::contains("- Time left: 05:00 of 05:00"));

    ng_cmd(&db_path)
        .args(["mission", "something", "else"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ng abort"));

    ng_cmd(&db_path)
        .args(["done", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("There is no step 3"));

    ng_cmd(&db_path)
        .args(["done", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Progress: 50% (1/2 steps)"));

    ng_cmd(&db_path)
        .args(["done", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Mission complete"))
        .stdout(predicate::str::contains("Plant the first seed."));

    ng_cmd(&db_path)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("## Publish the garden blog"))
        .stdout(predicate::str::contains("- Steps: 2"));

    // History returns to the success screen.
    ng_cmd(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Mission complete"));

    ng_cmd(&db_path)
        .arg("new")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Noise Gate"));
}

#[test]
fn test_cli_abort_discards_mission() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    login(&db_path);
    seed_plan(&db_path);

    ng_cmd(&db_path)
        .arg("abort")
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: Mission aborted"));

    ng_cmd(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Noise Gate"));

    ng_cmd(&db_path)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No missions archived yet."));
}

#[test]
fn test_cli_start_runs_countdown_to_expiry() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    login(&db_path);
    seed_plan(&db_path);

    ng_cmd(&db_path)
        .args(["edit", "1", "00:02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: Step 1 set to 00:02"))
        .stdout(predicate::str::contains("Timer: idle"));

    let output = ng_cmd(&db_path)
        .args(["start", "1"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();

    assert_eq!(stdout.matches("## Time is up").count(), 1);
    assert!(stdout.contains("Pick a theme"));
    assert!(stdout.contains("Timer: step 1 paused, 00:00 left"));
    assert_in_order(&stdout, "## Time is up", "Timer: step 1 paused");

    let plan = stored_plan(&db_path);
    assert_eq!(plan.steps[0].time_left, 0);
    assert!(plan.steps[0].is_active);
}

#[test]
fn test_cli_resume_after_reload() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    login(&db_path);
    seed_plan_with(&db_path, |plan| {
        plan.steps[1].is_active = true;
        plan.steps[1].time_left = 1;
    });

    ng_cmd(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Timer: step 2 paused, 00:01 left"));

    let output = ng_cmd(&db_path)
        .arg("resume")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();

    assert!(stdout.contains("## Time is up"));
    assert!(stdout.contains("Write the first post"));
    assert_in_order(&stdout, "## Time is up", "Timer: step 2 paused, 00:00 left");
    assert_eq!(stored_plan(&db_path).steps[1].time_left, 0);

    // A later run resumes the expired step at zero and alerts once more.
    ng_cmd(&db_path)
        .arg("resume")
        .assert()
        .success()
        .stdout(predicate::str::contains("## Time is up").count(1))
        .stdout(predicate::str::contains("Timer: step 2 paused, 00:00 left"));
}

#[test]
fn test_cli_resume_without_active_step() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    login(&db_path);
    seed_plan(&db_path);

    ng_cmd(&db_path)
        .arg("resume")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No step is paused"));
}

#[test]
fn test_cli_focus_minutes_shown_on_capture() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    login(&db_path);

    ng_cmd(&db_path)
        .args(["--focus-minutes", "50", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Each step gets 50:00 on the clock."));
}
