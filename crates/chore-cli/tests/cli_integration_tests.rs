//! End-to-end tests for the `chore` binary.
//!
//! Each test gets its own database, session file and working directory, and
//! pins the timezone to UTC so bucket boundaries are predictable.

use predicates::prelude::*;
use rstest::rstest;

mod helpers;
use helpers::{assertions, CliTestHarness};

const LONG_AGO: &str = "2020-01-01T09:00:00Z";
const FAR_AHEAD: &str = "2099-06-01T09:00:00Z";

#[test]
fn test_cli_help_and_version() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["--help"])
        .stdout(predicate::str::contains("household chores"));
    harness
        .run_success(&["--version"])
        .stdout(predicate::str::contains("chore"));
    harness
        .run_failure(&["vacuum"])
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_commands_require_sign_in() {
    let harness = CliTestHarness::new();

    for args in [
        vec!["list"],
        vec!["add", "Dishes", "-m", "10", "-e", "daily"],
        vec!["do", "abcd"],
        vec!["export"],
    ] {
        harness
            .run_failure(&args)
            .stderr(assertions::not_signed_in());
    }

    harness
        .run_success(&["whoami"])
        .stdout(assertions::not_signed_in());
}

#[test]
fn test_login_logout_cycle() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["login", "Robin"])
        .stdout(predicate::str::contains("Signed in as"));
    harness
        .run_success(&["whoami"])
        .stdout(predicate::str::contains("Robin"));
    harness
        .run_success(&["logout"])
        .stdout(predicate::str::contains("Signed out"));
    harness
        .run_failure(&["list"])
        .stderr(assertions::not_signed_in());
}

#[test]
fn test_empty_list() {
    let harness = CliTestHarness::signed_in("Robin");

    harness
        .run_success(&["list"])
        .stdout(predicate::str::contains("Nothing to clean"));
    assert_eq!(harness.list_json(), serde_json::json!({}));
}

#[test]
fn test_add_and_list_by_bucket() {
    let harness = CliTestHarness::signed_in("Robin");

    harness
        .run_success(&[
            "add",
            "Descale kettle",
            "--duration",
            "5",
            "--disgust",
            "1",
            "--every",
            "monthly",
            "--due",
            LONG_AGO,
        ])
        .stdout(assertions::chore_added_successfully());
    harness.add_chore("Wash curtains", "monthly", FAR_AHEAD);
    harness.run_success(&["add", "Wipe counters", "-m", "5", "-e", "daily"]);

    harness
        .run_success(&["list"])
        .stdout(assertions::has_bucket_table_headers())
        .stdout(predicate::str::contains("Overdue"))
        .stdout(predicate::str::contains("Today"))
        .stdout(predicate::str::contains("Later"))
        .stdout(predicate::str::contains("Tomorrow").not())
        .stdout(predicate::str::contains("Descale kettle"));

    let buckets = harness.list_json();
    let buckets = buckets.as_object().unwrap();
    assert_eq!(buckets.len(), 3);
    assert_eq!(buckets["Overdue"][0]["name"], "Descale kettle");
    assert_eq!(buckets["Today"][0]["name"], "Wipe counters");
    assert_eq!(buckets["Later"][0]["name"], "Wash curtains");
    assert_eq!(buckets["Later"][0]["recurrence"]["type"], "monthly");
    assert!(buckets.get("Tomorrow").is_none());
}

#[test]
fn test_add_rejects_unknown_recurrence() {
    let harness = CliTestHarness::signed_in("Robin");

    harness
        .run_failure(&["add", "Repaint", "-m", "600", "-e", "yearly"])
        .stderr(predicate::str::contains("Unknown recurrence 'yearly'"));
    assert_eq!(harness.export(), serde_json::json!([]));
}

#[rstest]
#[case(&["--disgust", "9"], "Disgust level must be between 1 and 5")]
#[case(&["--disgust", "0"], "Disgust level must be between 1 and 5")]
#[case(&["--duration", "0"], "Duration must be at least 1 minute")]
#[case(&["--interval", "0"], "must be at least 1")]
#[case(&["--due", "when pigs fly"], "Failed to parse due date")]
fn test_add_rejects_invalid_values(#[case] extra: &[&str], #[case] message: &str) {
    let harness = CliTestHarness::signed_in("Robin");

    let mut args = vec!["add", "Mop", "-m", "10", "-e", "weekly"];
    args.extend_from_slice(extra);

    harness
        .run_failure(&args)
        .stderr(predicate::str::contains(message));
    assert_eq!(harness.export(), serde_json::json!([]));
}

#[test]
fn test_do_reschedules_from_completion_time() {
    let harness = CliTestHarness::signed_in("Robin");
    let id = harness.add_chore("Clean the litter box", "weekly", LONG_AGO);

    harness
        .run_success(&["do", &id[..8]])
        .stdout(predicate::str::contains("did 'Clean the litter box'"))
        .stdout(predicate::str::contains("Next due"));

    let buckets = harness.list_json();
    assert_eq!(buckets["Later"][0]["id"], id.as_str());
    assert_eq!(buckets["Later"][0]["completions"].as_array().unwrap().len(), 1);
    assert!(buckets.get("Overdue").is_none());
}

#[test]
fn test_do_with_due_date_anchor_keeps_schedule() {
    let harness = CliTestHarness::signed_in("Robin");
    let id = harness.add_chore("Water plants", "biweekly", LONG_AGO);

    harness
        .command()
        .env("CHORE_COMPLETION_ANCHOR", "due")
        .args(["do", &id])
        .assert()
        .success();

    let exported = harness.export();
    let due = exported[0]["next_due_date"].as_str().unwrap();
    assert!(due.starts_with("2020-01-15T09:00:00"), "got {due}");
}

#[test]
fn test_do_steps_months_on_the_configured_calendar() {
    let harness = CliTestHarness::signed_in("Robin");
    // Jan 31 00:30 in Berlin.
    let id = harness.add_chore("Defrost freezer", "monthly", "2024-01-30T23:30:00Z");

    harness
        .command()
        .env("CHORE_TIMEZONE", "Europe/Berlin")
        .env("CHORE_COMPLETION_ANCHOR", "due")
        .args(["do", &id])
        .assert()
        .success();

    let exported = harness.export();
    let due = exported[0]["next_due_date"].as_str().unwrap();
    assert!(due.starts_with("2024-02-28T23:30:00"), "got {due}");
}

#[test]
fn test_show_lists_history_and_upcoming() {
    let harness = CliTestHarness::signed_in("Robin");
    let id = harness.add_chore("Clean the fridge", "monthly", "2024-01-31T09:00:00Z");

    harness
        .run_success(&["show", &id])
        .stdout(predicate::str::contains("Clean the fridge"))
        .stdout(predicate::str::contains("Once a month"))
        .stdout(predicate::str::contains("2024-02-29"))
        .stdout(predicate::str::contains("2024-03-29"))
        .stdout(predicate::str::contains("Never done yet"));

    harness.run_success(&["login", "Sam"]);
    harness.run_success(&["do", &id]);

    harness
        .run_success(&["show", &id])
        .stdout(predicate::str::contains("History"))
        .stdout(predicate::str::contains("Sam"));
}

#[test]
fn test_edit_updates_fields() {
    let harness = CliTestHarness::signed_in("Robin");
    let id = harness.add_chore("Vacuum", "weekly", FAR_AHEAD);

    harness
        .run_success(&[
            "edit",
            &id,
            "--name",
            "Vacuum upstairs",
            "--interval",
            "2",
            "--instructions",
            "Move the rug first",
        ])
        .stdout(predicate::str::contains("Updated chore 'Vacuum upstairs'"));

    let exported = harness.export();
    assert_eq!(exported[0]["name"], "Vacuum upstairs");
    assert_eq!(exported[0]["recurrence"]["type"], "weekly");
    assert_eq!(exported[0]["recurrence"]["interval"], 2);
    assert_eq!(exported[0]["cleaning_instructions"], "Move the rug first");

    harness.run_success(&["edit", &id, "--instructions-clear"]);
    assert!(harness.export()[0].get("cleaning_instructions").is_none());

    harness
        .run_failure(&["edit", &id, "--every", "hourly"])
        .stderr(predicate::str::contains("Unknown recurrence 'hourly'"));
    harness
        .run_success(&["edit", &id])
        .stdout(predicate::str::contains("Nothing to change"));
}

#[test]
fn test_delete_with_force() {
    let harness = CliTestHarness::signed_in("Robin");
    let id = harness.add_chore("Defrost freezer", "monthly", FAR_AHEAD);

    harness
        .run_success(&["delete", &id, "--force"])
        .stdout(predicate::str::contains("Deleted chore 'Defrost freezer'"));
    assert_eq!(harness.export(), serde_json::json!([]));

    harness
        .run_failure(&["delete", &id, "--force"])
        .stderr(predicate::str::contains("No chore found"));
}

#[test]
fn test_delete_without_terminal_keeps_chore() {
    let harness = CliTestHarness::signed_in("Robin");
    let id = harness.add_chore("Defrost freezer", "monthly", FAR_AHEAD);

    harness
        .run_failure(&["delete", &id])
        .stderr(predicate::str::contains("--force"))
        .stdout(predicate::str::contains("Deleted").not());
    assert_eq!(harness.export()[0]["id"], id.as_str());
}

#[test]
fn test_short_id_must_be_two_chars() {
    let harness = CliTestHarness::signed_in("Robin");
    harness.add_chore("Dust shelves", "weekly", FAR_AHEAD);

    harness
        .run_failure(&["do", "a"])
        .stderr(predicate::str::contains("at least 2 characters"));
}

#[test]
fn test_export_to_file_and_classify_it() {
    let harness = CliTestHarness::signed_in("Robin");
    harness.add_chore("Clean gutters", "monthly", LONG_AGO);
    harness.add_chore("Descale shower", "biweekly", FAR_AHEAD);

    let file = harness.dir().join("chores.json");
    harness
        .run_success(&["export", "--output", file.to_str().unwrap()])
        .stderr(predicate::str::contains("Exported 2 chores"));

    let output = harness
        .run_success(&["list", "--json", "--input", file.to_str().unwrap()])
        .get_output()
        .stdout
        .clone();
    let buckets: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(buckets["Overdue"][0]["name"], "Clean gutters");
    assert_eq!(buckets["Later"][0]["name"], "Descale shower");

    harness
        .run_success(&["list", "--input", file.to_str().unwrap()])
        .stdout(predicate::str::contains("Clean gutters"));
}

#[test]
fn test_list_input_with_bad_timestamp_fails() {
    let harness = CliTestHarness::signed_in("Robin");
    let file = harness.dir().join("broken.json");
    std::fs::write(
        &file,
        r#"[{
            "id": "x1",
            "name": "Mystery",
            "duration_minutes": 5,
            "disgust_level": 2,
            "recurrence": { "type": "daily" },
            "next_due_date": "next tuesday-ish"
        }]"#,
    )
    .unwrap();

    harness
        .run_failure(&["list", "--input", file.to_str().unwrap()])
        .stderr(predicate::str::contains("Invalid timestamp"))
        .stdout(predicate::str::is_empty());
}

#[rstest]
#[case(r#"{ "type": "yearly" }"#, 2, "Unknown recurrence 'yearly'")]
#[case(r#"{ "type": "daily", "interval": 0 }"#, 2, "must be at least 1")]
#[case(r#"{ "type": "daily" }"#, 9, "Disgust level must be between 1 and 5")]
fn test_list_input_validates_records(
    #[case] recurrence: &str,
    #[case] disgust: u8,
    #[case] message: &str,
    #[values(true, false)] json: bool,
) {
    let harness = CliTestHarness::signed_in("Robin");
    let file = harness.dir().join("chores.json");
    std::fs::write(
        &file,
        format!(
            r#"[{{
                "id": "x1",
                "name": "Mystery",
                "duration_minutes": 5,
                "disgust_level": {disgust},
                "recurrence": {recurrence},
                "next_due_date": "2024-05-01T10:00:00Z"
            }}]"#
        ),
    )
    .unwrap();

    let mut args = vec!["list", "--input", file.to_str().unwrap()];
    if json {
        args.push("--json");
    }
    harness
        .run_failure(&args)
        .stderr(predicate::str::contains(message))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_config_file_is_read_from_working_directory() {
    let harness = CliTestHarness::signed_in("Robin");
    std::fs::write(
        harness.dir().join("chore.toml"),
        "timezone = \"Not/AZone\"\n",
    )
    .unwrap();

    harness
        .command()
        .env_remove("CHORE_TIMEZONE")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}
