//! Integration tests for the dt CLI

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the dt binary pointed at a store inside `temp`.
fn dt(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("dt"));
    cmd.env_remove("DT_DB")
        .env_remove("DT_LIMIT")
        .arg("--db")
        .arg(store_path(temp))
        .arg("--seed")
        .arg("7");
    cmd
}

fn store_path(temp: &TempDir) -> PathBuf {
    temp.path().join("tasks.json")
}

#[test]
fn test_help() {
    Command::new(cargo::cargo_bin!("dt"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("weighted task backlog"));
}

#[test]
fn test_first_run_seeds_and_saves() {
    let temp = TempDir::new().unwrap();

    dt(&temp)
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("Add tasks"));

    let raw = fs::read_to_string(store_path(&temp)).unwrap();
    assert!(raw.contains("\"name\": \"Add tasks\""));
}

#[test]
fn test_add_and_list() {
    let temp = TempDir::new().unwrap();

    dt(&temp)
        .args(["add", "Write", "report", "--weight", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added task 2"));

    dt(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Write report"))
        .stdout(predicate::str::contains("Add tasks"));
}

#[test]
fn test_invalid_weight_is_rejected_without_saving() {
    let temp = TempDir::new().unwrap();

    dt(&temp)
        .args(["add", "Too", "heavy", "--weight", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the allowed range"));

    assert!(!store_path(&temp).exists());
}

#[test]
fn test_unknown_task_fails() {
    let temp = TempDir::new().unwrap();

    dt(&temp)
        .args(["done", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task 42 not found"));
}

#[test]
fn test_finished_task_leaves_today_but_stays_in_list() {
    let temp = TempDir::new().unwrap();

    dt(&temp).args(["add", "Old", "chore", "-w", "5"]).assert().success();
    dt(&temp).args(["finish", "2"]).assert().success();

    dt(&temp)
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("Old chore").not());

    dt(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Old chore"));

    dt(&temp)
        .args(["list", "--open"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Old chore").not());
}

#[test]
fn test_shell_session() {
    let temp = TempDir::new().unwrap();

    dt(&temp)
        .arg("shell")
        .write_stdin("add Draft --weight 2\ndone 2\nweight 2 7\nshow 2\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Times completed:  1"))
        .stdout(predicate::str::contains("Weight:           2"))
        .stderr(predicate::str::contains("outside the allowed range"));

    let raw = fs::read_to_string(store_path(&temp)).unwrap();
    assert!(raw.contains("\"name\": \"Draft\""));
    assert!(raw.contains("\"times_completed\": 1"));
}

#[test]
fn test_corrupt_store_is_moved_aside() {
    let temp = TempDir::new().unwrap();
    fs::write(store_path(&temp), "{ not json").unwrap();

    dt(&temp)
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning"))
        .stdout(predicate::str::contains("Add tasks"));

    let moved = temp.path().join("tasks.json.corrupt");
    assert_eq!(fs::read_to_string(moved).unwrap(), "{ not json");
}

#[test]
fn test_list_sorts_by_weight() {
    let temp = TempDir::new().unwrap();

    dt(&temp).args(["add", "Light", "-w", "1"]).assert().success();
    dt(&temp).args(["add", "Heavy", "-w", "5"]).assert().success();

    let output = dt(&temp).args(["list", "--sort", "weight"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let heavy = stdout.find("Heavy").unwrap();
    let seeded = stdout.find("Add tasks").unwrap();
    let light = stdout.find("Light").unwrap();
    assert!(heavy < seeded && seeded < light);
}

#[test]
fn test_today_help_mentions_fresh_draws() {
    Command::new(cargo::cargo_bin!("dt"))
        .args(["today", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--seed"))
        .stdout(predicate::str::contains("draws afresh"));
}
