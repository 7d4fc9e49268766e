#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn deckz_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("deckz"));
    cmd.env("DECKZ_HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("DECKZ_LOG");
    cmd
}

#[test]
fn test_first_run_lists_default_deck() {
    let home = TempDir::new().unwrap();
    deckz_cmd(&home)
        .assert()
        .success()
        .stdout(predicate::str::contains("General"));
    assert!(home.path().join("overlay.json").exists());
}

#[test]
fn test_deck_and_card_workflow() {
    let home = TempDir::new().unwrap();

    deckz_cmd(&home)
        .args(["deck", "add", "Ideas", "-d", "things to try"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deck created: Ideas"));

    deckz_cmd(&home)
        .args(["card", "add", "Ideas", "Write a parser", "-t", "#Rust cli #Parsing", "-c", "Dev"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Card created: Write a parser"));

    deckz_cmd(&home)
        .args(["card", "ls", "ideas"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Write a parser #rust #parsing"));

    deckz_cmd(&home)
        .args(["card", "mv", "Ideas", "1", "General"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Card moved: Write a parser -> General"));

    deckz_cmd(&home)
        .args(["search", "--tag", "rust"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[General] Write a parser"));

    deckz_cmd(&home)
        .arg("tags")
        .assert()
        .success()
        .stdout(predicate::str::contains("parsing").and(predicate::str::contains("rust")));

    deckz_cmd(&home)
        .args(["card", "add", "Ideas", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Card title cannot be empty"));
}

#[test]
fn test_unknown_deck_fails() {
    let home = TempDir::new().unwrap();
    deckz_cmd(&home)
        .args(["deck", "layout", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Deck not found: Nope"));
}

#[test]
fn test_export_then_import() {
    let home = TempDir::new().unwrap();
    deckz_cmd(&home)
        .args(["card", "add", "General", r#"He said "hi""#, "-d", r#"He said "hi""#])
        .assert()
        .success();

    let csv = home.path().join("cards.csv");
    deckz_cmd(&home)
        .args(["export", "-o", csv.to_str().unwrap()])
        .assert()
        .success();
    let text = fs::read_to_string(&csv).unwrap();
    assert!(text.contains(r#""He said ""hi""""#));

    deckz_cmd(&home)
        .args(["import", csv.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 imported, 0 skipped, 0 decks created"));

    deckz_cmd(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"cards\s+2").unwrap());
}

#[test]
fn test_backup_reset_restore() {
    let home = TempDir::new().unwrap();
    deckz_cmd(&home)
        .args(["deck", "add", "Keep me"])
        .assert()
        .success();

    let backup = home.path().join("backup.json");
    deckz_cmd(&home)
        .args(["backup", "-o", backup.to_str().unwrap()])
        .assert()
        .success();
    assert!(fs::read_to_string(&backup).unwrap().contains("\"version\": \"1.0.0\""));

    deckz_cmd(&home).arg("reset").assert().failure();
    deckz_cmd(&home)
        .args(["reset", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All data cleared"));
    deckz_cmd(&home)
        .args(["deck", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Keep me").not());

    deckz_cmd(&home)
        .args(["restore", backup.to_str().unwrap()])
        .assert()
        .success();
    deckz_cmd(&home)
        .args(["deck", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Keep me"));
}

#[test]
fn test_config_set_and_get() {
    let home = TempDir::new().unwrap();
    deckz_cmd(&home)
        .args(["config", "default-deck-name", "Inbox"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default-deck-name set to Inbox"));
    deckz_cmd(&home)
        .args(["config", "default-deck-name"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Inbox"));
}
