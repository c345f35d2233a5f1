// trimfield/tests/cli_integration_tests.rs
//! Command-line integration tests for the `trimfield` binary.
//!
//! Every test points `--store` at a file inside its own temporary directory so
//! runs never touch the user's real settings. Colored output is stripped with
//! `strip_ansi_escapes` before comparing.

use anyhow::Result;
use assert_cmd::Command;
#[allow(unused_imports)]
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, NamedTempFile};

use strip_ansi_escapes::strip as strip_ansi_escapes_fn;

fn trimfield(store: &Path) -> Command {
    let mut cmd = Command::cargo_bin("trimfield").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("TRIMFIELD_STORE");
    cmd.arg("--store").arg(store);
    cmd
}

fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8_lossy(&strip_ansi_escapes_fn(&assert.get_output().stdout)).to_string()
}

#[test]
fn clean_trims_stdin() -> Result<()> {
    let dir = tempdir()?;
    trimfield(&dir.path().join("settings.json"))
        .arg("clean")
        .write_stdin("   hello world  \n\n")
        .assert()
        .success()
        .stdout("hello world\n");
    Ok(())
}

#[test]
fn clean_collapses_blank_lines_when_requested() -> Result<()> {
    let dir = tempdir()?;
    let store = dir.path().join("settings.json");
    trimfield(&store)
        .args(["clean", "--collapse-newlines"])
        .write_stdin("a\n\n  \n\t\nb")
        .assert()
        .success()
        .stdout("a\n\nb\n");

    // Without the flag blank lines are kept.
    trimfield(&store)
        .arg("clean")
        .write_stdin("a\n\n\nb")
        .assert()
        .success()
        .stdout("a\n\n\nb\n");
    Ok(())
}

#[test]
fn clean_reads_and_writes_files() -> Result<()> {
    let dir = tempdir()?;
    let mut input = NamedTempFile::new()?;
    std::io::Write::write_all(&mut input, b"  from a file  ")?;
    let output = dir.path().join("out.txt");

    trimfield(&dir.path().join("settings.json"))
        .arg("clean")
        .arg("-i")
        .arg(input.path())
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout("");

    assert_eq!(fs::read_to_string(&output)?, "from a file\n");
    Ok(())
}

#[test]
fn clean_diff_shows_changes() -> Result<()> {
    let dir = tempdir()?;
    let assert = trimfield(&dir.path().join("settings.json"))
        .args(["clean", "--diff"])
        .write_stdin("  padded  ")
        .assert()
        .success();
    let out = stdout_of(&assert);
    assert!(out.contains("--- Diff View ---"), "stdout: {out}");
    assert!(out.contains("-  padded  "), "stdout: {out}");
    assert!(out.contains("+padded"), "stdout: {out}");
    Ok(())
}

#[test]
fn clean_leaves_input_alone_on_denied_url() -> Result<()> {
    let dir = tempdir()?;
    let store = dir.path().join("settings.json");
    trimfield(&store).args(["settings", "mode", "deny"]).assert().success();
    trimfield(&store)
        .args(["settings", "list", "deny", "*://intranet.local/*"])
        .assert()
        .success();

    trimfield(&store)
        .args(["clean", "--url", "http://intranet.local/form"])
        .write_stdin("  keep  \n")
        .assert()
        .success()
        .stdout("  keep  \n")
        .stderr(predicate::str::contains("Rules do not apply"));
    Ok(())
}

#[test]
fn clean_passes_input_through_on_empty_allow_list() -> Result<()> {
    let dir = tempdir()?;
    let store = dir.path().join("settings.json");
    trimfield(&store).args(["settings", "mode", "allow"]).assert().success();

    trimfield(&store)
        .args(["clean", "--url", "https://x.example/"])
        .write_stdin("  keep  \n")
        .assert()
        .success()
        .stdout("  keep  \n");
    Ok(())
}

#[test]
fn check_follows_allow_list() -> Result<()> {
    let dir = tempdir()?;
    let store = dir.path().join("settings.json");

    trimfield(&store)
        .args(["check", "https://anything.test/"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("active"));

    trimfield(&store).args(["settings", "mode", "allow"]).assert().success();
    trimfield(&store)
        .args(["settings", "add-domain", "https://example.com/contact?x=1"])
        .assert()
        .success();

    trimfield(&store)
        .args(["check", "https://example.com/about"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("active"));
    trimfield(&store)
        .args(["check", "https://evil-example.com/"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("inactive"));
    Ok(())
}

#[test]
fn settings_round_trip_through_store_file() -> Result<()> {
    let dir = tempdir()?;
    let store = dir.path().join("nested").join("settings.json");

    trimfield(&store).args(["settings", "mode", "deny"]).assert().success();
    trimfield(&store)
        .args(["settings", "flag", "collapse-newlines", "on"])
        .assert()
        .success();
    trimfield(&store)
        .args(["settings", "add-url", "https://example.com/page"])
        .assert()
        .success();
    trimfield(&store)
        .args(["settings", "add-url", "https://example.com/page"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Already in list"));

    let stored: serde_json::Value = serde_json::from_str(&fs::read_to_string(&store)?)?;
    assert_eq!(stored["mode"], "deny");
    assert_eq!(stored["collapseNewlines"], true);
    assert_eq!(stored["denyList"], serde_json::json!(["https://example.com/page"]));

    let assert = trimfield(&store).args(["settings", "show"]).assert().success();
    let out = stdout_of(&assert);
    assert!(out.contains("mode: deny"), "stdout: {out}");
    assert!(out.contains("  https://example.com/page"), "stdout: {out}");
    Ok(())
}

#[test]
fn add_url_in_all_mode_asks_for_a_list_mode() -> Result<()> {
    let dir = tempdir()?;
    let store = dir.path().join("settings.json");
    trimfield(&store)
        .args(["settings", "add-url", "https://example.com/"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Select \"Allow\" or \"Deny\" mode"));
    assert!(!store.exists());
    Ok(())
}

#[test]
fn import_and_reset() -> Result<()> {
    let dir = tempdir()?;
    let store = dir.path().join("settings.json");
    let import = dir.path().join("import.yaml");
    fs::write(
        &import,
        "mode: allow\nallowList:\n  - docs.example.org\ncollapseNewlines: true\napplyOnPaste: false\n",
    )?;

    trimfield(&store).args(["settings", "import"]).arg(&import).assert().success();
    let assert = trimfield(&store).args(["settings", "show", "--json"]).assert().success();
    let shown: serde_json::Value = serde_json::from_str(&stdout_of(&assert))?;
    assert_eq!(shown["mode"], "allow");
    assert_eq!(shown["allowList"], serde_json::json!(["docs.example.org"]));
    assert_eq!(shown["applyOnPaste"], false);

    trimfield(&store).args(["settings", "reset"]).assert().success();
    let assert = trimfield(&store).args(["settings", "show", "--json"]).assert().success();
    let shown: serde_json::Value = serde_json::from_str(&stdout_of(&assert))?;
    assert_eq!(shown["mode"], "all");
    assert_eq!(shown["applyOnPaste"], true);
    Ok(())
}

#[test]
fn corrupt_store_is_reported() -> Result<()> {
    let dir = tempdir()?;
    let store = dir.path().join("settings.json");
    fs::write(&store, "{ not json")?;
    trimfield(&store)
        .args(["check", "https://example.com/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
    Ok(())
}

#[test]
fn invalid_mode_is_rejected_by_the_parser() -> Result<()> {
    let dir = tempdir()?;
    trimfield(&dir.path().join("settings.json"))
        .args(["settings", "mode", "sometimes"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn replay_reports_one_line_per_event() -> Result<()> {
    let dir = tempdir()?;
    let events = concat!(
        r#"{"event":"document","root":{"id":1,"tag":"body","children":[{"id":2,"tag":"input","attributes":{"type":"email"}}]}}"#,
        "\n\n",
        r#"{"event":"blur","target":2,"value":" me@example.com "}"#,
        "\n",
        r#"{"event":"paste","target":2,"clipboard":" x ","value":"ab","selectionStart":1,"selectionEnd":2}"#,
        "\n",
    );

    let assert = trimfield(&dir.path().join("settings.json"))
        .args(["replay", "--url", "https://example.com/signup"])
        .write_stdin(events)
        .assert()
        .success();
    let out = stdout_of(&assert);
    let lines: Vec<serde_json::Value> = out
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["attached"], 1);
    assert_eq!(lines[1]["edit"]["value"], "me@example.com");
    assert_eq!(lines[2]["outcome"]["value"], "ax");
    assert_eq!(lines[2]["outcome"]["caret"], 2);
    Ok(())
}

#[test]
fn replay_rejects_malformed_events() -> Result<()> {
    let dir = tempdir()?;
    trimfield(&dir.path().join("settings.json"))
        .args(["replay", "--url", "https://example.com/"])
        .write_stdin("{\"event\":\"explode\"}\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid event on line 1"));
    Ok(())
}
