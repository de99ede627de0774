use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn folio(workspace: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("folio"));
    cmd.current_dir(workspace)
        .env("HOME", workspace)
        .env_remove("FOLIO_LOG");
    cmd
}

fn run_json(workspace: &Path, args: &[&str]) -> Value {
    let output = folio(workspace)
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).expect("json output")
}

fn write_local_settings(workspace: &Path, raw: &str) {
    let runtime = workspace.join(".folio");
    fs::create_dir_all(&runtime).expect("runtime dir");
    fs::write(runtime.join("settings.local.json"), raw).expect("settings override");
}

#[test]
fn exec_help_lists_commands() {
    let workspace = TempDir::new().expect("workspace");
    let out = run_json(workspace.path(), &["--json", "exec", "help"]);
    assert_eq!(out["command"], "help");
    assert!(out["control"].is_null());
    let lines = out["lines"].as_array().expect("lines");
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[0], "Verfügbare Befehle:");
}

#[test]
fn exec_is_case_insensitive() {
    let workspace = TempDir::new().expect("workspace");
    let upper = run_json(workspace.path(), &["--json", "exec", "Skills"]);
    let lower = run_json(workspace.path(), &["--json", "exec", "skills"]);
    assert_eq!(upper["lines"], lower["lines"]);
    assert_eq!(upper["lines"][0], "Technische Fähigkeiten:");
}

#[test]
fn exec_unknown_command_reports_input() {
    let workspace = TempDir::new().expect("workspace");
    let out = run_json(workspace.path(), &["--json", "exec", "rm", "-rf"]);
    let lines = out["lines"].as_array().expect("lines");
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Befehl nicht gefunden: rm -rf");
}

#[test]
fn exec_control_commands_are_flagged() {
    let workspace = TempDir::new().expect("workspace");
    let clear = run_json(workspace.path(), &["--json", "exec", "clear"]);
    assert_eq!(clear["control"], "clear");
    let exit = run_json(workspace.path(), &["--json", "exec", "EXIT"]);
    assert_eq!(exit["control"], "exit");
    assert!(exit["lines"].as_array().is_some_and(|l| l.is_empty()));
}

#[test]
fn exec_text_mode_follows_language_flag() {
    let workspace = TempDir::new().expect("workspace");
    let output = folio(workspace.path())
        .args(["--lang", "en", "exec", "help"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).expect("utf8");
    assert!(text.starts_with("Available commands:"));
}

#[test]
fn exec_records_event_in_observe_log() {
    let workspace = TempDir::new().expect("workspace");
    run_json(workspace.path(), &["--json", "exec", "about"]);
    let log = fs::read_to_string(workspace.path().join(".folio/logs/observe.log")).expect("log");
    assert!(log.contains("command_submitted"));
    assert!(log.contains("\"about\""));
}

#[test]
fn page_projects_can_be_filtered() {
    let workspace = TempDir::new().expect("workspace");
    let out = run_json(
        workspace.path(),
        &["--json", "page", "projects", "--category", "web-development"],
    );
    assert_eq!(out["page"], "projects");
    assert_eq!(out["category"], "web-development");
    let headings = out["lines"]
        .as_array()
        .expect("lines")
        .iter()
        .filter(|l| l["kind"] == "heading")
        .count();
    assert_eq!(headings, 2);
}

#[test]
fn unknown_page_fails_with_suggestion() {
    let workspace = TempDir::new().expect("workspace");
    let output = folio(workspace.path())
        .args(["page", "blog"])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let err = String::from_utf8(output).expect("utf8");
    assert!(err.contains("Unknown page"));
    assert!(err.contains("home, projects"));
}

#[test]
fn seo_for_single_page() {
    let workspace = TempDir::new().expect("workspace");
    let out = run_json(workspace.path(), &["--json", "seo", "--page", "about"]);
    assert_eq!(out["canonical_url"], "https://alihassan.dev/about");
    assert_eq!(out["structured_data"]["@type"], "Person");

    let all = run_json(workspace.path(), &["--json", "seo"]);
    assert_eq!(all.as_array().map(Vec::len), Some(6));
}

#[test]
fn cv_copies_asset_under_language_name() {
    let workspace = TempDir::new().expect("workspace");
    let asset = workspace.path().join("public/cv-ali-hassan.pdf");
    fs::create_dir_all(asset.parent().expect("parent")).expect("public dir");
    fs::write(&asset, b"%PDF-1.7 test").expect("asset");
    let dest = workspace.path().join("downloads");

    let out = run_json(
        workspace.path(),
        &[
            "--json",
            "cv",
            "--language",
            "en",
            "--dest",
            dest.to_string_lossy().as_ref(),
        ],
    );
    assert_eq!(out["language"], "en");
    let saved = dest.join("CV-Ali-Hassan-English.pdf");
    assert_eq!(fs::read(saved).expect("saved cv"), b"%PDF-1.7 test");
}

#[test]
fn cv_without_asset_fails() {
    let workspace = TempDir::new().expect("workspace");
    folio(workspace.path())
        .args(["cv", "--dest", "out"])
        .assert()
        .failure();
    let log = fs::read_to_string(workspace.path().join(".folio/logs/observe.log")).expect("log");
    assert!(log.contains("cv_failed"));
}

#[test]
fn contact_rejects_invalid_email() {
    let workspace = TempDir::new().expect("workspace");
    let output = folio(workspace.path())
        .args([
            "contact",
            "--name",
            "Erika",
            "--email",
            "erika-at-example",
            "--message",
            "Hallo",
        ])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let err = String::from_utf8(output).expect("utf8");
    assert!(err.contains("Ungültige E-Mail-Adresse"));
}

#[test]
fn contact_submits_valid_message() {
    let workspace = TempDir::new().expect("workspace");
    write_local_settings(workspace.path(), r#"{"contact":{"submit_delay_ms":0}}"#);
    let out = run_json(
        workspace.path(),
        &[
            "--json",
            "contact",
            "--name",
            "Erika",
            "--email",
            "erika@example.de",
            "--company",
            "Muster GmbH",
            "--message",
            "Wir haben einen Ausbildungsplatz.",
        ],
    );
    assert_eq!(out["submitted"], true);
    assert_eq!(out["draft"]["company"], "Muster GmbH");
}

#[test]
fn config_reflects_local_overrides() {
    let workspace = TempDir::new().expect("workspace");
    write_local_settings(workspace.path(), r#"{"chat":{"reply_delay_ms":250}}"#);
    let out = run_json(workspace.path(), &["--json", "config"]);
    assert_eq!(out["chat"]["reply_delay_ms"], 250);
    assert_eq!(out["cv"]["reset_delay_ms"], 3000);
}
