#![allow(clippy::unwrap_used)]
//! CLI smoke tests. Every test points the XDG directories at a temporary
//! directory so the user's real configuration and database are untouched.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[allow(deprecated)]
fn subtranslate(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("subtranslate").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_CACHE_HOME", home.path().join("cache"))
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(home: &TempDir, contents: &str) {
    let dir = home.path().join("config").join("subtranslate");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), contents).unwrap();
}

#[test]
fn test_help_displays_usage() {
    let home = TempDir::new().unwrap();
    subtranslate(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("view"))
        .stdout(predicate::str::contains("jobs"))
        .stdout(predicate::str::contains("--service"))
        .stdout(predicate::str::contains("--no-cache"));
}

#[test]
fn test_version_displays_version() {
    let home = TempDir::new().unwrap();
    subtranslate(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_view_help() {
    let home = TempDir::new().unwrap();
    subtranslate(&home)
        .args(["view", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--page-id"))
        .stdout(predicate::str::contains("--revision-id"))
        .stdout(predicate::str::contains("--to"))
        .stdout(predicate::str::contains("--title"));
}

#[test]
fn test_config_prints_path() {
    let home = TempDir::new().unwrap();
    subtranslate(&home)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("subtranslate"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_with_cli_overrides() {
    let home = TempDir::new().unwrap();
    subtranslate(&home)
        .args([
            "config",
            "--show",
            "--service",
            "libretranslate",
            "--url",
            "http://localhost:5000",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("libretranslate"))
        .stdout(predicate::str::contains("http://localhost:5000"))
        .stdout(predicate::str::contains("(not set)"));
}

#[test]
fn test_config_show_redacts_api_key() {
    let home = TempDir::new().unwrap();
    write_config(
        &home,
        r#"
        [service]
        type = "deepl"
        url = "https://api-free.deepl.com"
        api_key = "super-secret-key"
        "#,
    );

    subtranslate(&home)
        .args(["config", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deepl"))
        .stdout(predicate::str::contains("super-secret-key").not());
}

#[test]
fn test_missing_service_type_fails() {
    let home = TempDir::new().unwrap();
    subtranslate(&home)
        .args(["config", "--show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("service.type"));
}

#[test]
fn test_unknown_service_type_fails() {
    let home = TempDir::new().unwrap();
    subtranslate(&home)
        .args(["config", "--show", "--service", "bing", "--url", "http://x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported machine translation service"));
}

#[test]
fn test_missing_required_option_fails() {
    let home = TempDir::new().unwrap();
    subtranslate(&home)
        .args(["config", "--show", "--service", "lingva"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("url"));
}

#[test]
fn test_jobs_count_on_empty_queue() {
    let home = TempDir::new().unwrap();
    subtranslate(&home)
        .args(["jobs", "count"])
        .assert()
        .success()
        .stdout(predicate::str::diff("0\n"));
}

#[test]
fn test_view_in_job_queue_mode_enqueues() {
    let home = TempDir::new().unwrap();
    let db_path = home.path().join("subtranslate.db");
    write_config(
        &home,
        &format!(
            r#"
            [service]
            type = "lingva"
            url = "http://127.0.0.1:9"

            [translate]
            use_job_queue = true
            suppress_language_caption = true

            [cache]
            path = "{}"
            "#,
            db_path.display()
        ),
    );

    let page = home.path().join("page.html");
    fs::write(&page, "<p>Hello</p>").unwrap();

    subtranslate(&home)
        .args(["view", "--page-id", "2", "--revision-id", "9", "--to", "de"])
        .arg(&page)
        .assert()
        .success()
        .stdout(predicate::str::contains("This page is being translated"))
        .stderr(predicate::str::contains("2-9-DE"));

    // A second request sees the progress marker and does not enqueue again.
    subtranslate(&home)
        .args(["view", "--page-id", "2", "--revision-id", "9", "--to", "de"])
        .arg(&page)
        .assert()
        .success();

    subtranslate(&home)
        .args(["jobs", "count"])
        .assert()
        .success()
        .stdout(predicate::str::diff("1\n"));
}
