use assert_cmd::Command;
use predicates::prelude::*;

fn exporter() -> Command {
    let mut cmd = Command::cargo_bin("apex-exporter").unwrap();
    cmd.env_clear();
    cmd
}

#[test]
fn test_help_describes_exporter() {
    exporter()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Prometheus exporter"))
        .stdout(predicate::str::contains("--player-name"));
}

#[test]
fn test_missing_api_key_fails_at_startup() {
    exporter()
        .env("PLAYER_NAME", "NeonRaider")
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("API_KEY must be set"));
}

#[test]
fn test_player_is_required() {
    exporter()
        .env("API_KEY", "test-key")
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Either USER_ID or PLAYER_NAME must be set",
        ));
}

#[test]
fn test_player_selectors_are_exclusive() {
    exporter()
        .env("API_KEY", "test-key")
        .env("USER_ID", "1000836527372")
        .env("PLAYER_NAME", "NeonRaider")
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Both USER_ID and PLAYER_NAME cannot be set",
        ));
}

#[test]
fn test_unknown_platform_is_rejected() {
    exporter()
        .env("API_KEY", "test-key")
        .env("PLAYER_NAME", "NeonRaider")
        .env("PLATFORM", "dreamcast")
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown platform"));
}

#[test]
fn test_check_reports_unreachable_upstream() {
    exporter()
        .env("API_KEY", "test-key")
        .env("PLAYER_NAME", "NeonRaider")
        .env("API_BASE_URL", "http://127.0.0.1:1")
        .env("REQUEST_TIMEOUT", "2s")
        .env("LOG_LEVEL", "off")
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("player_stats"))
        .stderr(predicate::str::contains("Upstream check failed"));
}

#[test]
fn test_debug_switch_reaches_the_subcommand() {
    exporter()
        .env("DEBUG", "debug")
        .env("PLAYER_NAME", "NeonRaider")
        .args(["--debug", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API_KEY must be set"))
        .stderr(predicate::str::contains("invalid value").not());
}
