use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("finance_core_cli").unwrap();
    cmd.env("FINANCE_CORE_HOME", home.path())
        .env("FINANCE_CORE_CLI_SCRIPT", "1")
        .env("FINANCE_CORE_TODAY", "2024-01-15")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn script_mode_records_and_summarizes() {
    let home = TempDir::new().unwrap();
    let input = "\
add Salary 100 income work 2024-01-02
add \"Team lunch\" 30 expense food 2024-01-05
balance
summary monthly
exit
";

    cli(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Added local-1"))
        .stdout(contains("Balance: $70.00"))
        .stdout(contains("Income : $100.00"))
        .stdout(contains("food"));

    let saved = std::fs::read_to_string(home.path().join("ledgers").join("default.json")).unwrap();
    assert!(saved.contains("Team lunch"));
}

#[test]
fn ledger_survives_between_runs() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("add Salary 100 income work today\nexit\n")
        .assert()
        .success();

    cli(&home)
        .write_stdin("list --kind income\nsummary weekly\n")
        .assert()
        .success()
        .stdout(contains("Salary"))
        .stdout(contains("2024-01-15"))
        .stdout(contains("Income : $100.00"));
}

#[test]
fn invalid_input_is_reported_and_shell_continues() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("add Snack five expense food 2024-01-02\nbalanse\nbalance\n")
        .assert()
        .success()
        .stderr(contains("Invalid amount"))
        .stdout(contains("Did you mean `balance`?"))
        .stdout(contains("Balance: $0.00"));
}

#[test]
fn config_changes_currency_display() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("config set currency_symbol €\nadd Gift 12.5 income misc 2024-01-10\nbalance\n")
        .assert()
        .success()
        .stdout(contains("Balance: €12.50"));

    let config = std::fs::read_to_string(home.path().join("config").join("config.json")).unwrap();
    assert!(config.contains("€"));
}

#[test]
fn session_token_is_kept_in_state() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("session login abc123\nprofile set name Ada\nsession status\n")
        .assert()
        .success()
        .stdout(contains("Signed in."));

    let state = std::fs::read_to_string(home.path().join("state.json")).unwrap();
    assert!(state.contains("abc123"));
    assert!(state.contains("Ada"));
}
