use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_museo_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("museo")
}

#[test]
fn test_completion_command_help() {
    let mut cmd = Command::new(get_museo_bin());
    cmd.arg("completion").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Generate shell completion scripts",
        ))
        .stdout(predicate::str::contains("SUPPORTED SHELLS"))
        .stdout(predicate::str::contains("bash"))
        .stdout(predicate::str::contains("zsh"))
        .stdout(predicate::str::contains("fish"))
        .stdout(predicate::str::contains("INSTALLATION"))
        .stdout(predicate::str::contains("~/.bashrc"));
}

#[test]
fn test_completion_bash_generates_script() {
    let mut cmd = Command::new(get_museo_bin());
    cmd.arg("completion").arg("--shell").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("_museo()"))
        .stdout(predicate::str::contains("complete -F _museo"));
}

#[test]
fn test_completion_zsh_generates_script() {
    let mut cmd = Command::new(get_museo_bin());
    cmd.arg("completion").arg("--shell").arg("zsh");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("#compdef museo"));
}

#[test]
fn test_completion_covers_museo_commands_and_flags() {
    let mut cmd = Command::new(get_museo_bin());
    cmd.arg("completion").arg("--shell").arg("bash");

    let output = cmd.assert().success().get_output().stdout.clone();
    let script = String::from_utf8(output).unwrap();

    for word in ["data", "stats", "report", "serve", "--snapshot", "--cache-ttl", "--input"] {
        assert!(script.contains(word), "completion script lacks {}", word);
    }
}

#[test]
fn test_completion_fish_lists_subcommands() {
    let mut cmd = Command::new(get_museo_bin());
    cmd.arg("completion").arg("--shell").arg("fish");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("complete -c museo"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("report"));
}

#[test]
fn test_completion_rejects_unknown_shell() {
    let mut cmd = Command::new(get_museo_bin());
    cmd.arg("completion").arg("--shell").arg("tcsh");

    cmd.assert().failure();
}

#[test]
fn test_top_level_help_lists_commands() {
    let mut cmd = Command::new(get_museo_bin());
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("data"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("--api-key"));
}
