mod support;

use assert_cmd::Command;
use predicates::str::contains;

use support::TestHome;

#[test]
fn homekeep_help_works() {
    Command::cargo_bin("homekeep")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("household maintenance tracker"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "add",
        "edit",
        "done",
        "rm",
        "clear-completed",
        "show",
        "list",
        "dashboard",
        "calendar",
        "export",
        "import",
        "seed",
    ];

    for cmd in subcommands {
        Command::cargo_bin("homekeep")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn empty_store_lists_nothing() {
    let home = TestHome::new();

    home.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("0 of 0 tasks"))
        .stdout(contains("No tasks yet."))
        .stdout(contains("hint: homekeep seed"));

    let envelope = home.json(&["dashboard"]);
    assert_eq!(envelope["schema_version"], "homekeep.v1");
    assert_eq!(envelope["command"], "dashboard");
    assert_eq!(envelope["status"], "success");
    assert_eq!(envelope["data"]["total"], 0);
}

#[test]
fn invalid_today_is_user_error() {
    let home = TestHome::new();

    home.cmd_on("2024-13-40")
        .arg("list")
        .assert()
        .code(2)
        .stderr(contains("error:"));
}

#[test]
fn quiet_suppresses_human_output() {
    let home = TestHome::new();

    home.cmd()
        .args(["-q", "add", "Clean gutters"])
        .assert()
        .success()
        .stdout("");
}
