use assert_cmd::prelude::*;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

const MENU: &str = "Process creation and destruction\n\
--------------------------------\n\
1) Initialize process hierarchy\n\
2) Create a new child process\n\
3) Destroy all descendants of a process\n\
4) Quit program and free memory\n\
Enter selection: ";

struct TempHome {
    dir: TempDir,
}

impl TempHome {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("proctable").expect("binary built");
        cmd.env("HOME", self.dir.path());
        cmd.env("RUST_LOG", "off");
        cmd.env_remove("PROCTABLE_CAPACITY");
        cmd.env_remove("PROCTABLE_LOG");
        cmd
    }

    fn write_config(&self, content: &str) {
        let dir = self.dir.path().join(".proctable");
        fs::create_dir_all(&dir).expect("config dir");
        fs::write(dir.join("config.toml"), content).expect("config file");
    }
}

fn stdout_of(cmd: &mut Command, input: &str) -> String {
    let output = cmd.write_stdin(input).output().expect("process runs");
    assert!(output.status.success(), "exit status {:?}", output.status);
    String::from_utf8(output.stdout).expect("utf-8 output")
}

#[test]
fn scripted_session_matches_reference_transcript() {
    let home = TempHome::new();
    let out = stdout_of(&mut home.command(), "1\n2\n0\n2\n0\n2\n1\n3\n0\n4\n");

    let expected = [
        MENU,
        "Process list:\nProcess id: 0\nNo parent process\nNo child processes\n",
        MENU,
        "Enter the parent process id: ",
        "Process list:\nProcess id: 0\nNo parent process\nChild process: 1\n\
         Process id: 1\nParent process: 0\nNo child processes\n",
        MENU,
        "Enter the parent process id: ",
        "Process list:\nProcess id: 0\nNo parent process\nChild process: 1\nChild process: 2\n\
         Process id: 1\nParent process: 0\nNo child processes\n\
         Process id: 2\nParent process: 0\nNo child processes\n",
        MENU,
        "Enter the parent process id: ",
        "Process list:\nProcess id: 0\nNo parent process\nChild process: 1\nChild process: 2\n\
         Process id: 1\nParent process: 0\nChild process: 3\n\
         Process id: 2\nParent process: 0\nNo child processes\n\
         Process id: 3\nParent process: 1\nNo child processes\n",
        MENU,
        "Enter the parent process whose descendants are to be destroyed: ",
        "Process list:\nProcess id: 0\nNo parent process\nNo child processes\n",
        MENU,
        "Quitting program... memory freed\n",
    ]
    .concat();

    assert_eq!(out, expected);
}

#[test]
fn capacity_flag_limits_table() {
    let home = TempHome::new();
    let out = stdout_of(
        home.command().args(["--capacity", "2"]),
        "1\n2 0\n2 0\n2 1\n4\n",
    );
    // initialize + the single successful create
    assert_eq!(out.matches("Process list:").count(), 2);
    assert!(!out.contains("Process id: 2"));
}

#[test]
fn strict_flag_reports_ignored_commands() {
    let home = TempHome::new();
    home.command()
        .args(["--strict"])
        .write_stdin("1\n2 9\n3 -4\n4\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: process id 9 does not exist"))
        .stdout(predicate::str::contains("Error: process id -4 is outside 0..64"));
}

#[test]
fn garbage_input_and_eof_exit_cleanly() {
    let home = TempHome::new();
    home.command()
        .write_stdin("what\n7\n1\n2 zero\n")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Process list:").count(1));
}

#[test]
fn json_format_from_config_file() {
    let home = TempHome::new();
    home.write_config("format = \"json\"\ncapacity = 4\n");

    let out = stdout_of(&mut home.command(), "1\n4\n");
    let start = out.find('{').expect("json listing");
    let end = out.rfind('}').expect("json listing");
    let value: serde_json::Value = serde_json::from_str(&out[start..=end]).expect("valid json");
    assert_eq!(value["capacity"], 4);
    assert_eq!(value["processes"][0]["pid"], 0);
}

#[test]
fn malformed_config_is_fatal() {
    let home = TempHome::new();
    home.write_config("capacity = \"many\"\n");

    home.command()
        .write_stdin("4\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration problem"));
}

#[test]
fn env_capacity_is_used_and_flag_wins() {
    let home = TempHome::new();
    home.command()
        .env("PROCTABLE_CAPACITY", "3")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("capacity = 3"));

    home.command()
        .env("PROCTABLE_CAPACITY", "3")
        .args(["config", "--capacity", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("capacity = 5"));
}

#[test]
fn zero_capacity_is_rejected() {
    let home = TempHome::new();
    home.command()
        .args(["--capacity", "0"])
        .write_stdin("4\n")
        .assert()
        .code(1);
}

#[test]
fn eof_at_parent_prompt_exits_cleanly() {
    let home = TempHome::new();
    let out = stdout_of(&mut home.command(), "1\n2\n");
    assert!(out.ends_with("Enter the parent process id: \n"));
}

#[test]
fn log_file_setting_creates_runtime_files() {
    let home = TempHome::new();
    let log_file = home.dir.path().join("logs").join("session.log");
    home.command()
        .args(["--log-file"])
        .arg(&log_file)
        .args(["--log-level", "info"])
        .write_stdin("1\n4\n")
        .assert()
        .success();

    assert!(log_file.is_file());
    assert!(home.dir.path().join(".proctable").is_dir());
}

#[test]
fn version_subcommand() {
    let home = TempHome::new();
    home.command()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("proctable "));
}
