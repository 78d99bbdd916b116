//! Integration tests for top-level CLI behavior.

use std::process::Command;

fn snyk_task() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_snyk-task"));
    cmd.env_remove("SNYK_TASK_RECORD")
        .env_remove("INPUT_SERVICECONNECTIONENDPOINT")
        .env_remove("INPUT_AUTHTOKEN")
        .env_remove("INPUT_SEVERITYTHRESHOLD")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn invalid_threshold_fails_before_any_command() {
    let output = snyk_task()
        .args(["run"])
        .env("INPUT_SEVERITYTHRESHOLD", "critical")
        .env("PATH", "")
        .output()
        .expect("failed to run snyk-task");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stdout
        .contains("##vso[task.complete result=Failed;]If set, severity threshold must be"));
    assert!(stderr.contains("'high' or 'medium' or 'low'"));
}

#[test]
fn missing_token_fails_with_setup_hint() {
    let output =
        snyk_task().args(["run"]).env("PATH", "").output().expect("failed to run snyk-task");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(!output.status.success());
    assert!(stdout.contains("auth token is not set"));
    assert_eq!(stdout.matches("##vso[task.complete").count(), 1);
}

#[test]
fn replay_help_shows_usage() {
    let output = snyk_task().args(["replay", "--help"]).output().expect("failed to run snyk-task");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("DIR") || stdout.contains("dir"));
    assert!(stdout.contains("--debug"));
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let output = snyk_task().args(["nonsense"]).output().expect("failed to run snyk-task");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}

#[cfg(unix)]
mod agent {
    //! Runs the binary against fake `npm`, `snyk` and `sudo` executables.

    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use std::process::Output;

    use super::snyk_task;

    const SUDO: &str = "#!/bin/sh\necho \"sudo $*\" >> \"$CALL_LOG\"\nexec \"$@\"\n";
    const NPM: &str = "#!/bin/sh\necho \"npm $*\" >> \"$CALL_LOG\"\nexit 0\n";
    const SNYK: &str = r#"#!/bin/sh
echo "snyk $* [$SNYK_INTEGRATION_NAME]" >> "$CALL_LOG"
case "$1" in
  test)
    case "$*" in *--json*) echo '{"ok": true}' ;; esac
    exit "${SNYK_TEST_EXIT:-0}" ;;
  monitor) exit "${SNYK_MONITOR_EXIT:-0}" ;;
esac
exit 0
"#;
    const SNYK_TO_HTML: &str = r#"#!/bin/sh
echo "snyk-to-html $*" >> "$CALL_LOG"
echo "<html>$(cat "$2")</html>"
"#;

    fn install(dir: &Path, name: &str, script: &str) {
        let path = dir.join(name);
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn run_agent(test_exit: i32, fail_on_issues: bool) -> (Output, Vec<String>) {
        run_agent_at("info", test_exit, fail_on_issues)
    }

    fn run_agent_at(level: &str, test_exit: i32, fail_on_issues: bool) -> (Output, Vec<String>) {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        install(bin.path(), "sudo", SUDO);
        install(bin.path(), "npm", NPM);
        install(bin.path(), "snyk", SNYK);
        let log = work.path().join("calls.log");

        let output = snyk_task()
            .args(["run", "--log-level", level])
            .env("PATH", bin.path())
            .env("AGENT_OS", "Linux")
            .env("CALL_LOG", &log)
            .env("SNYK_TEST_EXIT", test_exit.to_string())
            .env("INPUT_AUTHTOKEN", "tok-123")
            .env("INPUT_TESTDIRECTORY", work.path())
            .env("INPUT_ORGANIZATION", "some-snyk-org")
            .env("INPUT_FAILONISSUES", fail_on_issues.to_string())
            .output()
            .expect("failed to run snyk-task");

        let calls = std::fs::read_to_string(&log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect();
        (output, calls)
    }

    #[test]
    fn clean_scan_runs_every_command_elevated() {
        let (output, calls) = run_agent(0, true);

        assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
        assert_eq!(
            calls,
            vec![
                "sudo npm install -g snyk",
                "npm install -g snyk",
                "sudo snyk auth tok-123",
                "snyk auth tok-123 []",
                "sudo snyk test",
                "snyk test [AZURE_PIPELINES]",
                "sudo snyk monitor --org=some-snyk-org",
                "snyk monitor --org=some-snyk-org [AZURE_PIPELINES]",
            ]
        );
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stdout.contains("##vso[task.complete result=Succeeded;]"));
        assert!(!stdout.contains("tok-123"), "token leaked to stdout: {stdout}");
        assert!(!stderr.contains("tok-123"), "token leaked to stderr: {stderr}");
    }

    #[test]
    fn debug_logging_masks_the_token() {
        let (output, calls) = run_agent_at("debug", 0, true);

        assert!(output.status.success());
        assert!(calls.contains(&"snyk auth tok-123 []".to_string()));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("***"), "stderr: {stderr}");
        assert!(!stderr.contains("tok-123"), "token leaked to stderr: {stderr}");
        assert!(!String::from_utf8_lossy(&output.stdout).contains("tok-123"));
    }

    #[test]
    fn issues_found_fails_without_monitoring() {
        let (output, calls) = run_agent(1, true);

        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("`snyk test` found issues"));
        assert!(calls.iter().all(|call| !call.contains("monitor")));
    }

    #[test]
    fn tolerated_issues_still_monitor() {
        let (output, calls) = run_agent(1, false);

        assert!(output.status.success());
        assert!(calls.iter().any(|call| call.starts_with("snyk monitor")));
    }

    #[test]
    fn reports_are_written_and_attached() {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        install(bin.path(), "npm", NPM);
        install(bin.path(), "snyk", SNYK);
        install(bin.path(), "snyk-to-html", SNYK_TO_HTML);
        let reports = work.path().join("reports");

        let output = snyk_task()
            .args(["run"])
            .env("PATH", bin.path())
            .env("AGENT_OS", "Windows_NT")
            .env("CALL_LOG", work.path().join("calls.log"))
            .env("SNYK_TEST_EXIT", "1")
            .env("INPUT_AUTHTOKEN", "tok-123")
            .env("INPUT_TESTDIRECTORY", work.path())
            .env("INPUT_REPORTDIRECTORY", &reports)
            .output()
            .expect("failed to run snyk-task");
        assert!(!output.status.success());

        let mut written: Vec<_> = std::fs::read_dir(&reports)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        written.sort();
        assert_eq!(written.len(), 2);
        let html = std::fs::read_to_string(&written[0]).unwrap();
        let json = std::fs::read_to_string(&written[1]).unwrap();
        assert!(written[0].extension().is_some_and(|ext| ext == "html"));
        assert_eq!(json.trim(), r#"{"ok": true}"#);
        assert_eq!(html.trim(), r#"<html>{"ok": true}</html>"#);

        let calls = std::fs::read_to_string(work.path().join("calls.log")).unwrap();
        assert!(calls.contains("npm install -g snyk snyk-to-html"));
        assert!(calls.contains("snyk test --json"));

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert_eq!(stdout.matches("##vso[task.addattachment").count(), 2);
        assert!(stdout.contains("##vso[task.complete result=Failed;]"));
    }

    #[test]
    fn recorded_run_replays_without_tools() {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let cassettes = tempfile::tempdir().unwrap();
        install(bin.path(), "npm", NPM);
        install(bin.path(), "snyk", SNYK);

        let recorded = snyk_task()
            .args(["run"])
            .env("PATH", bin.path())
            .env("AGENT_OS", "Windows_NT")
            .env("CALL_LOG", work.path().join("calls.log"))
            .env("SNYK_TEST_EXIT", "1")
            .env("SNYK_TASK_RECORD", cassettes.path())
            .env("INPUT_AUTHTOKEN", "tok-secret")
            .env("INPUT_TESTDIRECTORY", work.path())
            .output()
            .expect("failed to run snyk-task");
        assert!(!recorded.status.success());

        let sessions: Vec<_> = std::fs::read_dir(cassettes.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(sessions.len(), 1);
        let host_cassette =
            std::fs::read_to_string(sessions[0].join("host.cassette.yaml")).unwrap();
        let process_cassette =
            std::fs::read_to_string(sessions[0].join("process.cassette.yaml")).unwrap();
        assert!(!host_cassette.contains("tok-secret"));
        assert!(!process_cassette.contains("tok-secret"));

        let replayed = snyk_task()
            .arg("replay")
            .arg(&sessions[0])
            .env("PATH", "")
            .output()
            .expect("failed to run snyk-task");
        let stderr = String::from_utf8_lossy(&replayed.stderr);
        assert!(!replayed.status.success());
        assert!(stderr.contains("`snyk test` found issues"));
        assert!(!stderr.contains("replay diverged"));
    }
}
