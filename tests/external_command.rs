//! Integration tests for end-to-end command execution.

use std::collections::BTreeMap;

use assert_matches::assert_matches;
use xcmd::{Error, ExternalCommand};

#[test]
fn simple_command_succeeds() {
    let payload = ExternalCommand::new("echo \"foo\"").execute(None).unwrap();

    assert!(payload.is_success());
    assert!(!payload.is_error());
    assert_eq!(payload.output(), "foo");
    assert_eq!(payload.input(), None);
    assert!(payload.messages().is_empty());

    let extras = payload.extras();
    assert_eq!(extras.command(), "echo \"foo\"");
    assert_eq!(extras.cwd(), None);
    assert!(extras.env().is_empty());
}

#[test]
fn unknown_command_reports_status_127() {
    let payload = ExternalCommand::new("NonExistantCommand123").execute(None).unwrap();

    assert!(payload.is_error());
    assert!(!payload.is_success());
    assert_eq!(payload.status(), 127);
    assert_eq!(payload.messages().len(), 1);
    assert!(payload.messages()[0].contains("NonExistantCommand123"));
}

#[test]
fn input_round_trips_through_cat() {
    let payload = ExternalCommand::new("cat").execute(Some("foo")).unwrap();

    assert!(payload.is_success());
    assert_eq!(payload.output(), "foo");
    assert_eq!(payload.input(), Some("foo"));
    assert!(payload.messages().is_empty());
}

#[test]
fn working_directory_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().canonicalize().unwrap();

    let payload =
        ExternalCommand::new("pwd").current_dir(&path).execute(None).unwrap();

    assert!(payload.is_success());
    assert_eq!(payload.output(), path.to_string_lossy());
    assert_eq!(payload.extras().cwd(), Some(path.as_path()));
}

#[test]
fn environment_propagates() {
    let payload = ExternalCommand::new("echo $FOO")
        .env([("FOO", "foobarbaz")])
        .execute(None)
        .unwrap();

    assert!(payload.is_success());
    assert_eq!(payload.output(), "foobarbaz");

    let expected: BTreeMap<String, String> =
        [("FOO".to_string(), "foobarbaz".to_string())].into();
    assert_eq!(payload.extras().env(), &expected);
}

#[test]
fn strict_mode_raises_on_failure() {
    let err = ExternalCommand::new("echo boom >&2; exit 3")
        .strict(true)
        .execute(None)
        .unwrap_err();

    assert_matches!(err, Error::CommandFailed { status: 3, ref stderr, .. } => {
        assert!(stderr.contains("boom"));
    });
}

#[test]
fn strict_mode_passes_on_success() {
    let payload = ExternalCommand::new("echo fine").strict(true).execute(None).unwrap();

    assert!(payload.is_success());
    assert_eq!(payload.output(), "fine");
}

#[test]
fn invalid_working_directory_is_a_spawn_error() {
    // Spawn failures propagate regardless of strict mode.
    let err = ExternalCommand::new("echo never")
        .current_dir("/no/such/directory/xcmd")
        .execute(None)
        .unwrap_err();

    assert_matches!(err, Error::Spawn { .. });
}

#[test]
fn large_stderr_does_not_deadlock() {
    // Well past the pipe buffer size, written entirely to stderr.
    let payload = ExternalCommand::new("seq 1 50000 >&2").execute(None).unwrap();

    assert!(payload.is_success());
    assert_eq!(payload.messages().len(), 50_000);
    assert_eq!(payload.messages()[0], "1");
    assert_eq!(payload.messages()[49_999], "50000");
}

#[test]
fn large_input_does_not_deadlock() {
    // Input larger than the pipe buffer forces the write and the stdout
    // drain to overlap.
    let input = "x".repeat(1 << 20);
    let payload = ExternalCommand::new("cat").execute(Some(&input)).unwrap();

    assert!(payload.is_success());
    assert_eq!(payload.output(), input);
}

#[test]
fn executor_is_reusable_across_invocations() {
    let command = ExternalCommand::new("cat");

    let first = command.execute(Some("one")).unwrap();
    let second = command.execute(Some("two")).unwrap();

    assert_eq!(first.output(), "one");
    assert_eq!(second.output(), "two");
}
