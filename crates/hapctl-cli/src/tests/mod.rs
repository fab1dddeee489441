//! Runtime tests driving the CLI against a fake stats socket.

mod support;

use std::ffi::OsString;
use std::process::ExitCode;

use hapctl_config::{Config, SocketEndpoint};
use rstest::rstest;

use crate::{AppError, ConfigLoader, IoStreams, run_with_loader};

use support::FakeHaproxy;

struct StaticLoader {
    config: Config,
}

impl ConfigLoader for StaticLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

struct Outcome {
    exit: ExitCode,
    stdout: String,
    stderr: String,
}

fn run_cli(config: Config, args: &[&str]) -> Outcome {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let loader = StaticLoader { config };
    let argv: Vec<OsString> = std::iter::once("hapctl")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect();
    let exit = {
        let mut io = IoStreams::new(&mut stdout, &mut stderr, false);
        run_with_loader(argv, &mut io, &loader)
    };
    Outcome {
        exit,
        stdout: String::from_utf8(stdout).expect("stdout utf8"),
        stderr: String::from_utf8(stderr).expect("stderr utf8"),
    }
}

fn config_for(server: &FakeHaproxy, read_only: bool) -> Config {
    Config {
        stats_socket: server.endpoint(),
        read_only,
        io_timeout_ms: Some(5_000),
        ..Config::default()
    }
}

#[test]
fn stats_render_as_tables() {
    let server = FakeHaproxy::start(1, "");
    let outcome = run_cli(config_for(&server, false), &["--output", "human", "stats"]);

    assert_eq!(outcome.exit, ExitCode::SUCCESS, "stderr: {}", outcome.stderr);
    assert!(outcome.stdout.starts_with("web\n"), "{}", outcome.stdout);
    assert!(outcome.stdout.contains("srv2      MAINT"), "{}", outcome.stdout);
    assert_eq!(server.finish(), vec![String::from("show stat")]);
}

#[test]
fn stats_default_to_json_off_terminal() {
    let server = FakeHaproxy::start(1, "");
    let outcome = run_cli(config_for(&server, true), &["stats", "--listeners-only"]);

    assert_eq!(outcome.exit, ExitCode::SUCCESS, "stderr: {}", outcome.stderr);
    let value: serde_json::Value = serde_json::from_str(&outcome.stdout).expect("json output");
    let servers = value[0]["servers"].as_array().expect("servers array");
    assert_eq!(servers.len(), 2);
    assert_eq!(servers[0]["svname"], "srv1");
    server.finish();
}

#[rstest]
#[case(&["weight", "web", "srv1", "30"], "set server web/srv1 weight 30")]
#[case(&["state", "web", "srv1", "drain"], "set server web/srv1 state drain")]
#[case(&["health", "web", "srv1", "stopping"], "set server web/srv1 health stopping")]
#[case(&["health-check", "web", "srv1", "disable"], "disable health web/srv1")]
#[case(&["agent", "web", "srv1", "down"], "set server web/srv1 agent down")]
#[case(&["agent-check", "web", "srv1", "enable"], "enable agent web/srv1")]
#[case(&["action", "changeWeight", "web", "srv1", "7"], "set server web/srv1 weight 7")]
#[case(&["action", "set-state-maint", "web", "srv1"], "set server web/srv1 state maint")]
fn mutating_commands_send_exact_lines(#[case] args: &[&str], #[case] expected: &str) {
    let server = FakeHaproxy::start(1, "");
    let outcome = run_cli(config_for(&server, false), args);

    assert_eq!(outcome.exit, ExitCode::SUCCESS, "stderr: {}", outcome.stderr);
    assert!(outcome.stdout.is_empty(), "{}", outcome.stdout);
    assert_eq!(server.finish(), vec![String::from(expected)]);
}

#[test]
fn peer_response_is_echoed() {
    let server = FakeHaproxy::start(1, "No such server.\n");
    let outcome = run_cli(config_for(&server, false), &["state", "web", "nope", "ready"]);

    assert_eq!(outcome.exit, ExitCode::SUCCESS);
    assert_eq!(outcome.stdout, "No such server.\n");
    server.finish();
}

#[test]
fn read_only_refuses_mutations_without_connecting() {
    let server = FakeHaproxy::start(0, "");
    let outcome = run_cli(config_for(&server, true), &["weight", "web", "srv1", "30"]);

    assert_eq!(outcome.exit, ExitCode::from(1));
    assert!(outcome.stderr.contains("read-only"), "{}", outcome.stderr);
    assert!(server.finish().is_empty());
}

#[test]
fn non_numeric_weight_is_a_validation_error() {
    let server = FakeHaproxy::start(0, "");
    let outcome = run_cli(config_for(&server, false), &["weight", "web", "srv1", "heavy"]);

    assert_eq!(outcome.exit, ExitCode::from(1));
    assert!(outcome.stderr.contains("not an integer"), "{}", outcome.stderr);
    assert!(server.finish().is_empty());
}

#[test]
fn unknown_named_action_fails() {
    let server = FakeHaproxy::start(0, "");
    let outcome = run_cli(config_for(&server, false), &["action", "reboot", "web", "srv1"]);

    assert_eq!(outcome.exit, ExitCode::from(1));
    assert!(outcome.stderr.contains("unknown action 'reboot'"), "{}", outcome.stderr);
    server.finish();
}

#[test]
fn unreachable_socket_exits_with_transport_status() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let path = dir.path().join("missing.sock");
    let config = Config {
        stats_socket: SocketEndpoint::unix(path.to_str().expect("utf8 path")),
        ..Config::default()
    };
    let outcome = run_cli(config, &["stats"]);

    assert_eq!(outcome.exit, ExitCode::from(2));
    assert!(outcome.stderr.contains("missing.sock"), "{}", outcome.stderr);
}

#[test]
fn help_is_written_to_stdout() {
    let outcome = run_cli(Config::default(), &["--help"]);
    assert_eq!(outcome.exit, ExitCode::SUCCESS);
    assert!(outcome.stdout.contains("health-check"), "{}", outcome.stdout);
    assert!(outcome.stderr.is_empty());
}

#[rstest]
#[case::missing_command(&[])]
#[case::bad_state(&["state", "web", "srv1", "sleep"])]
#[case::missing_server(&["weight", "web"])]
fn usage_errors_exit_with_failure(#[case] args: &[&str]) {
    let outcome = run_cli(Config::default(), args);
    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(!outcome.stderr.is_empty());
}
