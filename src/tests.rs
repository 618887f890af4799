use pretty_assertions::assert_eq;
use test_context::{test_context, AsyncTestContext};

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct TestItem {
    name: String,
    args: Vec<String>,
    want_out: String,
    want_err: String,
    want_code: i32,
}

const ISOLATED_VARS: &[&str] = &[
    "WEBAPPS_CONFIG_DIR",
    "WEBAPPS_TOKEN",
    "WEBAPPS_SUBSCRIPTION",
    "WEBAPPS_ENDPOINT",
    "WEBAPPS_RESOURCE_GROUP",
    "DEBUG",
];

/// Runs against an empty config directory with none of our variables set.
struct MainContext {
    config_dir: tempfile::TempDir,
    saved: Vec<(&'static str, Option<String>)>,
}

#[async_trait::async_trait]
impl AsyncTestContext for MainContext {
    async fn setup() -> Self {
        let saved = ISOLATED_VARS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect::<Vec<_>>();
        for k in ISOLATED_VARS {
            std::env::remove_var(k);
        }

        let config_dir = tempfile::tempdir().unwrap();
        std::env::set_var("WEBAPPS_CONFIG_DIR", config_dir.path());

        Self { config_dir, saved }
    }

    async fn teardown(self) {
        for (k, v) in self.saved {
            match v {
                Some(v) => std::env::set_var(k, v),
                None => std::env::remove_var(k),
            }
        }

        self.config_dir.close().unwrap();
    }
}

fn args(a: &[&str]) -> Vec<String> {
    a.iter().map(|s| s.to_string()).collect()
}

async fn run_items(tests: Vec<TestItem>) {
    let mut config = crate::config_file::parse_default_config().unwrap();
    let mut c = crate::config_from_env::EnvConfig::inherit_env(&mut config);

    for t in tests {
        let (mut io, stdout_path, stderr_path) = crate::iostreams::IoStreams::test();
        io.set_stdout_tty(false);
        io.set_color_enabled(false);
        let mut ctx = crate::context::Context {
            config: &mut c,
            io,
            debug: false,
            log: crate::logging::discard(),
        };

        let result = crate::do_main(t.args, &mut ctx).await;

        let stdout = std::fs::read_to_string(stdout_path).unwrap_or_default();
        let stderr = std::fs::read_to_string(stderr_path).unwrap_or_default();

        assert!(
            stdout.contains(&t.want_out),
            "test {} ->\nstdout: {}\nwant: {}\n\nstderr: {}",
            t.name,
            stdout,
            t.want_out,
            stderr,
        );

        match result {
            Ok(code) => {
                assert_eq!(code, t.want_code, "test {}", t.name);
                assert_eq!(stdout.is_empty(), t.want_out.is_empty(), "test {}", t.name);
                assert_eq!(
                    stderr.is_empty(),
                    t.want_err.is_empty(),
                    "test {} -> stderr: {}\nwant_err: {}",
                    t.name,
                    stderr,
                    t.want_err
                );
                assert!(
                    stderr.contains(&t.want_err),
                    "test {} ->\nstderr: {}\nwant: {}\n\nstdout: {}",
                    t.name,
                    stderr,
                    t.want_err,
                    stdout,
                );
            }
            Err(err) => {
                assert!(!t.want_err.is_empty(), "test {}: unexpected error {}", t.name, err);
                assert!(
                    err.to_string().contains(&t.want_err),
                    "test {} -> err: {}\nwant_err: {}",
                    t.name,
                    err,
                    t.want_err
                );
                assert!(stderr.is_empty(), "test {}", t.name);
            }
        }
    }
}

#[test_context(MainContext)]
#[tokio::test]
#[serial_test::serial]
async fn test_main(_ctx: &mut MainContext) {
    let tests: Vec<TestItem> = vec![
        TestItem {
            name: "version".to_string(),
            args: args(&["webapps", "version"]),
            want_out: format!("webapps {}\n", env!("CARGO_PKG_VERSION")),
            ..Default::default()
        },
        TestItem {
            name: "--version".to_string(),
            args: args(&["webapps", "--version"]),
            want_out: format!("webapps {}", env!("CARGO_PKG_VERSION")),
            ..Default::default()
        },
        TestItem {
            name: "help".to_string(),
            args: args(&["webapps", "snapshot", "restore", "--help"]),
            want_out: "Restore a web app snapshot.".to_string(),
            ..Default::default()
        },
        TestItem {
            name: "unknown subcommand".to_string(),
            args: args(&["webapps", "snapshots"]),
            want_err: "snapshots".to_string(),
            want_code: 2,
            ..Default::default()
        },
        TestItem {
            name: "completion zsh".to_string(),
            args: args(&["webapps", "completion", "-s", "zsh"]),
            want_out: "#compdef webapps".to_string(),
            ..Default::default()
        },
        TestItem {
            name: "set an unknown key".to_string(),
            args: args(&["webapps", "config", "set", "foo", "bar"]),
            want_err: "! warning: 'foo' is not a known configuration key".to_string(),
            ..Default::default()
        },
        TestItem {
            name: "set the subscription".to_string(),
            args: args(&["webapps", "config", "set", "subscription", "0000"]),
            ..Default::default()
        },
        TestItem {
            name: "get the subscription".to_string(),
            args: args(&["webapps", "config", "get", "subscription"]),
            want_out: "0000\n".to_string(),
            ..Default::default()
        },
        TestItem {
            name: "restore without a time".to_string(),
            args: args(&["webapps", "snapshot", "restore", "app1", "-g", "rg1", "--force"]),
            want_err: "--time".to_string(),
            want_code: 2,
            ..Default::default()
        },
        TestItem {
            name: "target resource group without a target".to_string(),
            args: args(&[
                "webapps",
                "snapshot",
                "restore",
                "app1",
                "-g",
                "rg1",
                "-t",
                "2017-03-21T21:19:00.0964722",
                "--target-resource-group",
                "rg2",
            ]),
            want_err: "--target".to_string(),
            want_code: 2,
            ..Default::default()
        },
        TestItem {
            name: "restore without a token".to_string(),
            args: args(&[
                "webapps",
                "snapshot",
                "restore",
                "app1",
                "-g",
                "rg1",
                "-t",
                "2017-03-21T21:19:00.0964722",
                "--force",
            ]),
            want_err: "no token configured".to_string(),
            ..Default::default()
        },
        TestItem {
            name: "list without a token".to_string(),
            args: args(&["webapps", "snapshot", "list", "app1", "-g", "rg1"]),
            want_err: "no token configured".to_string(),
            ..Default::default()
        },
    ];

    run_items(tests).await;
}

#[test_context(MainContext)]
#[tokio::test]
#[serial_test::serial]
async fn test_main_restore_rejected_before_any_request(_ctx: &mut MainContext) {
    // Nothing listens here; a request would fail with a connection error.
    std::env::set_var("WEBAPPS_ENDPOINT", "http://127.0.0.1:9");
    std::env::set_var("WEBAPPS_TOKEN", "token");
    std::env::set_var("WEBAPPS_SUBSCRIPTION", "0000");

    let restore = |extra: &[&str]| {
        let mut a = args(&[
            "webapps",
            "snapshot",
            "restore",
            "app1",
            "-g",
            "rg1",
            "-t",
            "2017-03-21T21:19:00.0964722",
            "--force",
        ]);
        a.extend(args(extra));
        a
    };

    let tests: Vec<TestItem> = vec![
        TestItem {
            name: "target is another app".to_string(),
            args: restore(&["--target", "app2/staging"]),
            want_err: "Target app must be a slot of the source web app.".to_string(),
            ..Default::default()
        },
        TestItem {
            name: "target is in another resource group".to_string(),
            args: restore(&["--target", "app1/staging", "--target-resource-group", "rg2"]),
            want_err: "Target app must be a slot of the source web app.".to_string(),
            ..Default::default()
        },
        TestItem {
            name: "token is read-only from the environment".to_string(),
            args: args(&["webapps", "config", "set", "token", "other"]),
            want_err: "read-only value in: WEBAPPS_TOKEN".to_string(),
            ..Default::default()
        },
    ];

    run_items(tests).await;
}
