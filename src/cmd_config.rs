use std::io::Write;

use anyhow::{bail, Result};
use clap::Parser;

/// Manage configuration for webapps.
///
/// Current respected settings:
/// - subscription: the subscription id that owns the web apps
/// - endpoint: the base URL of the management service
/// - token: the bearer token used to authenticate requests
/// - prompt: toggle interactive prompting in the terminal (default: "enabled")
/// - format: the default output format for listings (default: "table")
#[derive(Parser, Debug, Clone)]
#[clap(verbatim_doc_comment)]
pub struct CmdConfig {
    #[clap(subcommand)]
    subcmd: SubCommand,
}

#[derive(Parser, Debug, Clone)]
enum SubCommand {
    Get(CmdConfigGet),
    Set(CmdConfigSet),
    List(CmdConfigList),
}

#[async_trait::async_trait]
impl crate::cmd::Command for CmdConfig {
    async fn run(&self, ctx: &mut crate::context::Context<'_>) -> Result<()> {
        match &self.subcmd {
            SubCommand::Get(cmd) => cmd.run(ctx).await,
            SubCommand::Set(cmd) => cmd.run(ctx).await,
            SubCommand::List(cmd) => cmd.run(ctx).await,
        }
    }
}

/// Print the value of a given configuration key.
#[derive(Parser, Debug, Clone)]
#[clap(verbatim_doc_comment)]
pub struct CmdConfigGet {
    #[clap(name = "key", required = true)]
    key: String,
}

#[async_trait::async_trait]
impl crate::cmd::Command for CmdConfigGet {
    async fn run(&self, ctx: &mut crate::context::Context<'_>) -> Result<()> {
        let value = ctx.config.get(&self.key)?;
        writeln!(ctx.io.out, "{}", value)?;

        Ok(())
    }
}

/// Update configuration with a value for the given key.
#[derive(Parser, Debug, Clone)]
#[clap(verbatim_doc_comment)]
pub struct CmdConfigSet {
    #[clap(name = "key", required = true)]
    key: String,

    #[clap(name = "value", required = true)]
    value: String,
}

#[async_trait::async_trait]
impl crate::cmd::Command for CmdConfigSet {
    async fn run(&self, ctx: &mut crate::context::Context<'_>) -> Result<()> {
        let cs = ctx.io.color_scheme();

        // Validate the key.
        if crate::config::validate_key(&self.key).is_err() {
            bail!("{} warning: '{}' is not a known configuration key", cs.warning_icon(), self.key);
        }

        // Validate the value.
        crate::config::validate_value(&self.key, &self.value)?;

        ctx.config.check_writable(&self.key)?;
        ctx.config.set(&self.key, &self.value)?;

        // Write the config file.
        ctx.config.write()?;

        slog::debug!(ctx.log, "config updated"; "key" => &self.key);

        Ok(())
    }
}

/// Print a list of configuration keys and values.
#[derive(Parser, Debug, Clone)]
#[clap(verbatim_doc_comment)]
pub struct CmdConfigList {}

#[async_trait::async_trait]
impl crate::cmd::Command for CmdConfigList {
    async fn run(&self, ctx: &mut crate::context::Context<'_>) -> Result<()> {
        for option in crate::config::config_options() {
            let mut value = ctx.config.get(&option.key)?;
            if option.key == "token" && !value.is_empty() {
                value = "********".to_string();
            }

            writeln!(ctx.io.out, "{}={}", option.key, value)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::{cmd::Command, config::Config};

    pub struct TestItem {
        name: String,
        cmd: crate::cmd_config::SubCommand,
        want_out: String,
        want_err: String,
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn test_cmd_config() {
        let dir = tempfile::tempdir().unwrap();
        let orig = std::env::var("WEBAPPS_CONFIG_DIR").ok();
        std::env::set_var("WEBAPPS_CONFIG_DIR", dir.path());

        let tests: Vec<TestItem> = vec![
            TestItem {
                name: "set a bad key".to_string(),
                cmd: crate::cmd_config::SubCommand::Set(crate::cmd_config::CmdConfigSet {
                    key: "hosts".to_string(),
                    value: "x".to_string(),
                }),
                want_out: "".to_string(),
                want_err: "! warning: 'hosts' is not a known configuration key".to_string(),
            },
            TestItem {
                name: "set a bad value".to_string(),
                cmd: crate::cmd_config::SubCommand::Set(crate::cmd_config::CmdConfigSet {
                    key: "prompt".to_string(),
                    value: "sometimes".to_string(),
                }),
                want_out: "".to_string(),
                want_err: r#"invalid values, valid values: ["enabled", "disabled"]"#.to_string(),
            },
            TestItem {
                name: "set the subscription".to_string(),
                cmd: crate::cmd_config::SubCommand::Set(crate::cmd_config::CmdConfigSet {
                    key: "subscription".to_string(),
                    value: "0000".to_string(),
                }),
                want_out: "".to_string(),
                want_err: "".to_string(),
            },
            TestItem {
                name: "get the subscription".to_string(),
                cmd: crate::cmd_config::SubCommand::Get(crate::cmd_config::CmdConfigGet {
                    key: "subscription".to_string(),
                }),
                want_out: "0000\n".to_string(),
                want_err: "".to_string(),
            },
            TestItem {
                name: "get a default".to_string(),
                cmd: crate::cmd_config::SubCommand::Get(crate::cmd_config::CmdConfigGet {
                    key: "format".to_string(),
                }),
                want_out: "table\n".to_string(),
                want_err: "".to_string(),
            },
            TestItem {
                name: "get an unknown key".to_string(),
                cmd: crate::cmd_config::SubCommand::Get(crate::cmd_config::CmdConfigGet {
                    key: "hosts".to_string(),
                }),
                want_out: "".to_string(),
                want_err: "invalid key".to_string(),
            },
            TestItem {
                name: "list".to_string(),
                cmd: crate::cmd_config::SubCommand::List(crate::cmd_config::CmdConfigList {}),
                want_out: "subscription=0000\nendpoint=https://management.azure.com\ntoken=\nprompt=enabled\nformat=table\n"
                    .to_string(),
                want_err: "".to_string(),
            },
        ];

        let mut config = crate::config::new_blank_config().unwrap();

        for t in tests {
            let (mut io, stdout_path, stderr_path) = crate::iostreams::IoStreams::test();
            io.set_color_enabled(false);
            io.set_never_prompt(true);
            let mut ctx = crate::context::Context {
                config: &mut config,
                io,
                debug: false,
                log: crate::logging::discard(),
            };

            let cmd_config = crate::cmd_config::CmdConfig { subcmd: t.cmd };
            match cmd_config.run(&mut ctx).await {
                Ok(()) => {
                    let stdout = std::fs::read_to_string(stdout_path).unwrap();
                    let stderr = std::fs::read_to_string(stderr_path).unwrap();
                    assert!(t.want_err.is_empty(), "test {}: wanted error {}", t.name, t.want_err);
                    assert!(stderr.is_empty(), "test {}: {}", t.name, stderr);
                    assert_eq!(stdout, t.want_out, "test {}: stdout mismatch", t.name);
                }
                Err(err) => {
                    let stdout = std::fs::read_to_string(stdout_path).unwrap();
                    assert_eq!(stdout, t.want_out, "test {}", t.name);
                    assert_eq!(err.to_string(), t.want_err, "test {}: err mismatch", t.name);
                }
            }
        }

        // The set above was written to disk.
        let written = crate::config_file::parse_default_config().unwrap();
        assert_eq!(written.get("subscription").unwrap(), "0000");

        match orig {
            Some(v) => std::env::set_var("WEBAPPS_CONFIG_DIR", v),
            None => std::env::remove_var("WEBAPPS_CONFIG_DIR"),
        }
    }

    #[tokio::test]
    async fn test_cmd_config_list_masks_token() {
        let mut config = crate::config::new_blank_config().unwrap();
        config.set("token", "secret").unwrap();

        let (mut io, stdout_path, _) = crate::iostreams::IoStreams::test();
        io.set_color_enabled(false);
        let mut ctx = crate::context::Context {
            config: &mut config,
            io,
            debug: false,
            log: crate::logging::discard(),
        };

        crate::cmd_config::CmdConfigList {}.run(&mut ctx).await.unwrap();

        let stdout = std::fs::read_to_string(stdout_path).unwrap();
        assert!(stdout.contains("token=********\n"), "{}", stdout);
        assert!(!stdout.contains("secret"), "{}", stdout);
    }
}
