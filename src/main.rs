//! Manage the snapshots of web apps from the command line.
#![deny(missing_docs)]

// Always export the cmd_* modules as public so that it tells us when we are
// missing docs.

mod app;
mod cmd;
/// The completion command.
pub mod cmd_completion;
/// The config command.
pub mod cmd_config;
/// The snapshot command.
pub mod cmd_snapshot;
/// The version command.
pub mod cmd_version;
mod colors;
mod config;
mod config_file;
mod config_from_env;
mod config_from_file;
mod config_map;
mod confirm;
mod context;
mod iostreams;
mod logging;
mod snapshot;
#[cfg(test)]
mod tests;
mod types;
mod websites;

use std::io::Write;

use anyhow::Result;
use clap::Parser;

use crate::cmd::Command;

/// Manage the snapshots of web apps from the command line.
///
/// Environment variables that can be used with webapps.
///
/// WEBAPPS_TOKEN: a bearer token for management API requests. Takes precedence
/// over the token stored in the config file.
///
/// WEBAPPS_SUBSCRIPTION: the subscription that owns the web apps.
///
/// WEBAPPS_ENDPOINT: the management service to talk to, instead of
/// "https://management.azure.com".
///
/// WEBAPPS_RESOURCE_GROUP: the default resource group for snapshot commands.
///
/// DEBUG: set to any value to enable verbose output to standard error.
///
/// NO_COLOR: set to any value to avoid printing ANSI escape sequences for color output.
///
/// CLICOLOR: set to "0" to disable printing ANSI colors in output.
///
/// CLICOLOR_FORCE: set to a value other than "0" to keep ANSI colors in output
/// even when the output is piped.
///
/// WEBAPPS_CONFIG_DIR: the directory where webapps will store configuration files.
/// Default: "$XDG_CONFIG_HOME/webapps" or "$HOME/.config/webapps".
#[derive(Parser, Debug, Clone)]
#[clap(name = "webapps", version = clap::crate_version!(), author = clap::crate_authors!("\n"))]
struct Opts {
    /// Print debug info
    #[clap(short, long, global = true, env)]
    debug: bool,

    #[clap(subcommand)]
    subcmd: SubCommand,
}

#[derive(Parser, Debug, Clone)]
enum SubCommand {
    Completion(cmd_completion::CmdCompletion),
    Config(cmd_config::CmdConfig),
    Snapshot(cmd_snapshot::CmdSnapshot),
    Version(cmd_version::CmdVersion),
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();

    let debug = crate::logging::debug_requested(&args);
    let (log, guard) = crate::logging::new_logger(debug);
    if let Err(err) = crate::logging::bridge_std_log(&log, debug) {
        slog::warn!(log, "could not route library logs"; "error" => %err);
    }

    let code = run(args, log).await;

    // Flush the logger before exiting.
    drop(guard);
    std::process::exit(code);
}

async fn run(args: Vec<String>, log: slog::Logger) -> i32 {
    let mut c = match crate::config_file::parse_default_config() {
        Ok(c) => c,
        Err(err) => {
            eprintln!("{:#}", err);
            return 1;
        }
    };
    let mut config = crate::config_from_env::EnvConfig::inherit_env(&mut c);
    let mut ctx = match crate::context::Context::new(&mut config, log) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("{:#}", err);
            return 1;
        }
    };

    match do_main(args, &mut ctx).await {
        Ok(code) => code,
        Err(err) => {
            slog::debug!(ctx.log, "command failed"; "error" => ?err);
            let _ = writeln!(ctx.io.err_out, "{:#}", err);
            1
        }
    }
}

/// Parse `args` and run the selected command. Usage errors are written to
/// the context's streams and reported as exit code 2.
pub async fn do_main(args: Vec<String>, ctx: &mut crate::context::Context<'_>) -> Result<i32> {
    let opts = match Opts::try_parse_from(args) {
        Ok(opts) => opts,
        Err(err) => {
            return match err.kind() {
                clap::ErrorKind::DisplayHelp | clap::ErrorKind::DisplayVersion => {
                    write!(ctx.io.out, "{}", err)?;
                    Ok(0)
                }
                _ => {
                    write!(ctx.io.err_out, "{}", err)?;
                    Ok(2)
                }
            };
        }
    };

    // Set our debug flag.
    ctx.debug = opts.debug;

    match opts.subcmd {
        SubCommand::Completion(cmd) => cmd.run(ctx).await?,
        SubCommand::Config(cmd) => cmd.run(ctx).await?,
        SubCommand::Snapshot(cmd) => cmd.run(ctx).await?,
        SubCommand::Version(cmd) => cmd.run(ctx).await?,
    }

    Ok(0)
}
