use std::io::Write;

use anyhow::{anyhow, Result};
use clap::Parser;

use crate::{
    app::{AppIdentity, TargetApp},
    confirm::{Confirm, Confirmation, Gate},
    types::FormatOutput,
    websites::{Snapshot, Websites},
};

/// List and restore web app snapshots.
///
/// Snapshots are point-in-time copies of a web app's files and configuration
/// kept by the platform.
#[derive(Parser, Debug, Clone)]
#[clap(verbatim_doc_comment)]
pub struct CmdSnapshot {
    #[clap(subcommand)]
    subcmd: SubCommand,
}

#[derive(Parser, Debug, Clone)]
enum SubCommand {
    List(CmdSnapshotList),
    Restore(CmdSnapshotRestore),
}

#[async_trait::async_trait]
impl crate::cmd::Command for CmdSnapshot {
    async fn run(&self, ctx: &mut crate::context::Context<'_>) -> Result<()> {
        match &self.subcmd {
            SubCommand::List(cmd) => cmd.run(ctx).await,
            SubCommand::Restore(cmd) => cmd.run(ctx).await,
        }
    }
}

/// List the snapshots of a web app.
#[derive(Parser, Debug, Clone)]
#[clap(verbatim_doc_comment)]
pub struct CmdSnapshotList {
    /// The web app. Use `app/slot` to select a deployment slot.
    #[clap(name = "app", required = true)]
    pub app: String,

    /// The resource group that contains the web app.
    #[clap(long, short = 'g', env = "WEBAPPS_RESOURCE_GROUP")]
    pub resource_group: String,

    /// The deployment slot.
    #[clap(long, short)]
    pub slot: Option<String>,

    /// Output format.
    #[clap(long, short)]
    pub format: Option<FormatOutput>,
}

#[async_trait::async_trait]
impl crate::cmd::Command for CmdSnapshotList {
    async fn run(&self, ctx: &mut crate::context::Context<'_>) -> Result<()> {
        let client = ctx.api_client()?;
        self.list(ctx, &client).await
    }
}

impl CmdSnapshotList {
    /// Print the snapshots of the web app, as reported by `client`.
    pub async fn list(&self, ctx: &mut crate::context::Context<'_>, client: &dyn Websites) -> Result<()> {
        let app = AppIdentity::parse(&self.resource_group, &self.app, self.slot.as_deref())?;
        let format = ctx.format(&self.format)?;

        let snapshots = client.list_snapshots(&app).await?;
        slog::debug!(ctx.log, "listed snapshots"; "app" => %app, "count" => snapshots.len());

        match format {
            FormatOutput::Json => ctx.io.write_json(&serde_json::json!(snapshots)),
            FormatOutput::Yaml => ctx.io.write_yaml(&serde_json::json!(snapshots)),
            FormatOutput::Table => write_table(ctx, &app, &snapshots),
        }
    }
}

fn write_table(ctx: &mut crate::context::Context<'_>, app: &AppIdentity, snapshots: &[Snapshot]) -> Result<()> {
    if snapshots.is_empty() {
        writeln!(ctx.io.err_out, "no snapshots found for {}", app)?;
        return Ok(());
    }

    let cs = ctx.io.color_scheme();
    let now = chrono::Utc::now();

    let mut tw = tabwriter::TabWriter::new(vec![]);
    writeln!(tw, "TIME\tAGE")?;
    for snapshot in snapshots {
        let age = match parse_snapshot_time(&snapshot.time) {
            Some(time) => chrono_humanize::HumanTime::from(time - now).to_string(),
            None => "".to_string(),
        };
        writeln!(tw, "{}\t{}", cs.bold(&snapshot.time), cs.gray(&age))?;
    }
    tw.flush()?;

    let table = String::from_utf8(tw.into_inner()?)?;
    write!(ctx.io.out, "{}", table)?;

    Ok(())
}

/// Parse a snapshot timestamp. The service reports them either as RFC 3339 or
/// without an offset, in which case they are UTC.
pub fn parse_snapshot_time(time: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    if let Ok(t) = chrono::DateTime::parse_from_rfc3339(time) {
        return Some(t.with_timezone(&chrono::Utc));
    }

    chrono::NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|t| chrono::TimeZone::from_utc_datetime(&chrono::Utc, &t))
}

/// Restore a web app snapshot.
///
/// The snapshot's files, and with `--recover-configuration` its configuration,
/// overwrite the web app. With `--target` the contents are written to another
/// slot of the same web app instead; a snapshot can never be restored onto a
/// different web app.
///
/// Use `webapps snapshot list` to find the snapshot times.
///
/// Restoring asks for confirmation first, pass `--force` to skip it.
#[derive(Parser, Debug, Clone)]
#[clap(verbatim_doc_comment)]
pub struct CmdSnapshotRestore {
    /// The web app the snapshot was taken of. Use `app/slot` to select a deployment slot.
    #[clap(name = "app", required = true)]
    pub app: String,

    /// The resource group that contains the web app.
    #[clap(long, short = 'g', env = "WEBAPPS_RESOURCE_GROUP")]
    pub resource_group: String,

    /// The deployment slot.
    #[clap(long, short)]
    pub slot: Option<String>,

    /// The timestamp of the snapshot.
    #[clap(long = "time", short = 't', required = true)]
    pub snapshot_time: String,

    /// Recover the web app's configuration in addition to files.
    #[clap(long)]
    pub recover_configuration: bool,

    /// The slot (`app/slot`) the snapshot contents will be restored to. Must be a slot
    /// of the source web app. If unspecified, the source web app is overwritten.
    #[clap(long)]
    pub target: Option<String>,

    /// The resource group of the target. Defaults to the source's resource group.
    #[clap(long, requires = "target")]
    pub target_resource_group: Option<String>,

    /// Restore the snapshot without displaying a warning about possible data loss.
    #[clap(long, short)]
    pub force: bool,
}

#[async_trait::async_trait]
impl crate::cmd::Command for CmdSnapshotRestore {
    async fn run(&self, ctx: &mut crate::context::Context<'_>) -> Result<()> {
        let client = ctx.api_client()?;
        self.restore(ctx, &client, &crate::confirm::TerminalConfirm).await?;

        Ok(())
    }
}

impl CmdSnapshotRestore {
    /// Validate the request, then ask `client` to restore once `confirm` agrees.
    pub async fn restore(
        &self,
        ctx: &mut crate::context::Context<'_>,
        client: &dyn Websites,
        confirm: &dyn Confirm,
    ) -> Result<Confirmation> {
        if self.snapshot_time.trim().is_empty() {
            return Err(anyhow!("--time must not be empty"));
        }

        let source = AppIdentity::parse(&self.resource_group, &self.app, self.slot.as_deref())?;

        let target = match &self.target {
            Some(name) => {
                let resource_group = self.target_resource_group.as_deref().unwrap_or(&self.resource_group);
                let identity = AppIdentity::parse(resource_group, name, None)?;

                // Reject restores onto other apps before talking to the service.
                crate::snapshot::validate_target(&source, &identity.resource_group, &identity.to_string())?;

                let site = client.get_site(&identity).await?;
                Some(TargetApp::try_from(site)?)
            }
            None => None,
        };

        let request = crate::snapshot::build(&source, &self.snapshot_time, self.recover_configuration, target.as_ref())?;

        let subject = match &target {
            Some(t) => t.to_string(),
            None => source.to_string(),
        };
        slog::debug!(ctx.log, "restoring snapshot";
            "app" => %source,
            "onto" => &subject,
            "snapshot_time" => request.snapshot_time(),
            "recover_configuration" => request.recover_configuration());

        let gate = Gate {
            skip_confirmation: self.force,
            warning: "Web app contents will be overwritten with the contents of the snapshot.",
            success: "The snapshot has been restored.",
            subject: &subject,
        };

        crate::confirm::confirm_then_run(&mut ctx.io, confirm, &gate, || client.recover_site(&source, &request)).await
    }
}
