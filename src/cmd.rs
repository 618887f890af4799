use anyhow::Result;

/// A `webapps` subcommand, run against the shared context.
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    async fn run(&self, ctx: &mut crate::context::Context<'_>) -> Result<()>;
}
