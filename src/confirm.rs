use std::{future::Future, io::Write};

use anyhow::{anyhow, Result};

/// Asks the user a yes/no question.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Prompts on the terminal with dialoguer.
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        match dialoguer::Confirm::new().with_prompt(prompt).default(false).interact() {
            Ok(answer) => Ok(answer),
            Err(err) => Err(anyhow!("prompt failed: {}", err)),
        }
    }
}

/// What to tell the user around a destructive action.
pub struct Gate<'a> {
    /// Run the action without asking, e.g. `--force`.
    pub skip_confirmation: bool,
    pub warning: &'a str,
    pub success: &'a str,
    /// What the action changes, shown in the question.
    pub subject: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Ran,
    Declined,
}

/// Run `action` once the user agreed to `gate.warning`, or straight away when
/// the confirmation is skipped.
pub async fn confirm_then_run<F, Fut>(
    io: &mut crate::iostreams::IoStreams,
    confirm: &dyn Confirm,
    gate: &Gate<'_>,
    action: F,
) -> Result<Confirmation>
where
    F: FnOnce() -> Fut + Send,
    Fut: Future<Output = Result<()>> + Send,
{
    let cs = io.color_scheme();

    if !gate.skip_confirmation {
        if !io.can_prompt() {
            return Err(anyhow!("--force required when not running interactively"));
        }

        writeln!(io.err_out, "{} {}", cs.warning_icon(), gate.warning)?;

        if !confirm.confirm(&format!("Restore onto {}?", gate.subject))? {
            writeln!(io.err_out, "{} Cancelled, {} was not changed", cs.failure_icon(), gate.subject)?;
            return Ok(Confirmation::Declined);
        }
    }

    action().await?;

    writeln!(io.out, "{} {}", cs.success_icon(), gate.success)?;

    Ok(Confirmation::Ran)
}
