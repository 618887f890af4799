use std::str::FromStr;

use anyhow::{anyhow, Result};

use crate::{config::Config, types::FormatOutput};

pub struct Context<'a> {
    pub config: &'a mut (dyn Config + 'a),
    pub io: crate::iostreams::IoStreams,
    pub debug: bool,
    pub log: slog::Logger,
}

impl Context<'_> {
    pub fn new<'a>(config: &'a mut (dyn Config + 'a), log: slog::Logger) -> Result<Context<'a>> {
        let mut io = crate::iostreams::IoStreams::system();

        // Set the prompt.
        let prompt = config.get("prompt")?;
        if prompt == "disabled" {
            io.set_never_prompt(true)
        }

        Ok(Context {
            config,
            io,
            debug: false,
            log,
        })
    }

    /// Returns a client for the management service, based on the configured
    /// endpoint, subscription and token.
    pub fn api_client(&self) -> Result<crate::websites::WebsitesClient> {
        let token = self.config.get("token")?;
        if token.is_empty() {
            return Err(anyhow!(
                "no token configured: set WEBAPPS_TOKEN or run `webapps config set token <token>`"
            ));
        }

        let subscription = self.config.get("subscription")?;
        if subscription.is_empty() {
            return Err(anyhow!(
                "no subscription configured: set WEBAPPS_SUBSCRIPTION or run `webapps config set subscription <id>`"
            ));
        }

        let endpoint = self.config.get("endpoint")?;

        crate::websites::WebsitesClient::new(&endpoint, &subscription, &token, self.log.clone())
    }

    /// This function returns the output format to use, preferring the flag, then the
    /// configured default.
    pub fn format(&self, format: &Option<FormatOutput>) -> Result<FormatOutput> {
        if let Some(format) = format {
            return Ok(format.clone());
        }

        let value = self.config.get("format")?;
        if value.is_empty() {
            return Ok(FormatOutput::default());
        }

        FormatOutput::from_str(&value).map_err(|_| anyhow!("invalid format `{}` in config", value))
    }
}
