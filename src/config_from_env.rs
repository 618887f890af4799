use anyhow::Result;

use crate::config_file::get_env_var;

const WEBAPPS_TOKEN: &str = "WEBAPPS_TOKEN";
const WEBAPPS_SUBSCRIPTION: &str = "WEBAPPS_SUBSCRIPTION";
const WEBAPPS_ENDPOINT: &str = "WEBAPPS_ENDPOINT";

/// Layers environment variables over another config.
pub struct EnvConfig<'a> {
    pub config: &'a mut (dyn crate::config::Config + 'a),
}

impl EnvConfig<'_> {
    pub fn inherit_env(config: &mut dyn crate::config::Config) -> EnvConfig {
        EnvConfig { config }
    }
}

fn env_var_for_key(key: &str) -> Option<&'static str> {
    match key {
        "token" => Some(WEBAPPS_TOKEN),
        "subscription" => Some(WEBAPPS_SUBSCRIPTION),
        "endpoint" => Some(WEBAPPS_ENDPOINT),
        _ => None,
    }
}

impl crate::config::Config for EnvConfig<'_> {
    fn get(&self, key: &str) -> Result<String> {
        let (val, _) = self.get_with_source(key)?;
        Ok(val)
    }

    fn get_with_source(&self, key: &str) -> Result<(String, String)> {
        if let Some(env_var) = env_var_for_key(key) {
            let value = get_env_var(env_var);
            if !value.is_empty() {
                return Ok((value, env_var.to_string()));
            }
        }

        self.config.get_with_source(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.config.set(key, value)
    }

    fn check_writable(&self, key: &str) -> Result<()> {
        if let Some(env_var) = env_var_for_key(key) {
            if !get_env_var(env_var).is_empty() {
                anyhow::bail!("read-only value in: {}", env_var);
            }
        }

        self.config.check_writable(key)
    }

    fn write(&self) -> Result<()> {
        self.config.write()
    }

    fn config_to_string(&self) -> Result<String> {
        self.config.config_to_string()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use test_context::{test_context, TestContext};

    use super::*;
    use crate::config::Config;

    struct TokenEnv {
        orig: Option<String>,
    }

    impl TestContext for TokenEnv {
        fn setup() -> TokenEnv {
            TokenEnv {
                orig: std::env::var(WEBAPPS_TOKEN).ok(),
            }
        }

        fn teardown(self) {
            match self.orig {
                Some(v) => std::env::set_var(WEBAPPS_TOKEN, v),
                None => std::env::remove_var(WEBAPPS_TOKEN),
            }
        }
    }

    #[test_context(TokenEnv)]
    #[test]
    #[serial_test::serial]
    fn test_env_overrides_file(_ctx: &mut TokenEnv) {
        let mut file = crate::config::new_blank_config().unwrap();
        file.set("token", "from-file").unwrap();
        let mut config = EnvConfig::inherit_env(&mut file);

        std::env::remove_var(WEBAPPS_TOKEN);
        assert_eq!(config.get("token").unwrap(), "from-file");
        assert!(config.check_writable("token").is_ok());

        std::env::set_var(WEBAPPS_TOKEN, "from-env");
        assert_eq!(
            config.get_with_source("token").unwrap(),
            ("from-env".to_string(), WEBAPPS_TOKEN.to_string())
        );
        assert_eq!(
            config.check_writable("token").unwrap_err().to_string(),
            "read-only value in: WEBAPPS_TOKEN"
        );

        // Keys without an env var always come from the wrapped config.
        config.set("prompt", "disabled").unwrap();
        assert_eq!(config.get("prompt").unwrap(), "disabled");
    }
}
