use anyhow::Result;

// This type implements a Config interface and represents a config file on disk.
#[derive(Debug, Clone)]
pub struct FileConfig {
    pub map: crate::config_map::ConfigMap,
}

impl crate::config::Config for FileConfig {
    fn get(&self, key: &str) -> Result<String> {
        let (val, _) = self.get_with_source(key)?;
        Ok(val)
    }

    fn get_with_source(&self, key: &str) -> Result<(String, String)> {
        if self.map.contains_key(key) {
            let value = self.map.get_string_value(key)?;
            return Ok((value, crate::config_file::config_file()?));
        }

        // Fall back to the built-in default for known keys.
        crate::config::validate_key(key)?;
        let value = crate::config::default_value(key).unwrap_or_default();

        Ok((value, "default".to_string()))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.map.set_string_value(key, value)
    }

    fn check_writable(&self, _key: &str) -> Result<()> {
        // TODO: check if the config file is writable from the filesystem permissions
        Ok(())
    }

    fn write(&self) -> Result<()> {
        let config_filename = crate::config_file::config_file()?;

        let content = self.config_to_string()?;

        crate::config_file::write_config_file(&config_filename, &content)
    }

    fn config_to_string(&self) -> Result<String> {
        let doc: toml_edit::Document = self.map.root.clone().into();

        Ok(doc.to_string().trim().to_string())
    }
}
