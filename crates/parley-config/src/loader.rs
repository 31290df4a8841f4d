use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a placeholder cannot be
    /// resolved, the TOML is malformed, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending key
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_chat_config()?;
        self.validate_mcp_config()?;
        Ok(())
    }

    fn validate_chat_config(&self) -> anyhow::Result<()> {
        let chat = &self.chat;

        if chat.max_tool_loops == 0 {
            anyhow::bail!("chat.max_tool_loops must be at least 1");
        }

        if !(0.0..=2.0).contains(&chat.temperature) {
            anyhow::bail!("chat.temperature must be between 0.0 and 2.0, got {}", chat.temperature);
        }

        if chat.max_messages == 0 {
            anyhow::bail!("chat.max_messages must be at least 1");
        }

        if chat.model.trim().is_empty() {
            anyhow::bail!("chat.model must not be empty");
        }

        Ok(())
    }

    fn validate_mcp_config(&self) -> anyhow::Result<()> {
        match self.mcp.url.scheme() {
            "http" | "https" => {}
            other => anyhow::bail!("mcp.url must use http or https, got '{other}'"),
        }

        if self.mcp.server_label.trim().is_empty() {
            anyhow::bail!("mcp.server_label must not be empty");
        }

        Ok(())
    }
}
