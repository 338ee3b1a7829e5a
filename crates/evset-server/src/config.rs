use evset_common::profile::FieldProfile;
use evset_common::types::EventSettingGroup;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// CORS allowed origins; empty allows any origin (development mode).
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,

    /// JSON file with `EventSettingGroup`s loaded at start-up.
    #[serde(default)]
    pub seed_file: Option<String>,

    /// Field profile catalog; the built-in catalog is used when empty.
    #[serde(default)]
    pub fields: Vec<FieldProfile>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            cors_allowed_origins: Vec::new(),
            seed_file: None,
            fields: Vec::new(),
        }
    }
}

fn default_http_port() -> u16 {
    8080
}

impl ServerConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config '{path}': {e}"))?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Reads the seed groups referenced by `seed_file`.
pub fn load_seed(path: &str) -> anyhow::Result<Vec<EventSettingGroup>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read seed file '{path}': {e}"))?;
    let groups: Vec<EventSettingGroup> = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse seed file '{path}': {e}"))?;
    Ok(groups)
}
