use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use dotenvy::dotenv;
use serde::Deserialize;

#[derive(Clone, Copy, Default, Deserialize, Debug)]
#[serde(from = "String")]
pub enum ConfigServerKind {
    #[default]
    Memory,
    Gcs,
}

// Anything other than "gcs" falls back to the in-memory store.
impl From<String> for ConfigServerKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "gcs" => Self::Gcs,
            _ => Self::Memory,
        }
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_server_port")]
    pub server_port: u16,

    #[serde(default)]
    pub config_server_type: ConfigServerKind,

    pub project_id: Option<String>,

    #[serde(default = "default_gcs_config_object")]
    pub gcs_config_object: String,

    pub storage_emulator_host: Option<String>,

    #[serde(default = "default_outbound_timeout_seconds")]
    pub outbound_timeout_seconds: u64,
}

fn default_server_port() -> u16 {
    8080
}

fn default_gcs_config_object() -> String {
    "config_params.json".to_string()
}

fn default_outbound_timeout_seconds() -> u64 {
    10
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        let config = envy::from_env::<Self>()
            .map_err(|_| anyhow!("Invalid or missing environmental variable"))?;
        Ok(config)
    }

    pub fn gcs_config_bucket(&self) -> Result<String, Error> {
        let project_id = self
            .project_id
            .as_deref()
            .ok_or_else(|| anyhow!("PROJECT_ID is required when CONFIG_SERVER_TYPE is gcs"))?;

        Ok(format!("gcs_config_bucket_{project_id}"))
    }

    pub fn outbound_timeout(&self) -> Duration {
        Duration::from_secs(self.outbound_timeout_seconds)
    }
}
