pub mod gcs;
pub mod memory;

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::ConfigError;

pub use gcs::GcsConfigServer;
pub use memory::InMemoryConfigServer;

pub type ConfigParams = Map<String, Value>;

pub trait ConfigServer: Send + Sync {
    fn get_config(&self, config_id: &str) -> Result<ConfigParams, ConfigError>;

    fn get_config_param(&self, config_id: &str, param: &str) -> Result<Value, ConfigError> {
        let config = self.get_config(config_id)?;

        config
            .get(param)
            .cloned()
            .ok_or_else(|| ConfigError::ParamNotFound {
                config_id: config_id.to_string(),
                param: param.to_string(),
            })
    }
}

// Shape violations fail here, at construction, never during a lookup.
pub(crate) fn validate_store(
    document: &Value,
) -> Result<HashMap<String, ConfigParams>, ConfigError> {
    let entries = document.as_object().ok_or_else(|| {
        ConfigError::InvalidData("config data should be a json object keyed by config id".to_string())
    })?;

    let mut store = HashMap::with_capacity(entries.len());
    for (config_id, params) in entries {
        let params = params.as_object().ok_or_else(|| {
            ConfigError::InvalidData(format!(
                "config params for {config_id} should be a json object"
            ))
        })?;
        store.insert(config_id.clone(), params.clone());
    }

    Ok(store)
}
