use std::collections::HashMap;

use serde_json::Value;

use super::{ConfigParams, ConfigServer, validate_store};
use crate::error::ConfigError;

#[derive(Debug)]
pub struct InMemoryConfigServer {
    store: HashMap<String, ConfigParams>,
}

impl InMemoryConfigServer {
    pub fn new(document: Value) -> Result<Self, ConfigError> {
        let store = validate_store(&document)?;
        Ok(Self { store })
    }
}

impl ConfigServer for InMemoryConfigServer {
    fn get_config(&self, config_id: &str) -> Result<ConfigParams, ConfigError> {
        self.store
            .get(config_id)
            .cloned()
            .ok_or_else(|| ConfigError::NotFound(config_id.to_string()))
    }
}
