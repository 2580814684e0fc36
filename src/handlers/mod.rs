pub mod google_chat;
pub mod slack;

pub use google_chat::GoogleChatHandler;
pub use slack::SlackHandler;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use tracing::{error, info};

use crate::config_server::ConfigParams;
use crate::error::HandlerError;
use crate::models::response::DispatchResult;

#[async_trait]
pub trait ServiceHandler: Send + Sync {
    fn service_name(&self) -> &'static str;

    fn http_client(&self) -> &Client;

    fn request_url(&self, config: &ConfigParams) -> Result<String, HandlerError>;

    fn request_body(&self, config: &ConfigParams, notification: &Value)
        -> Result<String, HandlerError>;

    fn request_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=UTF-8"),
        );
        headers
    }

    // Implementations check service_name first so a misrouted config is
    // reported as such rather than as a missing param.
    fn check_config_params(&self, config: &ConfigParams) -> Result<(), HandlerError>;

    fn check_service_name(&self, config: &ConfigParams) -> Result<(), HandlerError> {
        let declared = config.get("service_name").and_then(Value::as_str);

        if declared != Some(self.service_name()) {
            return Err(HandlerError::ConfigParams(format!(
                "service_name is not set or different from {}: {}",
                self.service_name(),
                Value::Object(config.clone())
            )));
        }

        Ok(())
    }

    async fn send_notification(
        &self,
        config: &ConfigParams,
        notification: &Value,
    ) -> DispatchResult {
        if let Err(e) = self.check_config_params(config) {
            error!(service = self.service_name(), error = %e, "Config params check failed");
            return DispatchResult::new(e.to_string(), e.status_code());
        }

        match self.send_http_request(config, notification).await {
            Ok(result) => {
                info!(
                    service = self.service_name(),
                    status = result.status,
                    "Notification delivered"
                );
                result
            }
            Err(e) => {
                error!(service = self.service_name(), error = %e, "Notification delivery failed");
                DispatchResult::new(describe(&e), e.status_code())
            }
        }
    }

    async fn send_http_request(
        &self,
        config: &ConfigParams,
        notification: &Value,
    ) -> Result<DispatchResult, HandlerError> {
        let url = self.request_url(config)?;
        let headers = self.request_headers();
        let body = self.request_body(config, notification)?;

        let response = self
            .http_client()
            .post(&url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let message = response.text().await?;

        Ok(DispatchResult::new(message, status))
    }
}

fn describe(error: &HandlerError) -> String {
    match error {
        HandlerError::Request(e) if e.is_timeout() => {
            "request to destination timed out".to_string()
        }
        HandlerError::Request(e) if e.is_connect() => {
            format!("connection to destination failed: {e}")
        }
        other => other.to_string(),
    }
}

pub struct HandlerRegistry {
    handlers: HashMap<&'static str, Arc<dyn ServiceHandler>>,
}

impl HandlerRegistry {
    pub fn new(timeout: Duration) -> Result<Self, HandlerError> {
        let mut handlers: HashMap<&'static str, Arc<dyn ServiceHandler>> = HashMap::new();

        handlers.insert(
            google_chat::SERVICE_NAME,
            Arc::new(GoogleChatHandler::new(timeout)?),
        );
        handlers.insert(slack::SERVICE_NAME, Arc::new(SlackHandler::new(timeout)?));

        Ok(Self { handlers })
    }

    pub fn get(&self, service_name: &str) -> Option<Arc<dyn ServiceHandler>> {
        self.handlers.get(service_name).cloned()
    }

    pub fn service_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
