use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::ServiceHandler;
use crate::config_server::ConfigParams;
use crate::error::HandlerError;
use crate::models::incident::{format_timestamp, OptionalIncidentFields, RequiredIncidentFields};

pub const SERVICE_NAME: &str = "google_chat";

const SUPPORTED_FORMATS: [&str; 2] = ["text", "card"];

const OPEN_STATE_COLOR: &str = "#FF0000";
const CLOSED_STATE_COLOR: &str = "#0000FF";

pub struct GoogleChatHandler {
    http_client: Client,
}

impl GoogleChatHandler {
    pub fn new(timeout: Duration) -> Result<Self, HandlerError> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self { http_client })
    }

    fn text_body(&self, notification: &Value) -> Result<String, HandlerError> {
        let message = json!({ "text": serde_json::to_string(notification)? });

        Ok(message.to_string())
    }

    fn card_body(&self, notification: &Value) -> Result<String, HandlerError> {
        let required = RequiredIncidentFields::from_notification(notification)?;
        let optional = OptionalIncidentFields::from_notification(notification);

        let color = if required.state == "open" {
            OPEN_STATE_COLOR
        } else {
            CLOSED_STATE_COLOR
        };

        let mut status_text = format!(
            "<b><font color=\"{color}\">Summary:</font></b> {}, \
             <br><b><font color=\"{color}\">State:</font></b> {}",
            required.summary, required.state
        );
        if let Some(severity) = &optional.severity {
            status_text.push_str(&format!(
                ", <br><b><font color=\"{color}\">Severity:</font></b> {severity}"
            ));
        }

        let started_at = optional.started_at.map(format_timestamp).unwrap_or_default();
        let ended_at = optional.ended_at.map(format_timestamp).unwrap_or_default();

        let detail_text = format!(
            "<b>Condition Display Name:</b> {} <br><b>Start at:</b> {started_at}\
             <br><b>End at:</b> {ended_at}<br><b>Incident Labels:</b> {}",
            required.condition_display_name,
            Value::Object(required.resource_labels)
        );

        let message = json!({
            "cards": [
                {
                    "sections": [
                        {
                            "widgets": [
                                { "textParagraph": { "text": status_text } },
                                { "textParagraph": { "text": detail_text } },
                                {
                                    "buttons": [
                                        {
                                            "textButton": {
                                                "text": "View Incident Details",
                                                "onClick": { "openLink": { "url": required.url } }
                                            }
                                        }
                                    ]
                                }
                            ]
                        }
                    ]
                }
            ]
        });

        Ok(message.to_string())
    }
}

#[async_trait]
impl ServiceHandler for GoogleChatHandler {
    fn service_name(&self) -> &'static str {
        SERVICE_NAME
    }

    fn http_client(&self) -> &Client {
        &self.http_client
    }

    fn request_url(&self, config: &ConfigParams) -> Result<String, HandlerError> {
        config
            .get("webhook_url")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| {
                HandlerError::ConfigParams(format!(
                    "webhook_url is not set or not a string: {}",
                    Value::Object(config.clone())
                ))
            })
    }

    fn request_body(
        &self,
        config: &ConfigParams,
        notification: &Value,
    ) -> Result<String, HandlerError> {
        match config.get("msg_format").and_then(Value::as_str) {
            Some("card") => self.card_body(notification),
            _ => self.text_body(notification),
        }
    }

    fn check_config_params(&self, config: &ConfigParams) -> Result<(), HandlerError> {
        self.check_service_name(config)?;

        if !config.get("webhook_url").is_some_and(Value::is_string) {
            return Err(HandlerError::ConfigParams(format!(
                "webhook_url is not set or not a string: {}",
                Value::Object(config.clone())
            )));
        }

        let msg_format = config.get("msg_format").and_then(Value::as_str);
        if !msg_format.is_some_and(|format| SUPPORTED_FORMATS.contains(&format)) {
            return Err(HandlerError::ConfigParams(format!(
                "msg_format is not set or not a valid option: {}",
                Value::Object(config.clone())
            )));
        }

        Ok(())
    }
}
