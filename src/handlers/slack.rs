use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::ServiceHandler;
use crate::config_server::ConfigParams;
use crate::error::HandlerError;
use crate::models::incident::{format_timestamp, SlackOptionalFields, SlackRequiredFields};

pub const SERVICE_NAME: &str = "slack";

pub struct SlackHandler {
    http_client: Client,
}

impl SlackHandler {
    pub fn new(timeout: Duration) -> Result<Self, HandlerError> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self { http_client })
    }

    fn message_body(&self, notification: &Value) -> Result<String, HandlerError> {
        let required = SlackRequiredFields::from_notification(notification)?;
        let optional = SlackOptionalFields::from_notification(notification);

        let icon = severity_icon(optional.severity.as_deref());
        let heading = if required.state == "open" {
            "Incident open"
        } else {
            "Incident closed"
        };

        let overview = format!(
            "*Summary:* {}\n*Policy:* {}\n*Condition:* {}",
            required.summary,
            optional.policy_name.as_deref().unwrap_or("N/A"),
            optional.condition_display_name.as_deref().unwrap_or("N/A")
        );

        let started_at = optional.started_at.map(format_timestamp).unwrap_or_default();
        let ended_at = optional.ended_at.map(format_timestamp).unwrap_or_default();

        let mut blocks = vec![
            json!({
                "type": "header",
                "text": {
                    "type": "plain_text",
                    "text": format!("{icon} {heading}"),
                    "emoji": true
                }
            }),
            json!({
                "type": "section",
                "text": { "type": "mrkdwn", "text": overview }
            }),
            json!({
                "type": "section",
                "fields": [
                    { "type": "mrkdwn", "text": format!("*State:* {}", required.state) },
                    {
                        "type": "mrkdwn",
                        "text": format!(
                            "*Severity:* {}",
                            optional.severity.as_deref().unwrap_or("N/A")
                        )
                    },
                    { "type": "mrkdwn", "text": format!("*Started:* {started_at}") },
                    { "type": "mrkdwn", "text": format!("*Ended:* {ended_at}") }
                ]
            }),
        ];

        if !optional.labels.is_empty() {
            let lines = optional
                .labels
                .iter()
                .map(|(key, value)| format!("`{key}={value}`"))
                .collect::<Vec<String>>()
                .join("\n");

            blocks.push(json!({
                "type": "section",
                "text": { "type": "mrkdwn", "text": format!("*Labels:*\n{lines}") }
            }));
        }

        if let Some(documentation) = &optional.documentation {
            blocks.push(json!({
                "type": "section",
                "text": { "type": "mrkdwn", "text": format!("*Documentation:*\n{documentation}") }
            }));
        }

        if !optional.quick_links.is_empty() {
            let links = optional
                .quick_links
                .iter()
                .map(|(title, url)| format!("<{url}|{title}>"))
                .collect::<Vec<String>>()
                .join(" | ");

            blocks.push(json!({
                "type": "context",
                "elements": [
                    { "type": "mrkdwn", "text": format!("*Quick links:* {links}") }
                ]
            }));
        }

        blocks.push(json!({
            "type": "actions",
            "elements": [
                {
                    "type": "button",
                    "text": { "type": "plain_text", "text": "View incident", "emoji": true },
                    "url": required.url,
                    "action_id": "view_incident"
                }
            ]
        }));

        let message = json!({ "text": required.summary, "blocks": blocks });

        Ok(message.to_string())
    }
}

fn severity_icon(severity: Option<&str>) -> &'static str {
    match severity.map(str::to_ascii_lowercase).as_deref() {
        Some("critical") => ":rotating_light:",
        Some("error") => ":x:",
        Some("warning") => ":warning:",
        Some("info") => ":information_source:",
        _ => ":bell:",
    }
}

#[async_trait]
impl ServiceHandler for SlackHandler {
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
        _config: &ConfigParams,
        notification: &Value,
    ) -> Result<String, HandlerError> {
        self.message_body(notification)
    }

    fn check_config_params(&self, config: &ConfigParams) -> Result<(), HandlerError> {
        self.check_service_name(config)?;

        if !config.get("webhook_url").is_some_and(Value::is_string) {
            return Err(HandlerError::ConfigParams(format!(
                "webhook_url is not set or not a string: {}",
                Value::Object(config.clone())
            )));
        }

        Ok(())
    }
}
