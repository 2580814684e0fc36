use std::collections::BTreeMap;

use chrono::DateTime;
use serde_json::{Map, Value};

use crate::error::HandlerError;

#[derive(Debug, Clone)]
pub struct RequiredIncidentFields {
    pub condition_display_name: String,
    pub resource_labels: Map<String, Value>,
    pub url: String,
    pub state: String,
    pub summary: String,
}

impl RequiredIncidentFields {
    pub fn from_notification(notification: &Value) -> Result<Self, HandlerError> {
        Ok(Self {
            condition_display_name: required_str(notification, "/incident/condition/displayName")?,
            resource_labels: required_object(notification, "/incident/resource/labels")?,
            url: required_str(notification, "/incident/url")?,
            state: required_str(notification, "/incident/state")?,
            summary: required_str(notification, "/incident/summary")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct OptionalIncidentFields {
    pub started_at: Option<i64>,
    pub ended_at: Option<i64>,
    pub severity: Option<String>,
}

impl OptionalIncidentFields {
    pub fn from_notification(notification: &Value) -> Self {
        Self {
            started_at: unix_seconds(notification.pointer("/incident/started_at")),
            ended_at: unix_seconds(notification.pointer("/incident/ended_at")),
            severity: optional_str(notification, "/incident/policy_user_labels/severity"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SlackRequiredFields {
    pub state: String,
    pub summary: String,
    pub url: String,
}

impl SlackRequiredFields {
    pub fn from_notification(notification: &Value) -> Result<Self, HandlerError> {
        Ok(Self {
            state: required_str(notification, "/incident/state")?,
            summary: required_str(notification, "/incident/summary")?,
            url: required_str(notification, "/incident/url")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SlackOptionalFields {
    pub policy_name: Option<String>,
    pub condition_display_name: Option<String>,
    pub severity: Option<String>,
    pub started_at: Option<i64>,
    pub ended_at: Option<i64>,
    pub labels: BTreeMap<String, String>,
    pub documentation: Option<String>,
    pub quick_links: Vec<(String, String)>,
}

impl SlackOptionalFields {
    pub fn from_notification(notification: &Value) -> Self {
        Self {
            policy_name: optional_str(notification, "/incident/policy_name"),
            condition_display_name: optional_str(notification, "/incident/condition/displayName"),
            severity: optional_str(notification, "/incident/policy_user_labels/severity"),
            started_at: unix_seconds(notification.pointer("/incident/started_at")),
            ended_at: unix_seconds(notification.pointer("/incident/ended_at")),
            labels: aggregate_labels(notification),
            documentation: optional_str(notification, "/incident/documentation/content")
                .filter(|content| !content.trim().is_empty()),
            quick_links: quick_links(notification),
        }
    }
}

pub fn format_timestamp(seconds: i64) -> String {
    match DateTime::from_timestamp(seconds, 0) {
        Some(timestamp) => timestamp.format("%Y-%m-%d %H:%M:%S (UTC)").to_string(),
        None => String::new(),
    }
}

fn required_str(notification: &Value, pointer: &str) -> Result<String, HandlerError> {
    notification
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| missing(pointer))
}

fn required_object(notification: &Value, pointer: &str) -> Result<Map<String, Value>, HandlerError> {
    notification
        .pointer(pointer)
        .and_then(Value::as_object)
        .cloned()
        .ok_or_else(|| missing(pointer))
}

fn optional_str(notification: &Value, pointer: &str) -> Option<String> {
    notification
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_owned)
}

fn missing(pointer: &str) -> HandlerError {
    HandlerError::MissingField(pointer.trim_start_matches('/').replace('/', "."))
}

// Timestamps may arrive as numbers or numeric strings; anything else
// counts as absent.
fn unix_seconds(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

// Earlier sources win on key collisions; non-text values are skipped.
fn aggregate_labels(notification: &Value) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();

    for pointer in [
        "/incident/resource/labels",
        "/incident/metric/labels",
        "/incident/policy_user_labels",
    ] {
        let Some(map) = notification.pointer(pointer).and_then(Value::as_object) else {
            continue;
        };

        for (key, value) in map {
            if let Some(value) = value.as_str() {
                labels
                    .entry(key.clone())
                    .or_insert_with(|| value.to_string());
            }
        }
    }

    labels
}

fn quick_links(notification: &Value) -> Vec<(String, String)> {
    let Some(user_labels) = notification
        .pointer("/incident/policy_user_labels")
        .and_then(Value::as_object)
    else {
        return Vec::new();
    };

    let mut links = Vec::new();
    for (key, value) in user_labels {
        let Some(stem) = key.strip_suffix("_url") else {
            continue;
        };
        if stem.is_empty() {
            continue;
        }
        if let Some(url) = value.as_str() {
            links.push((link_title(stem), url.to_string()));
        }
    }

    links
}

// "runbook_url" gets the link title "Runbook".
fn link_title(stem: &str) -> String {
    let text = stem.replace('_', " ");
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
