use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub message: String,
    pub status: u16,
}

impl DispatchResult {
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    pub fn ack_body(&self) -> String {
        format!("{}: {}", self.status, self.message)
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub services: Vec<&'static str>,
}
