use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid push message format: {0}")]
    MalformedEnvelope(String),

    #[error("message data should be base64-encoded: {0}")]
    InvalidEncoding(String),

    #[error("message data can not be parsed as a json document: {0}")]
    InvalidPayload(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration found for {0}")]
    NotFound(String),

    #[error("no parameter {param} found in the configuration for {config_id}")]
    ParamNotFound { config_id: String, param: String },

    #[error("invalid config data: {0}")]
    InvalidData(String),

    #[error("failed to initialize config server: {0}")]
    Init(String),
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("invalid config params: {0}")]
    ConfigParams(String),

    #[error("notification is missing required field {0}")]
    MissingField(String),

    #[error("failed to encode message body: {0}")]
    Body(#[from] serde_json::Error),

    #[error("request to destination failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl HandlerError {
    // Config and payload problems are the caller's; transport failures are ours.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ConfigParams(_) | Self::MissingField(_) => 400,
            Self::Body(_) | Self::Request(_) => 500,
        }
    }
}
