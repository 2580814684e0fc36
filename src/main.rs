use std::sync::Arc;

use anyhow::{Error, Result, anyhow};
use serde_json::{Value, json};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use alert_relay::api::{AppState, run_api_server};
use alert_relay::config::{Config, ConfigServerKind};
use alert_relay::config_server::{ConfigServer, GcsConfigServer, InMemoryConfigServer};
use alert_relay::handlers::HandlerRegistry;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = Config::load()?;

    let config_server = build_config_server(&config).await?;
    let registry = HandlerRegistry::new(config.outbound_timeout())
        .map_err(|e| anyhow!("Failed to build the handler registry: {e}"))?;

    let state = Arc::new(AppState {
        config_server,
        registry,
    });

    run_api_server(&config, state).await
}

async fn build_config_server(config: &Config) -> Result<Arc<dyn ConfigServer>, Error> {
    match config.config_server_type {
        ConfigServerKind::Gcs => {
            let bucket = config.gcs_config_bucket()?;
            let server = GcsConfigServer::connect(
                &bucket,
                &config.gcs_config_object,
                config.storage_emulator_host.as_deref(),
            )
            .await
            .map_err(|e| anyhow!("Config server initialization failed: {e}"))?;

            info!(
                bucket = %bucket,
                object = %config.gcs_config_object,
                "Using the Cloud Storage config server"
            );

            Ok(Arc::new(server))
        }
        ConfigServerKind::Memory => {
            let server = InMemoryConfigServer::new(default_config_store())
                .map_err(|e| anyhow!("Config server initialization failed: {e}"))?;

            info!("Using the built-in in-memory config store");

            Ok(Arc::new(server))
        }
    }
}

// Placeholder webhook urls; swap in real room/channel webhooks.
fn default_config_store() -> Value {
    json!({
        "tf-topic-cpu": {
            "service_name": "google_chat",
            "msg_format": "card",
            "webhook_url": "https://chat.googleapis.com/v1/spaces/SPACE_ID/messages?key=KEY&token=TOKEN"
        },
        "tf-topic-disk": {
            "service_name": "google_chat",
            "msg_format": "text",
            "webhook_url": "https://chat.googleapis.com/v1/spaces/SPACE_ID/messages?key=KEY&token=TOKEN"
        },
        "tf-topic-oncall": {
            "service_name": "slack",
            "webhook_url": "https://hooks.slack.com/services/T00000000/B00000000/XXXXXXXX"
        }
    })
}
