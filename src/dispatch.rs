use serde_json::Value;
use tracing::{error, info};

use crate::config_server::ConfigServer;
use crate::handlers::HandlerRegistry;
use crate::models::response::DispatchResult;
use crate::pubsub;

// Every step folds its failure into the result; the caller can always ack.
pub async fn dispatch_notification(
    config_server: &dyn ConfigServer,
    registry: &HandlerRegistry,
    config_id: &str,
    body: &[u8],
) -> DispatchResult {
    let config = match config_server.get_config(config_id) {
        Ok(config) => config,
        Err(e) => {
            error!(config_id = %config_id, error = %e, "Failed to get config parameters");
            return DispatchResult::new(
                format!("Failed to get config parameters for {config_id}: {e}"),
                500,
            );
        }
    };

    let Some(service_name) = config.get("service_name").and_then(Value::as_str) else {
        error!(config_id = %config_id, "No service_name in the config parameters");
        return DispatchResult::new(
            format!("\"service_name\" not found in the config parameters: {config_id}"),
            500,
        );
    };

    let Some(handler) = registry.get(service_name) else {
        error!(service = %service_name, "No handler found for the service");
        return DispatchResult::new(format!("No handler found for the service {service_name}"), 500);
    };

    let notification = match pubsub::decode_envelope(body) {
        Ok(notification) => notification,
        Err(e) => {
            error!(config_id = %config_id, error = %e, "Failed to decode the push message");
            return DispatchResult::new(e.to_string(), 400);
        }
    };

    let result = handler.send_notification(&config, &notification).await;

    info!(
        config_id = %config_id,
        service = %service_name,
        status = result.status,
        "Notification dispatch completed"
    );

    result
}
