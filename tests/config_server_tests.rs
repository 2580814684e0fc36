use alert_relay::config_server::{ConfigServer, GcsConfigServer, InMemoryConfigServer};
use alert_relay::error::ConfigError;
use anyhow::Result;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test: Lookups return exactly the stored configuration mapping
#[test]
fn test_get_config_returns_stored_mapping() -> Result<()> {
    let server = InMemoryConfigServer::new(sample_store())?;

    let config = server.get_config("tf-topic-cpu")?;

    let expected = json!({
        "service_name": "google_chat",
        "msg_format": "card",
        "webhook_url": "https://chat.example/room-a"
    });
    assert_eq!(Value::Object(config), expected);

    Ok(())
}

/// Test: Unknown routing keys fail with a not-found error
#[test]
fn test_unknown_config_id_is_not_found() -> Result<()> {
    let server = InMemoryConfigServer::new(sample_store())?;

    let err = server.get_config("tf-topic-memory").unwrap_err();

    assert!(matches!(err, ConfigError::NotFound(_)), "got: {err}");
    assert_eq!(err.to_string(), "no configuration found for tf-topic-memory");

    Ok(())
}

/// Test: Single-parameter lookups resolve through the stored config
#[test]
fn test_get_config_param() -> Result<()> {
    let server = InMemoryConfigServer::new(sample_store())?;

    let value = server.get_config_param("tf-topic-cpu", "msg_format")?;
    assert_eq!(value, json!("card"));

    let err = server
        .get_config_param("tf-topic-cpu", "routing_priority")
        .unwrap_err();
    assert!(matches!(err, ConfigError::ParamNotFound { .. }), "got: {err}");

    // A missing config propagates unchanged instead of becoming a param error.
    let err = server
        .get_config_param("tf-topic-memory", "msg_format")
        .unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)), "got: {err}");

    Ok(())
}

/// Test: A store that is not an object is rejected at construction
#[test]
fn test_non_object_store_is_rejected() {
    let err = InMemoryConfigServer::new(json!(["tf-topic-cpu"])).unwrap_err();

    assert!(matches!(err, ConfigError::InvalidData(_)), "got: {err}");
}

/// Test: One bad entry rejects the whole store before any lookup happens
#[test]
fn test_non_object_entry_is_rejected() {
    let store = json!({
        "tf-topic-cpu": {
            "service_name": "google_chat",
            "msg_format": "text",
            "webhook_url": "https://chat.example/room-a"
        },
        "tf-topic-disk": "not a parameter mapping"
    });

    let err = InMemoryConfigServer::new(store).unwrap_err();

    assert!(matches!(err, ConfigError::InvalidData(_)), "got: {err}");
}

/// Test: The GCS-backed resolver downloads the store once and serves lookups
#[tokio::test]
async fn test_gcs_config_server_loads_store_from_bucket() -> Result<()> {
    let storage = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/storage/v1/b/gcs_config_bucket_demo/o/config_params.json"))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_store().to_string()))
        .expect(1)
        .mount(&storage)
        .await;

    let server = GcsConfigServer::connect(
        "gcs_config_bucket_demo",
        "config_params.json",
        Some(&storage.uri()),
    )
    .await?;

    let config = server.get_config("tf-topic-disk")?;
    assert_eq!(
        config.get("service_name").and_then(Value::as_str),
        Some("slack")
    );

    // Lookups after construction never hit the bucket again.
    let _ = server.get_config("tf-topic-cpu")?;

    // The emulator fetch carries no credentials.
    let requests = storage.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));

    Ok(())
}

/// Test: A failed download aborts resolver construction
#[tokio::test]
async fn test_gcs_download_failure_is_init_error() -> Result<()> {
    let storage = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("No such object"))
        .mount(&storage)
        .await;

    let err = GcsConfigServer::connect("missing-bucket", "config_params.json", Some(&storage.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, ConfigError::Init(_)), "got: {err}");

    Ok(())
}

/// Test: A store object that is not JSON aborts resolver construction
#[tokio::test]
async fn test_gcs_invalid_json_is_init_error() -> Result<()> {
    let storage = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("service_name = gchat"))
        .mount(&storage)
        .await;

    let err = GcsConfigServer::connect("bucket", "config_params.json", Some(&storage.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, ConfigError::Init(_)), "got: {err}");

    Ok(())
}

/// Test: A downloaded store with a bad shape fails shape validation
#[tokio::test]
async fn test_gcs_bad_store_shape_is_invalid_data() -> Result<()> {
    let storage = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"tf-topic-cpu": 42}"#))
        .mount(&storage)
        .await;

    let err = GcsConfigServer::connect("bucket", "config_params.json", Some(&storage.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, ConfigError::InvalidData(_)), "got: {err}");

    Ok(())
}

fn sample_store() -> Value {
    json!({
        "tf-topic-cpu": {
            "service_name": "google_chat",
            "msg_format": "card",
            "webhook_url": "https://chat.example/room-a"
        },
        "tf-topic-disk": {
            "service_name": "slack",
            "webhook_url": "https://hooks.example/services/T000/B000/XXX"
        }
    })
}
