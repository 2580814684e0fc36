use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::info;
use url::Url;

use super::{ConfigParams, ConfigServer, InMemoryConfigServer};
use crate::error::ConfigError;

const STORAGE_BASE_URL: &str = "https://storage.googleapis.com";
const STORAGE_READ_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_only";

#[derive(Debug)]
pub struct GcsConfigServer {
    inner: InMemoryConfigServer,
}

impl GcsConfigServer {
    pub async fn connect(
        bucket: &str,
        object: &str,
        emulator_host: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ConfigError::Init(format!("failed to create http client: {e}")))?;

        let contents = download_object(&http_client, bucket, object, emulator_host).await?;

        let document = serde_json::from_str::<Value>(&contents).map_err(|e| {
            ConfigError::Init(format!(
                "object {object} in bucket {bucket} is not valid json: {e}"
            ))
        })?;

        let inner = InMemoryConfigServer::new(document)?;

        info!(bucket = %bucket, object = %object, "Config store loaded from Cloud Storage");

        Ok(Self { inner })
    }
}

impl ConfigServer for GcsConfigServer {
    fn get_config(&self, config_id: &str) -> Result<ConfigParams, ConfigError> {
        self.inner.get_config(config_id)
    }
}

async fn download_object(
    http_client: &Client,
    bucket: &str,
    object: &str,
    emulator_host: Option<&str>,
) -> Result<String, ConfigError> {
    let url = object_url(bucket, object, emulator_host)?;

    let mut request = http_client.get(url);

    // Emulator fetches carry no credentials.
    if emulator_host.is_none() {
        let provider = gcp_auth::provider()
            .await
            .map_err(|e| ConfigError::Init(format!("failed to resolve storage credentials: {e}")))?;

        let token = provider
            .token(&[STORAGE_READ_SCOPE])
            .await
            .map_err(|e| ConfigError::Init(format!("failed to obtain storage access token: {e}")))?;

        request = request.bearer_auth(token.as_str());
    }

    let response = request.send().await.map_err(|e| {
        ConfigError::Init(format!(
            "failed to fetch object {object} from bucket {bucket}: {e}"
        ))
    })?;

    if !response.status().is_success() {
        return Err(ConfigError::Init(format!(
            "bucket {bucket} returned status {} for object {object}",
            response.status()
        )));
    }

    response.text().await.map_err(|e| {
        ConfigError::Init(format!(
            "failed to read object {object} from bucket {bucket}: {e}"
        ))
    })
}

fn object_url(bucket: &str, object: &str, emulator_host: Option<&str>) -> Result<Url, ConfigError> {
    let base = emulator_host.unwrap_or(STORAGE_BASE_URL);

    let mut url = Url::parse(base)
        .map_err(|e| ConfigError::Init(format!("invalid storage endpoint {base}: {e}")))?;

    url.path_segments_mut()
        .map_err(|_| ConfigError::Init(format!("invalid storage endpoint {base}")))?
        .pop_if_empty()
        .extend(["storage", "v1", "b", bucket, "o", object]);

    url.query_pairs_mut().append_pair("alt", "media");

    Ok(url)
}
