use crate::error::ClientError;

/// Connection settings for the workflow engine, read from the
/// environment by the server binary.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub client_id: String,
    pub client_secret: String,
    pub oauth_url: String,
    pub oauth_audience: String,
    /// Base URL of the engine's query API, e.g.
    /// `https://sin-2.operate.camunda.io/<cluster>`.
    pub base_url: String,
}

const DEFAULT_OAUTH_URL: &str = "https://login.cloud.camunda.io/oauth/token";
const DEFAULT_REGION: &str = "sin-2";

fn require(name: &str) -> Result<String, ClientError> {
    std::env::var(name).map_err(|_| ClientError::Config(name.to_string()))
}

impl EngineConfig {
    /// Build from `ENGINE_*` environment variables. `ENGINE_BASE_URL`
    /// overrides the cluster/region-derived default, which is what
    /// local engine deployments use.
    pub fn from_env() -> Result<Self, ClientError> {
        let client_id = require("ENGINE_CLIENT_ID")?;
        let client_secret = require("ENGINE_CLIENT_SECRET")?;
        let oauth_url =
            std::env::var("ENGINE_OAUTH_URL").unwrap_or_else(|_| DEFAULT_OAUTH_URL.to_string());
        let oauth_audience = std::env::var("ENGINE_OAUTH_AUDIENCE")
            .unwrap_or_else(|_| "operate.camunda.io".to_string());

        let base_url = match std::env::var("ENGINE_BASE_URL") {
            Ok(url) => url.trim_end_matches('/').to_string(),
            Err(_) => {
                let cluster = require("ENGINE_CLUSTER_ID")?;
                let region = std::env::var("ENGINE_REGION")
                    .unwrap_or_else(|_| DEFAULT_REGION.to_string());
                format!("https://{region}.operate.camunda.io/{cluster}")
            }
        };

        Ok(Self { client_id, client_secret, oauth_url, oauth_audience, base_url })
    }
}
