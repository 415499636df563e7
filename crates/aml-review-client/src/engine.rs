//! Engine API calls: OAuth, variable search, user-task completion.

use crate::config::EngineConfig;
use crate::error::ClientError;
use aml_review_core::review::ReviewRecord;
use aml_review_core::VariableBag;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

/// Placeholder value for variables the engine refused to return in
/// full. Never parses as JSON, so it can never contribute results.
pub const TRUNCATED_MARKER: &str = "(truncated)";

/// One variable as returned by the engine's search endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineVariable {
    pub name: String,
    pub value: Value,
    #[serde(default)]
    pub is_truncated: bool,
}

#[derive(Debug, Deserialize)]
struct SearchPage<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserTask {
    user_task_key: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Convert the engine's variable list into a raw bag. Truncated entries
/// are unusable and degrade to the opaque marker rather than being
/// half-parsed.
pub fn bag_from_variables(variables: Vec<EngineVariable>) -> VariableBag {
    variables
        .into_iter()
        .map(|v| {
            let value = if v.is_truncated { Value::String(TRUNCATED_MARKER.into()) } else { v.value };
            (v.name, value)
        })
        .collect()
}

/// Thin request/response client for the engine. One OAuth round-trip
/// per call; token caching is a non-goal at this request volume.
pub struct EngineClient {
    http: Client,
    config: EngineConfig,
}

impl EngineClient {
    pub fn new(config: EngineConfig) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { http, config })
    }

    async fn access_token(&self) -> Result<String, ClientError> {
        let response = self
            .http
            .post(&self.config.oauth_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("audience", self.config.oauth_audience.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// Fetch the raw process instance. 404 means the transaction does
    /// not exist.
    pub async fn process_instance(&self, key: &str) -> Result<Value, ClientError> {
        let token = self.access_token().await?;
        let url = format!("{}/v2/process-instances/{key}", self.config.base_url);
        let response = self.http.get(&url).bearer_auth(&token).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(format!("transaction {key} not found")));
        }
        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch every variable scoped to the process instance as a raw bag.
    pub async fn variable_bag(&self, key: &str) -> Result<VariableBag, ClientError> {
        let token = self.access_token().await?;
        let url = format!("{}/v2/variables/search", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&json!({
                "filter": { "processInstanceKey": key },
                "page": { "from": 0, "limit": 200 },
            }))
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let page: SearchPage<EngineVariable> = response.json().await?;
        debug!(transaction = %key, variables = page.items.len(), "fetched variable bag");
        Ok(bag_from_variables(page.items))
    }

    /// Complete the transaction's pending review task with the
    /// reviewer's decision. Exactly one pending task is expected; zero
    /// is a not-found condition. Once completed the decision is
    /// immutable from this side.
    pub async fn submit_review(
        &self,
        key: &str,
        review: &ReviewRecord,
    ) -> Result<String, ClientError> {
        let token = self.access_token().await?;

        let search_url = format!("{}/v2/user-tasks/search", self.config.base_url);
        let response = self
            .http
            .post(&search_url)
            .bearer_auth(&token)
            .json(&json!({
                "sort": [{ "field": "creationDate", "order": "ASC" }],
                "filter": { "processInstanceKey": key },
            }))
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let page: SearchPage<UserTask> = response.json().await?;

        let Some(task) = page.items.into_iter().next() else {
            return Err(ClientError::NotFound(format!(
                "no pending review task for transaction {key}"
            )));
        };

        info!(transaction = %key, task = %task.user_task_key, "completing review task");
        let complete_url = format!(
            "{}/v2/user-tasks/{}/completion",
            self.config.base_url, task.user_task_key
        );
        let response = self
            .http
            .post(&complete_url)
            .bearer_auth(&token)
            .json(&json!({ "variables": { "review": review } }))
            .send()
            .await?;
        ensure_success(response).await?;

        Ok(task.user_task_key)
    }
}

/// Map a non-success response to `Upstream` with an excerpt of the body.
async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message: String = response
        .text()
        .await
        .unwrap_or_default()
        .chars()
        .take(200)
        .collect();
    Err(ClientError::Upstream { status: status.as_u16(), message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_variables_become_the_marker() {
        let variables = vec![
            EngineVariable {
                name: "wire".into(),
                value: Value::String(r#"{"tests":{"TR-001":true}}"#.into()),
                is_truncated: false,
            },
            EngineVariable {
                name: "report".into(),
                value: Value::String("{\"huge\":".into()),
                is_truncated: true,
            },
        ];
        let bag = bag_from_variables(variables);
        assert_eq!(bag["report"], Value::String(TRUNCATED_MARKER.into()));
        assert!(bag["wire"].as_str().unwrap().contains("TR-001"));
    }

    #[test]
    fn truncated_variables_contribute_no_results() {
        let bag = bag_from_variables(vec![EngineVariable {
            name: "wire".into(),
            value: Value::String(r#"{"tests":{"TR-001":false}}"#.into()),
            is_truncated: true,
        }]);
        assert!(aml_review_core::flatten(&bag).is_empty());
    }

    #[test]
    fn variable_search_payload_deserializes() {
        let raw = r#"{
            "items": [
                {"name": "cdd", "value": "{\"tests\":{}}", "isTruncated": false},
                {"name": "data", "value": "{}"}
            ]
        }"#;
        let page: SearchPage<EngineVariable> = serde_json::from_str(raw).unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(!page.items[1].is_truncated);
    }

    #[test]
    fn empty_task_page_deserializes() {
        let page: SearchPage<UserTask> = serde_json::from_str("{}").unwrap();
        assert!(page.items.is_empty());
    }
}
