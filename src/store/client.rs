use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use crate::shared::AppError;

/// Connection settings for the managed GraphQL data service.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub endpoint: String,
    pub api_key: String,
}

impl ApiConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Reads `TITAN_API_URL` and `TITAN_API_KEY` from the environment.
    pub fn from_env() -> Result<Self, AppError> {
        let endpoint = std::env::var("TITAN_API_URL")
            .map_err(|_| AppError::Config("TITAN_API_URL is not set".to_string()))?;
        let api_key = std::env::var("TITAN_API_KEY")
            .map_err(|_| AppError::Config("TITAN_API_KEY is not set".to_string()))?;

        Ok(Self { endpoint, api_key })
    }
}

/// Executor for GraphQL documents against the remote store.
///
/// The backend speaks the AppSync model-operation dialect: point
/// get/create/update/delete per collection plus list-with-filter, each
/// response wrapped in a `{data, errors}` envelope. One client handle is
/// built at startup and shared by every repository.
pub struct GraphQlClient {
    http: Client,
    config: ApiConfig,
}

impl GraphQlClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Sends one GraphQL document and unwraps the response envelope.
    /// The first entry of a non-empty `errors` array wins; partial data
    /// alongside errors is discarded.
    #[instrument(skip(self, query, variables))]
    pub async fn execute(&self, query: &str, variables: Value) -> Result<Value, AppError> {
        let response = self
            .http
            .post(&self.config.endpoint)
            .header("x-api-key", &self.config.api_key)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;

        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if let Some(first) = errors.first() {
                let message = first
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown backend error");
                warn!(error = %message, "GraphQL request returned errors");
                return Err(AppError::Backend(message.to_string()));
            }
        }

        debug!("GraphQL request completed");

        body.get("data")
            .cloned()
            .ok_or_else(|| AppError::Backend("response had no data".to_string()))
    }
}

/// Decodes one named field out of a `data` object, treating an explicit
/// null the same as an absent field.
pub(crate) fn decode_field<T: serde::de::DeserializeOwned>(
    data: &Value,
    field: &str,
) -> Result<Option<T>, AppError> {
    match data.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| AppError::Backend(format!("failed to decode {field}: {e}"))),
    }
}

/// Decodes the `items` array of a list-query result. A missing result
/// object decodes as an empty list, matching how the original client
/// treated absent list data.
pub(crate) fn decode_items<T: serde::de::DeserializeOwned>(
    data: &Value,
    field: &str,
) -> Result<Vec<T>, AppError> {
    let items = match data.get(field).and_then(|r| r.get("items")) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(items) => items,
    };

    serde_json::from_value(items.clone())
        .map_err(|e| AppError::Backend(format!("failed to decode {field} items: {e}")))
}
