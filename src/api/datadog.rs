use serde_json::Value;
use url::Url;

use super::{ListOptions, ResourceApi};
use crate::import::error::{ImportError, ImportResult};

const API_KEY_HEADER: &str = "DD-API-KEY";
const APP_KEY_HEADER: &str = "DD-APPLICATION-KEY";

/// Datadog v1 API client using reqwest
pub struct DatadogClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
    app_key: String,
}

impl DatadogClient {
    /// Create a client for `https://{subdomain}.datadoghq.com`
    pub fn new(api_key: &str, app_key: &str, subdomain: &str) -> ImportResult<Self> {
        if api_key.trim().is_empty() || app_key.trim().is_empty() {
            return Err(ImportError::Configuration(
                "Both an API key and an application key are required".to_string(),
            ));
        }

        let base_url = Url::parse(&format!("https://{}.datadoghq.com/api/v1/", subdomain))?;
        Self::with_base_url(api_key, app_key, base_url)
    }

    /// Create a client against a custom base URL (proxies, EU site)
    pub fn with_base_url(api_key: &str, app_key: &str, base_url: Url) -> ImportResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("kennel-import/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_string(),
            app_key: app_key.to_string(),
        })
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> ImportResult<Value> {
        let url = self.base_url.join(path)?;

        let response = self
            .client
            .get(url.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .header(APP_KEY_HEADER, &self.app_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ImportError::Api {
                status: status.as_u16(),
                path: url.path().to_string(),
                message: api_error_message(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl ResourceApi for DatadogClient {
    async fn list(&self, resource: &str, options: &ListOptions) -> ImportResult<Value> {
        self.get(resource, &options.query_params()).await
    }

    async fn show(&self, resource: &str, id: &str) -> ImportResult<Value> {
        self.get(&format!("{}/{}", resource, id), &[]).await
    }
}

/// Extract the API's `errors` list, falling back to the raw body
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value.get("errors").and_then(|errors| errors.as_array()).map(|errors| {
                errors
                    .iter()
                    .map(|e| e.as_str().map(str::to_string).unwrap_or_else(|| e.to_string()))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_from_errors_list() {
        let body = r#"{"errors": ["No dashboards match that id"]}"#;
        assert_eq!(api_error_message(body), "No dashboards match that id");
    }

    #[test]
    fn test_api_error_message_joins_errors() {
        let body = r#"{"errors": ["first", "second"]}"#;
        assert_eq!(api_error_message(body), "first, second");
    }

    #[test]
    fn test_api_error_message_falls_back_to_body() {
        assert_eq!(api_error_message("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(api_error_message(r#"{"status": "error"}"#), r#"{"status": "error"}"#);
    }

    #[test]
    fn test_new_requires_keys() {
        let result = DatadogClient::new("", "app", "app");
        assert!(matches!(result, Err(ImportError::Configuration(_))));
    }

    #[test]
    fn test_new_builds_base_url() {
        let client = DatadogClient::new("api", "app", "eu").unwrap();
        assert_eq!(
            client.base_url.join("monitor").unwrap().as_str(),
            "https://eu.datadoghq.com/api/v1/monitor"
        );
    }

    #[test]
    fn test_new_rejects_invalid_subdomain() {
        let result = DatadogClient::new("api", "app", "not a host");
        assert!(matches!(result, Err(ImportError::Configuration(_))));
    }
}
