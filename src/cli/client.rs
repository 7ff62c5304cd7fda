use anyhow::{anyhow, bail, Context};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin HTTP client that unwraps the `{success, data}` envelope
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(server: &str, token: Option<String>) -> anyhow::Result<Self> {
        let base = Url::parse(server).with_context(|| format!("invalid server URL '{}'", server))?;
        if !matches!(base.scheme(), "http" | "https") {
            bail!("server URL must use http or https: {}", server);
        }

        Ok(Self {
            http: reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Join `path` onto the base URL, keeping any base path prefix
    pub fn endpoint(&self, path: &str) -> anyhow::Result<Url> {
        let joined = format!("{}/{}", self.base.as_str().trim_end_matches('/'), path.trim_start_matches('/'));
        Url::parse(&joined).with_context(|| format!("invalid endpoint '{}'", path))
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> anyhow::Result<Value> {
        self.send(Method::GET, path, query, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> anyhow::Result<Value> {
        self.send(Method::POST, path, &[], Some(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> anyhow::Result<Value> {
        self.send(Method::PUT, path, &[], Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> anyhow::Result<Value> {
        self.send(Method::DELETE, path, &[], None).await
    }

    async fn send(&self, method: Method, path: &str, query: &[(&str, String)], body: Option<&Value>) -> anyhow::Result<Value> {
        let url = self.endpoint(path)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self.http.request(method, url.clone()).query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;
        let status = response.status();
        let payload: Value = response.json().await.unwrap_or(Value::Null);

        unwrap_envelope(status, payload)
    }
}

/// Extract `data` from a success envelope or turn an error body into an error
pub fn unwrap_envelope(status: StatusCode, payload: Value) -> anyhow::Result<Value> {
    if status.is_success() && payload["success"] != Value::Bool(false) {
        return Ok(payload.get("data").cloned().unwrap_or(Value::Null));
    }

    let message = payload["error"].as_str().unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed"));
    let mut err = format!("{} ({})", message, status.as_u16());
    if let Some(fields) = payload["field_errors"].as_object() {
        for (field, msg) in fields {
            err.push_str(&format!("\n  {}: {}", field, msg.as_str().unwrap_or_default()));
        }
    }
    Err(anyhow!(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn joins_endpoints_under_base_path() {
        let client = ApiClient::new("https://api.example.com/desk/", None).unwrap();
        assert_eq!(
            client.endpoint("/auth/login").unwrap().as_str(),
            "https://api.example.com/desk/auth/login"
        );
        assert!(!client.has_token());
    }

    #[test]
    fn rejects_non_http_servers() {
        assert!(ApiClient::new("ftp://example.com", None).is_err());
        assert!(ApiClient::new("not a url", None).is_err());
    }

    #[test]
    fn unwraps_success_and_errors() {
        let data = unwrap_envelope(StatusCode::OK, json!({ "success": true, "data": [1, 2] })).unwrap();
        assert_eq!(data, json!([1, 2]));

        let err = unwrap_envelope(
            StatusCode::BAD_REQUEST,
            json!({
                "success": false,
                "error": "LifeInsurance validation failed",
                "code": "VALIDATION_ERROR",
                "field_errors": { "planTermPPT": "bad format" }
            }),
        )
        .unwrap_err()
        .to_string();
        assert!(err.starts_with("LifeInsurance validation failed (400)"));
        assert!(err.contains("planTermPPT: bad format"));
    }
}
