//! Request helper shared by every backend

use reqwest::{
    header::{HeaderValue, CONTENT_TYPE},
    Method, Response, Url,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{AppError, AppResult},
    session::Session,
};

/// Description of one call: endpoint relative to the backend base URL,
/// query parameters and optional JSON body.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Name used in logs and error messages
    pub request_name: String,
    pub endpoint: String,
    pub method: Method,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn new(method: Method, request_name: &str, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        let endpoint = if endpoint.starts_with('/') {
            endpoint
        } else {
            format!("/{}", endpoint)
        };
        Self {
            request_name: request_name.to_string(),
            endpoint,
            method,
            params: Vec::new(),
            body: None,
        }
    }

    pub fn get(request_name: &str, endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, request_name, endpoint)
    }

    pub fn post(request_name: &str, endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, request_name, endpoint)
    }

    pub fn put(request_name: &str, endpoint: impl Into<String>) -> Self {
        Self::new(Method::PUT, request_name, endpoint)
    }

    pub fn delete(request_name: &str, endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, request_name, endpoint)
    }

    /// Add the fields of a serializable struct as query parameters.
    /// `null` fields are dropped.
    pub fn params<P: Serialize>(mut self, params: &P) -> AppResult<Self> {
        let value = serde_json::to_value(params)?;
        self.params.extend(query_pairs(value)?);
        Ok(self)
    }

    /// Add one query parameter, skipped when `None`
    pub fn param<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.params.push((key.to_string(), value.to_string()));
        }
        self
    }

    pub fn body<B: Serialize>(mut self, body: &B) -> AppResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

fn query_pairs(value: Value) -> AppResult<Vec<(String, String)>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => Ok(map
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::Null => None,
                Value::String(s) => Some((key, s)),
                other => Some((key, other.to_string())),
            })
            .collect()),
        other => Err(AppError::Validation(format!(
            "Query parameters must be an object, got {}",
            other
        ))),
    }
}

/// A body deserves a JSON content type unless it is empty
fn has_content(body: &Value) -> bool {
    match body {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

/// Client bound to one backend base URL
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
    cancel: CancellationToken,
}

impl ApiClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, session: Session) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            cancel: CancellationToken::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Same client, with requests abandoned once `token` is cancelled
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancel: token,
            ..self.clone()
        }
    }

    /// Full URL of a request, query string included when parameters remain
    pub fn url(&self, options: &RequestOptions) -> AppResult<Url> {
        let raw = format!("{}{}", self.base_url, options.endpoint);
        let mut url = Url::parse(&raw)
            .map_err(|e| AppError::Validation(format!("Invalid URL {}: {}", raw, e)))?;
        if !options.params.is_empty() {
            url.query_pairs_mut().extend_pairs(options.params.iter());
        }
        Ok(url)
    }

    /// Send with the session's bearer token, if any
    pub async fn send(&self, options: RequestOptions) -> AppResult<Option<Value>> {
        let token = self.session.token();
        self.send_with_token(options, token.as_deref()).await
    }

    /// Send with an explicit bearer token
    pub async fn send_with_token(
        &self,
        options: RequestOptions,
        token: Option<&str>,
    ) -> AppResult<Option<Value>> {
        let request_name = options.request_name.clone();
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::debug!("Request {} cancelled", request_name);
                Err(AppError::Cancelled(request_name))
            }
            result = self.execute(options, token) => result,
        }
    }

    /// Send and deserialize the answer. An empty answer is `None`.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        options: RequestOptions,
    ) -> AppResult<Option<T>> {
        let request_name = options.request_name.clone();
        let value = self.send(options).await?;
        decode(&request_name, value)
    }

    async fn execute(&self, options: RequestOptions, token: Option<&str>) -> AppResult<Option<Value>> {
        let url = self.url(&options)?;
        tracing::debug!("{} {} ({})", options.method, url, options.request_name);

        let mut request = self.http.request(options.method.clone(), url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &options.body {
            if has_content(body) {
                request = request.header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!("Request {} failed: {}", options.request_name, e);
            AppError::Transport {
                request: options.request_name.clone(),
                message: e.to_string(),
            }
        })?;

        read_response(&options.request_name, response).await
    }
}

async fn read_response(request_name: &str, response: Response) -> AppResult<Option<Value>> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!("Request {} answered {}: {}", request_name, status, body);
        return Err(AppError::Http {
            request: request_name.to_string(),
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        });
    }

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.contains("application/json"))
        .unwrap_or(false);

    let text = response.text().await.map_err(|e| AppError::Transport {
        request: request_name.to_string(),
        message: e.to_string(),
    })?;

    if is_json {
        if text.trim().is_empty() {
            return Ok(None);
        }
        return serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| AppError::Decode {
                request: request_name.to_string(),
                message: e.to_string(),
            });
    }

    if text.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Value::String(text)))
    }
}

/// Turn a raw answer into `T`
pub fn decode<T: DeserializeOwned>(request_name: &str, value: Option<Value>) -> AppResult<Option<T>> {
    value
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| AppError::Decode {
            request: request_name.to_string(),
            message: e.to_string(),
        })
}
