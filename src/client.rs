//! Thin REST client: base URL, bearer token, JSON in and out.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ApiResult, error_for_status};

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Append a query pair; `None` values are skipped.
    pub fn query(mut self, key: &str, value: Option<impl ToString>) -> Self {
        if let Some(value) = value {
            self.query.push((key.to_string(), value.to_string()));
        }
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ApiResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves a request over the wire. Kept as a trait so the typed layer can be
/// exercised without a server.
pub trait Transport: Send + Sync {
    fn send(&self, request: &ApiRequest) -> ApiResult<RawResponse>;
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn build(&self, request: &ApiRequest) -> ApiResult<reqwest::blocking::Request> {
        let mut builder = self
            .client
            .request(request.method.clone(), self.url(&request.path));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        Ok(builder.build()?)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> ApiResult<RawResponse> {
        let built = self.build(request)?;
        let response = self.client.execute(built)?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(RawResponse { status, body })
    }
}

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn from_config(config: &Config, token: Option<String>) -> ApiResult<Self> {
        let transport = HttpTransport::new(&config.api_url, config.timeout())?.with_token(token);
        Ok(Self::new(transport))
    }

    pub fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        debug!(method = %request.method, path = %request.path, "api request");

        let response = self.transport.send(&request).inspect_err(|e| {
            warn!(method = %request.method, path = %request.path, error = %e, "request failed");
        })?;

        if !response.is_success() {
            let err = error_for_status(response.status, &response.body);
            warn!(
                method = %request.method,
                path = %request.path,
                status = response.status,
                error = %err,
                "api error"
            );
            return Err(err);
        }

        // 204s and empty bodies decode as null so `()` and `Option<T>` work.
        let body = response.body.trim();
        let body = if body.is_empty() { "null" } else { body };
        Ok(serde_json::from_str(body)?)
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.execute(ApiRequest::new(Method::GET, path))
    }

    pub fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> ApiResult<T> {
        let mut request = ApiRequest::new(Method::GET, path);
        request.query = query;
        self.execute(request)
    }

    pub fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.execute(ApiRequest::new(Method::POST, path).json(body)?)
    }

    pub fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.execute(ApiRequest::new(Method::PUT, path).json(body)?)
    }

    pub fn put_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.execute(ApiRequest::new(Method::PUT, path))
    }

    // No endpoint uses PATCH yet.
    #[allow(dead_code)]
    pub fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.execute(ApiRequest::new(Method::PATCH, path).json(body)?)
    }

    pub fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.execute(ApiRequest::new(Method::DELETE, path))
    }
}
