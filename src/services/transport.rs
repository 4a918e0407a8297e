use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{header::AUTHORIZATION, Request, StatusCode},
    Router,
};
use std::time::Duration;
use tower::util::ServiceExt;
use tracing::debug;
use uuid::Uuid;

use crate::config::TargetConfig;
use crate::errors::{ProbeError, ProbeResult};
use crate::models::dashboard::Endpoint;
use crate::services::token::AdminToken;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Upper bound on response bodies read from an in-process router.
const ROUTER_BODY_LIMIT: usize = 4 * 1024 * 1024;

/// One GET against a dashboard endpoint.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub endpoint: Endpoint,
    pub query: Vec<(String, String)>,
    pub request_id: String,
    bearer: Option<String>,
}

impl ProbeRequest {
    /// Request with no `Authorization` header. There is no way to add one.
    pub fn anonymous(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            query: Vec::new(),
            request_id: Uuid::new_v4().to_string(),
            bearer: None,
        }
    }

    pub fn authorized(endpoint: Endpoint, token: &AdminToken) -> Self {
        Self {
            bearer: Some(token.bearer_value()),
            ..Self::anonymous(endpoint)
        }
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn bearer(&self) -> Option<&str> {
        self.bearer.as_deref()
    }

    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.endpoint.path().to_string();
        }
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{}", self.endpoint.path(), encoded)
    }
}

#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl ProbeResponse {
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ProbeRequest) -> ProbeResult<ProbeResponse>;

    /// Human-readable target, used in report headers.
    fn describe(&self) -> String;
}

/// Talks to a running backend over the network.
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &TargetConfig) -> ProbeResult<Self> {
        let parsed = url::Url::parse(&config.base_url).map_err(|e| {
            ProbeError::InvalidRequest(format!("invalid base URL '{}': {}", config.base_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ProbeError::InvalidRequest(format!(
                "unsupported scheme '{}' in base URL",
                parsed.scheme()
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProbeError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ProbeRequest) -> ProbeResult<ProbeResponse> {
        let url = format!("{}{}", self.base_url, request.path_and_query());
        debug!(
            request_id = %request.request_id,
            authorized = request.bearer().is_some(),
            "GET {url}"
        );

        let mut builder = self
            .client
            .get(&url)
            .header(REQUEST_ID_HEADER, &request.request_id);
        if let Some(bearer) = request.bearer() {
            builder = builder.header(AUTHORIZATION, bearer);
        }

        // reqwest errors carry the URL; timeouts and bad headers are classified in `From`.
        let res = builder.send().await?;
        let status = res.status();
        let body = res.bytes().await?;

        debug!(request_id = %request.request_id, %status, "response received");
        Ok(ProbeResponse { status, body })
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Drives an application in-process, without binding a socket.
#[derive(Clone)]
pub struct RouterTransport {
    app: Router,
}

impl RouterTransport {
    pub fn new(app: Router) -> Self {
        Self { app }
    }
}

#[async_trait]
impl Transport for RouterTransport {
    async fn send(&self, request: &ProbeRequest) -> ProbeResult<ProbeResponse> {
        let mut builder = Request::builder()
            .method("GET")
            .uri(request.path_and_query())
            .header(REQUEST_ID_HEADER, &request.request_id);
        if let Some(bearer) = request.bearer() {
            builder = builder.header(AUTHORIZATION, bearer);
        }
        let req = builder
            .body(Body::empty())
            .map_err(|e| ProbeError::InvalidRequest(e.to_string()))?;

        debug!(
            request_id = %request.request_id,
            authorized = request.bearer().is_some(),
            "in-process GET {}",
            request.path_and_query()
        );

        let response = self
            .app
            .clone()
            .oneshot(req)
            .await
            .map_err(|e| ProbeError::Transport(e.to_string()))?;
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), ROUTER_BODY_LIMIT)
            .await
            .map_err(|e| ProbeError::Transport(format!("Failed to read body: {e}")))?;

        Ok(ProbeResponse { status, body })
    }

    fn describe(&self) -> String {
        "in-process router".to_string()
    }
}
