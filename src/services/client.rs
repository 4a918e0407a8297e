use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::errors::{ProbeError, ProbeResult};
use crate::models::dashboard::{
    DashboardSnapshot, DashboardStats, Endpoint, RecentOrders, RevenueOverview, TimeRange,
};
use crate::services::token::AdminToken;
use crate::services::transport::{ProbeRequest, Transport};

const CACHE_BUST_PARAM: &str = "_t";

/// Typed access to the admin dashboard endpoints over any [`Transport`].
#[derive(Clone)]
pub struct DashboardClient {
    transport: Arc<dyn Transport>,
    token: AdminToken,
    bypass_cache: bool,
}

impl DashboardClient {
    pub fn new(transport: Arc<dyn Transport>, token: AdminToken) -> Self {
        Self {
            transport,
            token,
            bypass_cache: false,
        }
    }

    /// Append a `_t=<unix millis>` parameter to every request.
    pub fn with_cache_bypass(mut self, bypass_cache: bool) -> Self {
        self.bypass_cache = bypass_cache;
        self
    }

    pub fn token(&self) -> &AdminToken {
        &self.token
    }

    pub fn target(&self) -> String {
        self.transport.describe()
    }

    fn decorate(&self, request: ProbeRequest) -> ProbeRequest {
        if self.bypass_cache {
            request.with_query(CACHE_BUST_PARAM, chrono::Utc::now().timestamp_millis())
        } else {
            request
        }
    }

    /// GET `endpoint` with no credentials and return whatever status came back.
    pub async fn check_unauthorized(&self, endpoint: Endpoint) -> ProbeResult<StatusCode> {
        let request = self.decorate(ProbeRequest::anonymous(endpoint));
        let response = self.transport.send(&request).await?;
        debug!(
            request_id = %request.request_id,
            endpoint = endpoint.path(),
            status = %response.status,
            "unauthenticated probe"
        );
        Ok(response.status)
    }

    pub async fn expect_unauthorized(&self, endpoint: Endpoint) -> ProbeResult<()> {
        let actual = self.check_unauthorized(endpoint).await?;
        if actual != StatusCode::UNAUTHORIZED {
            return Err(ProbeError::UnexpectedStatus {
                endpoint,
                expected: StatusCode::UNAUTHORIZED,
                actual,
            });
        }
        Ok(())
    }

    /// Sends an authorized request and enforces 200 plus the endpoint's key set.
    async fn fetch_checked(&self, request: ProbeRequest) -> ProbeResult<Value> {
        if self.token.is_placeholder() {
            warn!(
                fingerprint = %self.token.fingerprint(),
                "authorized request using the placeholder admin token"
            );
        }

        let endpoint = request.endpoint;
        let request = self.decorate(request);
        let response = self.transport.send(&request).await?;
        if response.status != StatusCode::OK {
            return Err(ProbeError::UnexpectedStatus {
                endpoint,
                expected: StatusCode::OK,
                actual: response.status,
            });
        }

        let body = response.json().map_err(|e| ProbeError::InvalidJson {
            endpoint,
            message: e.to_string(),
        })?;

        let missing = endpoint.missing_keys(&body);
        if !missing.is_empty() {
            return Err(ProbeError::MissingKeys { endpoint, missing });
        }
        Ok(body)
    }

    async fn fetch_typed<T: DeserializeOwned>(&self, request: ProbeRequest) -> ProbeResult<T> {
        let endpoint = request.endpoint;
        let body = self.fetch_checked(request).await?;
        serde_json::from_value(body).map_err(|e| ProbeError::InvalidJson {
            endpoint,
            message: e.to_string(),
        })
    }

    /// Raw authorized body for `endpoint`, with the default query for it.
    pub async fn fetch_raw(
        &self,
        endpoint: Endpoint,
        recent_orders_limit: u32,
        time_range: TimeRange,
    ) -> ProbeResult<Value> {
        let request = self.authorized_request(endpoint, recent_orders_limit, time_range);
        self.fetch_checked(request).await
    }

    fn authorized_request(
        &self,
        endpoint: Endpoint,
        recent_orders_limit: u32,
        time_range: TimeRange,
    ) -> ProbeRequest {
        let request = ProbeRequest::authorized(endpoint, &self.token);
        match endpoint {
            Endpoint::Stats => request,
            Endpoint::RecentOrders => request.with_query("limit", recent_orders_limit),
            Endpoint::RevenueOverview => request.with_query("time_range", time_range),
        }
    }

    pub async fn fetch_stats(&self) -> ProbeResult<DashboardStats> {
        self.fetch_typed(ProbeRequest::authorized(Endpoint::Stats, &self.token))
            .await
    }

    pub async fn fetch_recent_orders(&self, limit: u32) -> ProbeResult<RecentOrders> {
        let request = ProbeRequest::authorized(Endpoint::RecentOrders, &self.token)
            .with_query("limit", limit);
        self.fetch_typed(request).await
    }

    pub async fn fetch_revenue_overview(
        &self,
        time_range: TimeRange,
    ) -> ProbeResult<RevenueOverview> {
        let request = ProbeRequest::authorized(Endpoint::RevenueOverview, &self.token)
            .with_query("time_range", time_range);
        self.fetch_typed(request).await
    }

    /// Loads all three dashboard panels concurrently. Fails on the first error.
    pub async fn fetch_all(
        &self,
        recent_orders_limit: u32,
        time_range: TimeRange,
    ) -> ProbeResult<DashboardSnapshot> {
        let (stats, recent_orders, revenue_overview) = tokio::try_join!(
            self.fetch_stats(),
            self.fetch_recent_orders(recent_orders_limit),
            self.fetch_revenue_overview(time_range)
        )?;

        Ok(DashboardSnapshot {
            stats,
            recent_orders,
            revenue_overview,
        })
    }
}
