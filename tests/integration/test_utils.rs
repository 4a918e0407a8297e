// Test utilities: an in-process stand-in for the admin backend
use axum::{
    extract::{Query, State},
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use dashboard_probe::config::AppConfig;
use dashboard_probe::state::ProbeState;

pub const TEST_ADMIN_TOKEN: &str = "test-admin-token-123";

#[derive(Clone)]
struct BackendState {
    admin_token: Arc<String>,
}

async fn bearer_auth(
    State(state): State<BackendState>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if token != state.admin_token.as_str() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(req).await)
}

async fn stats() -> Json<Value> {
    Json(json!({
        "total_orders": 256,
        "total_revenue": 25000000,
        "total_customers": 183,
        "total_products": 124
    }))
}

async fn recent_orders(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let limit: usize = q.get("limit").and_then(|v| v.parse().ok()).unwrap_or(10);
    let orders: Vec<Value> = (1..=limit.min(5))
        .map(|id| json!({"id": id, "status": "completed", "total": 850000}))
        .collect();
    Json(json!({ "orders": orders }))
}

async fn revenue_overview(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let time_range = q
        .get("time_range")
        .cloned()
        .unwrap_or_else(|| "monthly".to_string());
    Json(json!({
        "time_range": time_range,
        "data": [
            {"period": "2025-03", "revenue": 11500000},
            {"period": "2025-04", "revenue": 13500000}
        ]
    }))
}

/// Admin backend double: every dashboard route demands `Bearer <admin_token>`.
pub struct TestBackend {
    pub app: Router,
}

impl TestBackend {
    pub fn new() -> Self {
        Self::with_admin_token(TEST_ADMIN_TOKEN)
    }

    pub fn with_admin_token(admin_token: &str) -> Self {
        let state = BackendState {
            admin_token: Arc::new(admin_token.to_string()),
        };

        let app = Router::new()
            .route("/api/admin/dashboard/stats", get(stats))
            .route("/api/admin/dashboard/recent-orders", get(recent_orders))
            .route(
                "/api/admin/dashboard/revenue-overview",
                get(revenue_overview),
            )
            .layer(middleware::from_fn_with_state(state, bearer_auth));

        Self { app }
    }

    /// A backend that forgot to enforce auth on its dashboard routes.
    pub fn without_auth() -> Self {
        let app = Router::new()
            .route("/api/admin/dashboard/stats", get(stats))
            .route("/api/admin/dashboard/recent-orders", get(recent_orders))
            .route(
                "/api/admin/dashboard/revenue-overview",
                get(revenue_overview),
            );
        Self { app }
    }

    /// Probe state driving this backend in-process.
    pub fn probe_state(&self, config: AppConfig) -> ProbeState {
        ProbeState::in_process(config, self.app.clone())
    }

    /// Serves the backend on an ephemeral local port and returns its base URL.
    pub async fn spawn(self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener has no address");
        tokio::spawn(async move {
            axum::serve(listener, self.app)
                .await
                .expect("test backend crashed");
        });
        format!("http://{addr}")
    }
}

/// Config with a real (test) admin token and authorized checks switched on.
pub fn authorized_config() -> AppConfig {
    let mut config = AppConfig::for_target("http://127.0.0.1:8000");
    config.auth.admin_token = TEST_ADMIN_TOKEN.to_string();
    config.suite.run_authorized = true;
    config
}
