// Authorized dashboard reads. These run only with a real admin token.

use super::test_utils::{authorized_config, TestBackend, TEST_ADMIN_TOKEN};
use axum::{http::StatusCode, routing::get, Json, Router};
use dashboard_probe::errors::ProbeError;
use dashboard_probe::models::dashboard::{Endpoint, TimeRange};
use dashboard_probe::services::suite::Outcome;

#[tokio::test]
async fn test_dashboard_stats_authorized() {
    let state = TestBackend::new().probe_state(authorized_config());

    let stats = state.client.fetch_stats().await.unwrap();

    assert_eq!(stats.total_orders, 256);
    assert_eq!(stats.total_products, 124);
}

#[tokio::test]
async fn test_recent_orders_authorized() {
    let state = TestBackend::new().probe_state(authorized_config());

    let recent = state.client.fetch_recent_orders(3).await.unwrap();

    assert_eq!(recent.orders.len(), 3);
}

#[tokio::test]
async fn test_revenue_overview_authorized() {
    let state = TestBackend::new().probe_state(authorized_config());

    let overview = state
        .client
        .fetch_revenue_overview(TimeRange::Monthly)
        .await
        .unwrap();

    assert_eq!(overview.time_range, "monthly");
    assert!(overview.data.is_array());
}

#[tokio::test]
async fn test_fetch_all_loads_every_panel() {
    let state = TestBackend::new().probe_state(authorized_config());

    let snapshot = state
        .client
        .fetch_all(10, TimeRange::Weekly)
        .await
        .unwrap();

    assert_eq!(snapshot.stats.total_customers, 183);
    assert_eq!(snapshot.recent_orders.orders.len(), 5);
    assert_eq!(snapshot.revenue_overview.time_range, "weekly");
}

#[tokio::test]
async fn test_fetch_all_fails_when_one_panel_is_unauthorized() {
    let app = Router::new()
        .route(
            "/api/admin/dashboard/stats",
            get(|| async {
                Json(serde_json::json!({
                    "total_orders": 1,
                    "total_revenue": 2,
                    "total_customers": 3,
                    "total_products": 4
                }))
            }),
        )
        .route(
            "/api/admin/dashboard/recent-orders",
            get(|| async { Json(serde_json::json!({ "orders": [] })) }),
        )
        .route(
            "/api/admin/dashboard/revenue-overview",
            get(|| async { StatusCode::UNAUTHORIZED }),
        );
    let state = dashboard_probe::state::ProbeState::in_process(authorized_config(), app);

    let err = state
        .client
        .fetch_all(10, TimeRange::Monthly)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProbeError::UnexpectedStatus {
            endpoint: Endpoint::RevenueOverview,
            expected: StatusCode::OK,
            actual: StatusCode::UNAUTHORIZED,
        }
    ));
}

#[tokio::test]
async fn test_wrong_token_is_rejected() {
    let state = TestBackend::with_admin_token("some-other-token").probe_state(authorized_config());

    let err = state.client.fetch_stats().await.unwrap_err();

    assert!(matches!(
        err,
        ProbeError::UnexpectedStatus {
            endpoint: Endpoint::Stats,
            expected: StatusCode::OK,
            actual: StatusCode::UNAUTHORIZED,
        }
    ));
}

#[tokio::test]
async fn test_full_suite_with_real_token_passes() {
    let state = TestBackend::new().probe_state(authorized_config());
    assert_eq!(state.client.token().expose(), TEST_ADMIN_TOKEN);

    let report = state.suite().run().await;

    assert_eq!(report.passed(), 6, "{}", report.render_verbose());
    assert_eq!(report.skipped(), 0);
    assert!(report.is_success());
}

#[tokio::test]
async fn test_run_authorized_without_token_skips() {
    let mut config = authorized_config();
    config.auth.admin_token.clear();
    let state = TestBackend::new().probe_state(config);

    let report = state.suite().run().await;

    assert_eq!(report.skipped(), 3);
    let result = report.result("test_revenue_overview_authorized").unwrap();
    assert!(matches!(&result.outcome, Outcome::Skipped(r) if r.contains("placeholder")));
}
