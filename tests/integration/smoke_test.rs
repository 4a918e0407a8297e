// @smoke: fast sanity checks over the in-process backend

use super::test_utils::TestBackend;
use dashboard_probe::config::AppConfig;

#[tokio::test]
async fn smoke_verbose_report_lists_every_check() {
    let state = TestBackend::new().probe_state(AppConfig::for_target("http://127.0.0.1:8000"));

    let report = state.suite().run().await;
    let text = report.render_verbose();

    assert!(text.starts_with("target: in-process router\n"));
    assert!(text.contains("collected 6 checks"));
    assert!(text.contains(
        "test_dashboard_stats_unauthorized [/api/admin/dashboard/stats] PASSED"
    ));
    assert!(text.contains(
        "test_revenue_overview_authorized [/api/admin/dashboard/revenue-overview] SKIPPED"
    ));
    assert!(text.contains("3 passed, 3 skipped"));
}

#[tokio::test]
async fn smoke_report_serializes_to_json() {
    let state = TestBackend::new().probe_state(AppConfig::for_target("http://127.0.0.1:8000"));

    let report = state.suite().run().await;
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["results"].as_array().unwrap().len(), 6);
    assert_eq!(json["results"][0]["outcome"]["status"], "passed");
    assert_eq!(
        json["results"][0]["kind"]["endpoint"],
        "/api/admin/dashboard/stats"
    );
    assert_eq!(json["results"][3]["outcome"]["status"], "skipped");
}
