use dashboard_probe::config::AppConfig;
use dashboard_probe::services::suite::SuiteReport;
use dashboard_probe::state::ProbeState;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const EXIT_SUCCESS: u8 = 0;
const EXIT_FAILURE: u8 = 1;
const EXIT_INTERRUPTED: u8 = 130;

async fn setup_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => Some(s),
            Err(e) => {
                warn!("Failed to register SIGTERM handler: {}", e);
                None
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, abandoning dashboard checks in flight");
            }
            () = async {
                if let Some(ref mut sigterm) = sigterm {
                    if sigterm.recv().await.is_none() {
                        warn!("SIGTERM signal stream closed unexpectedly");
                    }
                } else {
                    std::future::pending::<()>().await;
                }
            } => {
                info!("Received SIGTERM, abandoning dashboard checks in flight");
            }
        }
    }
    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, abandoning dashboard checks in flight");
    }
}

fn setup_logging(config: &AppConfig) {
    let filter = EnvFilter::try_new(format!(
        "{level},hyper=warn,reqwest=warn",
        level = config.log.level
    ))
    .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    match config.log.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(false)
                        .with_file(true)
                        .with_line_number(true)
                        .with_current_span(true)
                        .with_span_list(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}

/// Zero when nothing failed or errored; skipped checks do not count.
fn exit_code_for(report: &SuiteReport) -> u8 {
    if report.is_success() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let config = AppConfig::new().map_err(|e| {
        anyhow::anyhow!(
            "Failed to load configuration: {e}. Please check your PROBE__* environment variables."
        )
    })?;

    setup_logging(&config);
    for warning in config.warnings() {
        warn!("{warning}");
    }

    info!("Starting dashboard-probe v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Config loaded: target={}, timeout={}s, run_authorized={}",
        config.target.base_url, config.target.timeout_secs, config.suite.run_authorized
    );

    let state = ProbeState::from_config(config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize HTTP transport: {e}"))?;
    info!(
        token_kind = ?state.client.token().kind(),
        fingerprint = %state.client.token().fingerprint(),
        "Admin token loaded"
    );

    let suite = state.suite();
    let suite_target = state.client.target();
    let report = tokio::select! {
        report = suite.run() => report,
        () = setup_shutdown_signal() => {
            error!(
                base_url = %suite_target,
                "Dashboard check run interrupted; no report produced"
            );
            return Ok(ExitCode::from(EXIT_INTERRUPTED));
        }
    };

    print!("{}", report.render_verbose());
    Ok(ExitCode::from(exit_code_for(&report)))
}
