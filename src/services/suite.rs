use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::fmt::Write as _;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::config::SuiteConfig;
use crate::errors::ProbeError;
use crate::models::dashboard::Endpoint;
use crate::services::client::DashboardClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "endpoint")]
pub enum CheckKind {
    /// No credentials; the endpoint must answer 401.
    Unauthorized(Endpoint),
    /// Admin bearer token; 200 plus the endpoint's key set.
    Authorized(Endpoint),
}

impl CheckKind {
    pub fn endpoint(self) -> Endpoint {
        match self {
            CheckKind::Unauthorized(e) | CheckKind::Authorized(e) => e,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Check {
    pub name: String,
    pub kind: CheckKind,
}

impl Check {
    pub fn unauthorized(endpoint: Endpoint) -> Self {
        Self {
            name: format!("test_{}_unauthorized", endpoint.name()),
            kind: CheckKind::Unauthorized(endpoint),
        }
    }

    pub fn authorized(endpoint: Endpoint) -> Self {
        Self {
            name: format!("test_{}_authorized", endpoint.name()),
            kind: CheckKind::Authorized(endpoint),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed(String),
    Errored(String),
    Skipped(String),
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Passed => "PASSED",
            Outcome::Failed(_) => "FAILED",
            Outcome::Errored(_) => "ERROR",
            Outcome::Skipped(_) => "SKIPPED",
        }
    }

    fn from_error(e: &ProbeError) -> Self {
        if e.is_failure() {
            Outcome::Failed(e.to_string())
        } else {
            Outcome::Errored(e.to_string())
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub kind: CheckKind,
    pub outcome: Outcome,
    pub attempts: u32,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub results: Vec<CheckResult>,
}

impl SuiteReport {
    fn count(&self, label: &str) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome.label() == label)
            .count()
    }

    pub fn passed(&self) -> usize {
        self.count("PASSED")
    }

    pub fn failed(&self) -> usize {
        self.count("FAILED")
    }

    pub fn errored(&self) -> usize {
        self.count("ERROR")
    }

    pub fn skipped(&self) -> usize {
        self.count("SKIPPED")
    }

    /// Skips do not count against success.
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.errored() == 0
    }

    pub fn result(&self, name: &str) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.name == name)
    }

    pub fn summary_line(&self) -> String {
        let mut parts = Vec::new();
        for (n, word) in [
            (self.failed(), "failed"),
            (self.errored(), "errors"),
            (self.passed(), "passed"),
            (self.skipped(), "skipped"),
        ] {
            if n > 0 {
                parts.push(format!("{n} {word}"));
            }
        }
        if parts.is_empty() {
            parts.push("no checks ran".to_string());
        }
        format!(
            "{} in {:.2}s",
            parts.join(", "),
            self.elapsed_ms as f64 / 1000.0
        )
    }

    /// One line per check, reasons indented underneath, summary last.
    pub fn render_verbose(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "target: {}", self.target);
        let _ = writeln!(out, "collected {} checks", self.results.len());
        for result in &self.results {
            let _ = writeln!(
                out,
                "{} [{}] {}",
                result.name,
                result.kind.endpoint().path(),
                result.outcome.label()
            );
            match &result.outcome {
                Outcome::Failed(reason) | Outcome::Errored(reason) | Outcome::Skipped(reason) => {
                    let _ = writeln!(out, "    {reason}");
                }
                Outcome::Passed => {}
            }
        }
        let _ = writeln!(out, "== {} ==", self.summary_line());
        out
    }
}

/// The dashboard contract as a list of named checks.
pub struct CheckSuite {
    client: DashboardClient,
    options: SuiteConfig,
    checks: Vec<Check>,
}

impl CheckSuite {
    /// Unauthenticated checks for every endpoint, followed by the authorized ones.
    pub fn new(client: DashboardClient, options: SuiteConfig) -> Self {
        let checks = Endpoint::ALL
            .iter()
            .map(|e| Check::unauthorized(*e))
            .chain(Endpoint::ALL.iter().map(|e| Check::authorized(*e)))
            .collect();
        Self::with_checks(client, options, checks)
    }

    pub fn with_checks(client: DashboardClient, options: SuiteConfig, checks: Vec<Check>) -> Self {
        Self {
            client,
            options,
            checks,
        }
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Why authorized checks cannot run right now, if they cannot.
    pub fn authorized_skip_reason(&self) -> Option<String> {
        if !self.options.run_authorized {
            return Some("authorized checks disabled (suite.run_authorized = false)".to_string());
        }
        if self.client.token().is_placeholder() {
            return Some("no real admin token configured; placeholder token is non-functional".to_string());
        }
        None
    }

    pub async fn run(&self) -> SuiteReport {
        let started_at = Utc::now();
        let start = Instant::now();
        info!(
            target_url = %self.client.target(),
            checks = self.checks.len(),
            parallel = self.options.parallel,
            "Running dashboard checks"
        );

        let results = if self.options.parallel {
            join_all(self.checks.iter().map(|c| self.run_check(c))).await
        } else {
            let mut results = Vec::with_capacity(self.checks.len());
            for check in &self.checks {
                results.push(self.run_check(check).await);
            }
            results
        };

        SuiteReport {
            target: self.client.target(),
            started_at,
            elapsed_ms: elapsed_ms(start),
            results,
        }
    }

    async fn run_check(&self, check: &Check) -> CheckResult {
        let start = Instant::now();
        let repeat = self.options.repeat.max(1);

        let (outcome, attempts) = match check.kind {
            CheckKind::Unauthorized(endpoint) => self.run_unauthorized(endpoint, repeat).await,
            CheckKind::Authorized(endpoint) => match self.authorized_skip_reason() {
                Some(reason) => (Outcome::Skipped(reason), 0),
                None => self.run_authorized(endpoint, repeat).await,
            },
        };

        match &outcome {
            Outcome::Passed => info!(check = %check.name, "PASSED"),
            Outcome::Failed(reason) => warn!(check = %check.name, %reason, "FAILED"),
            Outcome::Errored(reason) => error!(check = %check.name, %reason, "ERROR"),
            Outcome::Skipped(reason) => info!(check = %check.name, %reason, "SKIPPED"),
        }

        CheckResult {
            name: check.name.clone(),
            kind: check.kind,
            outcome,
            attempts,
            elapsed_ms: elapsed_ms(start),
        }
    }

    async fn run_unauthorized(&self, endpoint: Endpoint, repeat: u32) -> (Outcome, u32) {
        let mut statuses: Vec<StatusCode> = Vec::with_capacity(repeat as usize);
        for attempt in 1..=repeat {
            match self.client.check_unauthorized(endpoint).await {
                Ok(status) => statuses.push(status),
                Err(e) => return (Outcome::from_error(&e), attempt),
            }
        }

        let first = statuses[0];
        if statuses.iter().any(|s| *s != first) {
            let seen: Vec<String> = statuses.iter().map(|s| s.as_u16().to_string()).collect();
            return (
                Outcome::Failed(format!(
                    "{endpoint}: status changed across repeated requests: [{}]",
                    seen.join(", ")
                )),
                repeat,
            );
        }

        if first != StatusCode::UNAUTHORIZED {
            let e = ProbeError::UnexpectedStatus {
                endpoint,
                expected: StatusCode::UNAUTHORIZED,
                actual: first,
            };
            return (Outcome::from_error(&e), repeat);
        }

        (Outcome::Passed, repeat)
    }

    async fn run_authorized(&self, endpoint: Endpoint, repeat: u32) -> (Outcome, u32) {
        for attempt in 1..=repeat {
            let result = self
                .client
                .fetch_raw(
                    endpoint,
                    self.options.recent_orders_limit,
                    self.options.time_range,
                )
                .await;
            if let Err(e) = result {
                return (Outcome::from_error(&e), attempt);
            }
        }
        (Outcome::Passed, repeat)
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
