use crate::config::AppConfig;
use crate::errors::ProbeResult;
use crate::services::client::DashboardClient;
use crate::services::suite::CheckSuite;
use crate::services::token::AdminToken;
use crate::services::transport::{HttpTransport, RouterTransport, Transport};
use axum::Router;
use std::sync::Arc;

/// Read-only handle to the application under test, built once per run.
#[derive(Clone)]
pub struct ProbeState {
    pub config: Arc<AppConfig>,
    pub client: DashboardClient,
}

impl ProbeState {
    /// Targets the backend at `config.target.base_url` over HTTP.
    pub fn from_config(config: AppConfig) -> ProbeResult<Self> {
        let transport = HttpTransport::new(&config.target)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Drives `app` in-process. `config.target` is ignored.
    pub fn in_process(config: AppConfig, app: Router) -> Self {
        Self::with_transport(config, Arc::new(RouterTransport::new(app)))
    }

    pub fn with_transport(config: AppConfig, transport: Arc<dyn Transport>) -> Self {
        let token = AdminToken::configured(&config.auth.admin_token);
        let client = DashboardClient::new(transport, token)
            .with_cache_bypass(config.suite.bypass_cache);
        Self {
            config: Arc::new(config),
            client,
        }
    }

    pub fn suite(&self) -> CheckSuite {
        CheckSuite::new(self.client.clone(), self.config.suite.clone())
    }
}
