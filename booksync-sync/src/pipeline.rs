//! Shared sync entrypoint used by CLI and daemon.

use std::sync::Arc;

use tracing::info;

use booksync_core::telemetry::{self, BusinessEvent};
use booksync_core::{AppConfig, EgressFilter, SyncTimestamp, SystemClock, TokenSource};
use booksync_crm::{CrmClient, CrmSource, RetryPolicy};
use booksync_renderer::QueryRenderer;
use booksync_saras::{SarasClient, SarasTarget};

use crate::enrich::EnrichmentMode;
use crate::error::RunError;
use crate::summary::RunSummary;
use crate::synchroniser::Synchroniser;

/// Build both gateways from `config` and run one full sync.
///
/// Tokens and the sync timestamp are fresh for every call; nothing is shared
/// between runs.
pub async fn run_once(config: &AppConfig) -> Result<RunSummary, RunError> {
    telemetry::emit(BusinessEvent::Launch, "booking sync run starting");
    let timestamp = SyncTimestamp::now();

    let http = reqwest::Client::builder()
        .timeout(config.http_timeout())
        .build()?;
    let egress = EgressFilter::from_config(config)?;

    let crm_token = TokenSource::new(config.crm_credentials()?, http.clone(), egress.clone())
        .acquire()
        .await?;
    let saras_token = TokenSource::new(config.saras_credentials()?, http.clone(), egress.clone())
        .acquire()
        .await?;
    info!("acquired CRM and SARAS access tokens");

    let crm = CrmClient::new(http.clone(), config.crm_api_url()?, crm_token, egress.clone())
        .with_retry(RetryPolicy::new(config.crm.max_retries));
    let source = CrmSource::new(
        crm,
        QueryRenderer::new()?,
        Arc::new(SystemClock),
        config.crm.new_booking_window_hours,
    );

    let saras = SarasClient::new(http, config.saras_api_url()?, saras_token, egress)
        .with_max_retries(config.saras.max_retries);
    let target = SarasTarget::new(saras);

    let synchroniser = Synchroniser::new(
        Arc::new(source),
        Arc::new(target),
        timestamp,
        EnrichmentMode::from_flag(config.feature_toggles.enable_saras_api_v2),
    );
    Ok(synchroniser.process_bookings().await?)
}
