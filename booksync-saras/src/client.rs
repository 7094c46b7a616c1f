//! SARAS HTTP transport.
//!
//! One request per call, plus a bounded loop that honours `Retry-After` on
//! HTTP 429. Every other failure is turned into a classified
//! [`DownstreamError`].

use std::sync::Arc;

use reqwest::header::RETRY_AFTER;
use reqwest::{Method, Response, StatusCode, Url};
use tracing::{debug, error, warn};

use booksync_core::config::DEFAULT_MAX_RETRIES;
use booksync_core::{
    AccessToken, Clock, DownstreamError, EgressFilter, Sleeper, SyncError, SystemClock,
    TokioSleeper,
};

use crate::retry_after::parse_retry_after;
use crate::wire::{SarasBooking, SarasErrorBody};

pub struct SarasClient {
    http: reqwest::Client,
    api_url: Url,
    token: AccessToken,
    egress: EgressFilter,
    max_retries: u32,
    sleeper: Arc<dyn Sleeper>,
    clock: Arc<dyn Clock>,
}

impl SarasClient {
    pub fn new(http: reqwest::Client, api_url: Url, token: AccessToken, egress: EgressFilter) -> Self {
        Self {
            http,
            api_url,
            token,
            egress,
            max_retries: DEFAULT_MAX_RETRIES,
            sleeper: Arc::new(TokioSleeper),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// `{api_url}Booking/{reference}`, with the reference path-encoded.
    pub fn booking_url(&self, reference: &str) -> Result<Url, SyncError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| SyncError::Unexpected(format!("SARAS url {} cannot be a base", self.api_url)))?
            .pop_if_empty()
            .push("Booking")
            .push(reference);
        Ok(url)
    }

    pub async fn post(&self, reference: &str, body: &SarasBooking) -> Result<(), SyncError> {
        self.send(Method::POST, reference, Some(body)).await
    }

    pub async fn put(&self, reference: &str, body: &SarasBooking) -> Result<(), SyncError> {
        self.send(Method::PUT, reference, Some(body)).await
    }

    pub async fn delete(&self, reference: &str) -> Result<(), SyncError> {
        self.send(Method::DELETE, reference, None).await
    }

    async fn send(
        &self,
        method: Method,
        reference: &str,
        body: Option<&SarasBooking>,
    ) -> Result<(), SyncError> {
        let url = self.booking_url(reference)?;
        self.egress.check(&url)?;

        let mut retries: u32 = 0;
        loop {
            let mut request = self
                .http
                .request(method.clone(), url.clone())
                .bearer_auth(self.token.secret());
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(err) => {
                    return Err(DownstreamError::classify(
                        err.to_string(),
                        err.status().map(|s| s.as_u16()),
                        None,
                        None,
                    )
                    .into())
                }
            };

            let status = response.status();
            if status.is_success() {
                return Ok(());
            }
            if status == StatusCode::TOO_MANY_REQUESTS {
                error!(%method, reference, "429 error calling SARAS");
                if retries < self.max_retries {
                    let header = response
                        .headers()
                        .get(RETRY_AFTER)
                        .and_then(|v| v.to_str().ok());
                    let delay = parse_retry_after(header, self.clock.now());
                    warn!(
                        reference,
                        retry = retries + 1,
                        delay_secs = delay.as_secs_f64(),
                        "retrying failed SARAS request after {:.1} seconds",
                        delay.as_secs_f64()
                    );
                    self.sleeper.sleep(delay).await;
                    retries += 1;
                    continue;
                }
                warn!(
                    reference,
                    max_retries = self.max_retries,
                    "reached max retries of failed SARAS request"
                );
            }
            return Err(error_from_response(&method, response).await.into());
        }
    }
}

/// Classify a failed response from its `{code, reason}` body.
async fn error_from_response(method: &Method, response: Response) -> DownstreamError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    debug!(%method, status = status.as_u16(), body = %text, "SARAS error response");
    let body: SarasErrorBody = serde_json::from_str(&text).unwrap_or_default();
    DownstreamError::classify(
        format!("SARAS {method} failed with status {}", status.as_u16()),
        Some(status.as_u16()),
        body.code,
        body.reason,
    )
}
