//! Thin Dynamics Web API transport.
//!
//! Every request is egress-checked, carries the run's bearer token and goes
//! through the [`RetryPolicy`]. Errors come back as
//! [`SyncError::SourceStore`] with the HTTP status when there was one.

use std::sync::Arc;

use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use booksync_core::{AccessToken, EgressFilter, Sleeper, SyncError, TokioSleeper};

use crate::records::CrmCollection;
use crate::retry::RetryPolicy;

pub struct CrmClient {
    http: reqwest::Client,
    api_url: Url,
    token: AccessToken,
    egress: EgressFilter,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl CrmClient {
    pub fn new(http: reqwest::Client, api_url: Url, token: AccessToken, egress: EgressFilter) -> Self {
        Self {
            http,
            api_url,
            token,
            egress,
            retry: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// GET a collection, following `@odata.nextLink` until exhausted.
    pub async fn retrieve_multiple(
        &self,
        collection: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<Value>, SyncError> {
        let mut url = self.url(collection)?;
        url.query_pairs_mut().extend_pairs(params);

        let mut records = Vec::new();
        let mut next = Some(url);
        let mut pages = 0usize;
        while let Some(url) = next.take() {
            let page: CrmCollection = self
                .retry
                .execute(self.sleeper.as_ref(), collection, || self.get(url.clone()))
                .await?;
            pages += 1;
            records.extend(page.value);
            next = page
                .next_link
                .map(|link| {
                    Url::parse(&link).map_err(|e| {
                        SyncError::Unexpected(format!("invalid @odata.nextLink {link:?}: {e}"))
                    })
                })
                .transpose()?;
        }
        debug!(collection, pages, records = records.len(), "retrieved CRM collection");
        Ok(records)
    }

    /// Number of records matching `filter`.
    pub async fn count(&self, collection: &str, filter: &str) -> Result<u64, SyncError> {
        let mut url = self.url(collection)?;
        url.query_pairs_mut()
            .append_pair("$filter", filter)
            .append_pair("$count", "true");
        let page: CrmCollection = self
            .retry
            .execute(self.sleeper.as_ref(), collection, || self.get(url.clone()))
            .await?;
        Ok(page.count.unwrap_or(page.value.len() as u64))
    }

    /// Run a FetchXML query against `collection`.
    pub async fn fetch_xml(&self, collection: &str, fetch_xml: &str) -> Result<Vec<Value>, SyncError> {
        let mut url = self.url(collection)?;
        url.query_pairs_mut().append_pair("fetchXml", fetch_xml);
        let page: CrmCollection = self.get(url).await?;
        Ok(page.value)
    }

    /// `PUT {collection}({id})/{property}` with `{"value": value}`.
    pub async fn update_single_property(
        &self,
        collection: &str,
        id: &str,
        property: &str,
        value: Value,
    ) -> Result<(), SyncError> {
        let url = self.url(&format!("{collection}({id})/{property}"))?;
        let body = json!({ "value": value });
        self.retry
            .execute(self.sleeper.as_ref(), property, || {
                let url = url.clone();
                let body = body.clone();
                async move {
                    self.egress.check(&url)?;
                    let response = self
                        .request(self.http.put(url))
                        .json(&body)
                        .send()
                        .await
                        .map_err(transport_error)?;
                    check_status(response).await?;
                    Ok(())
                }
            })
            .await
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn url(&self, path: &str) -> Result<Url, SyncError> {
        self.api_url
            .join(path)
            .map_err(|e| SyncError::Unexpected(format!("invalid CRM path {path:?}: {e}")))
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(self.token.secret())
            .header(ACCEPT, "application/json")
            .header("OData-MaxVersion", "4.0")
            .header("OData-Version", "4.0")
            .header("Prefer", "odata.include-annotations=\"*\"")
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, SyncError> {
        self.egress.check(&url)?;
        let response = self
            .request(self.http.get(url))
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;
        let status = response.status().as_u16();
        response
            .json()
            .await
            .map_err(|e| SyncError::source_store(Some(status), format!("invalid CRM response body: {e}")))
    }
}

fn transport_error(err: reqwest::Error) -> SyncError {
    SyncError::source_store(err.status().map(|s| s.as_u16()), err.to_string())
}

/// Pass successful responses through; turn anything else into `SourceStore`.
async fn check_status(response: Response) -> Result<Response, SyncError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.pointer("/error/message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("CRM request failed")
                .to_string()
        });
    Err(SyncError::source_store(Some(status.as_u16()), message))
}
