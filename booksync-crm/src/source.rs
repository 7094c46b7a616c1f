//! [`BookingSource`] backed by the CRM Web API.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use booksync_core::codes::origin;
use booksync_core::telemetry;
use booksync_core::{
    BookingDetails, BookingProductId, BookingReference, BookingSource, Clock, Organisation,
    SyncError, SyncTimestamp, TestType,
};
use booksync_renderer::{QueryContext, QueryKind, QueryRenderer};

use crate::client::CrmClient;
use crate::mapper::map_batch;
use crate::query::{self, BOOKING_PRODUCTS, SYNC_DATE_FIELD, TEST_HISTORIES};
use crate::records::RawTestHistory;

pub struct CrmSource {
    client: CrmClient,
    renderer: QueryRenderer,
    clock: Arc<dyn Clock>,
    new_booking_window_hours: u32,
}

impl CrmSource {
    pub fn new(
        client: CrmClient,
        renderer: QueryRenderer,
        clock: Arc<dyn Clock>,
        new_booking_window_hours: u32,
    ) -> Self {
        Self {
            client,
            renderer,
            clock,
            new_booking_window_hours,
        }
    }

    async fn booking_details(
        &self,
        filter: String,
        operation: &'static str,
    ) -> Result<Vec<BookingDetails>, SyncError> {
        debug!(operation, %filter, "retrieving booking products");
        let records = self
            .client
            .retrieve_multiple(BOOKING_PRODUCTS, &query::booking_details_params(filter))
            .await
            .map_err(|err| {
                report(
                    operation,
                    err,
                    "error retrieving booking products matching the criteria",
                )
            })?;
        let batch = map_batch(records);
        debug!(
            operation,
            mapped = batch.bookings.len(),
            dropped = batch.dropped.len(),
            "mapped booking products"
        );
        Ok(batch.bookings)
    }
}

/// Log a failed CRM call at error level with its business event.
/// Access-denied errors are returned untouched; the egress filter already
/// reported them.
fn report(operation: &str, err: SyncError, what: &str) -> SyncError {
    if matches!(err, SyncError::AccessDenied { .. }) {
        return err;
    }
    let status = err
        .status()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    error!(operation, status = %status, error = %err, "{operation}: {status} {what}");
    telemetry::emit_crm_status(err.status());
    err
}

/// Drop histories with no test-centre remit unless they came from the
/// IHTTC portal.
fn remove_results_without_remits(histories: Vec<RawTestHistory>) -> Vec<RawTestHistory> {
    histories
        .into_iter()
        .filter(|history| {
            let keep =
                history.test_centre_remit.is_some() || history.origin == Some(origin::IHTTC_PORTAL);
            if !keep {
                warn!(
                    candidate_id = history.candidate_id.as_deref().unwrap_or(""),
                    booking_reference = history.booking_product_reference.as_deref().unwrap_or(""),
                    test_history_id = history.test_history_id.as_deref().unwrap_or(""),
                    "not using candidate's test result due to missing remit"
                );
            }
            keep
        })
        .collect()
}

#[async_trait]
impl BookingSource for CrmSource {
    async fn new_bookings(&self) -> Result<Vec<BookingDetails>, SyncError> {
        let filter = query::new_bookings_filter(self.clock.now(), self.new_booking_window_hours);
        self.booking_details(filter, "new_bookings").await
    }

    async fn cancelled_bookings(&self) -> Result<Vec<BookingReference>, SyncError> {
        let filter = query::cancelled_bookings_filter(self.clock.now());
        let bookings = self.booking_details(filter, "cancelled_bookings").await?;
        Ok(bookings.iter().map(BookingDetails::as_reference).collect())
    }

    async fn updated_bookings(&self) -> Result<Vec<BookingDetails>, SyncError> {
        let filter = query::updated_bookings_filter(self.clock.now());
        self.booking_details(filter, "updated_bookings").await
    }

    async fn mark_synced(
        &self,
        id: &BookingProductId,
        timestamp: &SyncTimestamp,
    ) -> Result<(), SyncError> {
        debug!(booking_product_id = %id, sync_timestamp = %timestamp, "updating booking sync date");
        self.client
            .update_single_property(
                BOOKING_PRODUCTS,
                &id.0,
                SYNC_DATE_FIELD,
                Value::String(timestamp.to_string()),
            )
            .await
            .map_err(|err| report("mark_synced", err, "error updating booking product"))
    }

    async fn candidate_has_valid_test_pass(
        &self,
        candidate_id: &str,
        test_type: TestType,
        test_date: DateTime<Utc>,
    ) -> Result<bool, SyncError> {
        let filter = query::valid_pass_filter(candidate_id, test_type, test_date);
        debug!(candidate_id, %filter, "counting valid test passes");
        match self.client.count(TEST_HISTORIES, &filter).await {
            Ok(count) => Ok(count > 0),
            Err(err @ SyncError::AccessDenied { .. }) => Err(err),
            Err(err) => {
                warn!(candidate_id, "treating candidate as having no valid pass");
                report(
                    "candidate_has_valid_test_pass",
                    err,
                    "error checking candidate test history",
                );
                Ok(false)
            }
        }
    }

    async fn last_passed_test_date(
        &self,
        candidate_id: &str,
        test_type: TestType,
        organisation: Organisation,
    ) -> Result<Option<String>, SyncError> {
        let kind = QueryKind::for_organisation(organisation);
        info!(
            candidate_id,
            test_type = %test_type,
            organisation = %organisation,
            query = ?kind,
            "fetching corresponding test results"
        );
        let fetch_xml = self
            .renderer
            .render(kind, &QueryContext::new(candidate_id, test_type))
            .map_err(|e| SyncError::Unexpected(format!("failed to render {kind:?}: {e}")))?;

        let rows = self
            .client
            .fetch_xml(TEST_HISTORIES, &fetch_xml)
            .await
            .map_err(|err| {
                report(
                    "last_passed_test_date",
                    err,
                    "failed to load corresponding test results",
                )
            })?;

        let histories: Vec<RawTestHistory> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value(row) {
                Ok(history) => Some(history),
                Err(e) => {
                    warn!(candidate_id, error = %e, "skipping malformed test history row");
                    None
                }
            })
            .collect();

        let Some(latest) = remove_results_without_remits(histories).into_iter().next() else {
            return Ok(None);
        };
        match latest.test_date {
            Some(date) => Ok(Some(date)),
            None => {
                warn!(
                    test_history_id = latest.test_history_id.as_deref().unwrap_or(""),
                    candidate_id = latest.candidate_id.as_deref().unwrap_or(candidate_id),
                    "test history does not have a test date"
                );
                Ok(None)
            }
        }
    }
}
