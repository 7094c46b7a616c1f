//! [`BookingTarget`] backed by the SARAS booking API.

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use booksync_core::telemetry::{self, BusinessEvent};
use booksync_core::{BookingDetails, BookingReference, BookingTarget, DownstreamKind, SyncError};

use crate::client::SarasClient;
use crate::convert::to_saras;

pub struct SarasTarget {
    client: SarasClient,
}

impl SarasTarget {
    pub fn new(client: SarasClient) -> Self {
        Self { client }
    }
}

/// Log a failed call at error level with its business event.
fn report(operation: &str, reference: &str, err: &SyncError) {
    if matches!(err, SyncError::AccessDenied { .. }) {
        return;
    }
    let (code, reason) = match err {
        SyncError::Downstream(d) => (d.code, d.reason.clone()),
        _ => (None, None),
    };
    let status = err
        .status()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    error!(
        operation,
        booking_reference = reference,
        status = %status,
        code = ?code,
        reason = reason.as_deref().unwrap_or(""),
        error = %err,
        "{operation}: {status} error for booking {reference}"
    );
    telemetry::emit_saras_status(err.status());
}

#[async_trait]
impl BookingTarget for SarasTarget {
    async fn create_booking(&self, booking: &BookingDetails) -> Result<(), SyncError> {
        let reference = booking.reference();
        let payload = to_saras(booking);
        info!(booking_reference = reference, "posting booking to SARAS");
        debug!(booking_reference = reference, payload = ?payload, "raw SARAS payload");

        match self.client.post(reference, &payload).await {
            Ok(()) => {
                telemetry::emit(
                    BusinessEvent::TeSuccessCreate,
                    &format!("successfully posted booking {reference} to SARAS"),
                );
                Ok(())
            }
            Err(err) => {
                report("create_booking", reference, &err);
                Err(err)
            }
        }
    }

    async fn update_booking(&self, booking: &BookingDetails) -> Result<(), SyncError> {
        let reference = booking.reference();
        let payload = to_saras(booking);
        info!(booking_reference = reference, "sending updated booking to SARAS");
        debug!(booking_reference = reference, payload = ?payload, "raw SARAS payload");

        match self.client.put(reference, &payload).await {
            Ok(()) => {
                telemetry::emit(
                    BusinessEvent::TeSuccessUpdate,
                    &format!("successfully sent updated booking {reference} to SARAS"),
                );
                Ok(())
            }
            Err(err) => {
                report("update_booking", reference, &err);
                if err.downstream_kind() == Some(DownstreamKind::NotFound) {
                    warn!(
                        booking_reference = reference,
                        "booking not found in SARAS, posting missing booking"
                    );
                    return self.create_booking(booking).await;
                }
                Err(err)
            }
        }
    }

    async fn delete_booking(&self, booking: &BookingReference) -> Result<(), SyncError> {
        let reference = booking.reference.as_str();
        info!(booking_reference = reference, "deleting booking in SARAS");

        match self.client.delete(reference).await {
            Ok(()) => {
                telemetry::emit(
                    BusinessEvent::TeSuccessDelete,
                    &format!("successfully deleted booking {reference} in SARAS"),
                );
                Ok(())
            }
            Err(err) => {
                report("delete_booking", reference, &err);
                Err(err)
            }
        }
    }
}
