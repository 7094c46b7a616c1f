//! One sync run: updated → cancelled → new.
//!
//! Bookings are handled one at a time. Each booking ends in a [`Step`] or a
//! fatal [`SyncError`]; the first fatal error stops the run and nothing after
//! it is attempted.

use std::future::Future;
use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument, Span};

use booksync_core::{
    BookingDetails, BookingProductId, BookingReference, BookingSource, BookingTarget,
    DownstreamKind, SyncError, SyncTimestamp,
};

use crate::enrich::{self, EnrichmentMode};
use crate::policy;
use crate::summary::{Pass, PassSummary, RunSummary, Step};

pub struct Synchroniser {
    source: Arc<dyn BookingSource>,
    target: Arc<dyn BookingTarget>,
    timestamp: SyncTimestamp,
    mode: EnrichmentMode,
}

impl Synchroniser {
    pub fn new(
        source: Arc<dyn BookingSource>,
        target: Arc<dyn BookingTarget>,
        timestamp: SyncTimestamp,
        mode: EnrichmentMode,
    ) -> Self {
        Self {
            source,
            target,
            timestamp,
            mode,
        }
    }

    pub fn timestamp(&self) -> SyncTimestamp {
        self.timestamp
    }

    /// Run all three passes. Returns the first fatal error, if any.
    pub async fn process_bookings(&self) -> Result<RunSummary, SyncError> {
        info!(timestamp = %self.timestamp, mode = ?self.mode, "starting booking sync");
        let mut passes = Vec::with_capacity(Pass::all().len());
        for pass in Pass::all() {
            let summary = match pass {
                Pass::Updated => self.sync_updated().await?,
                Pass::Cancelled => self.sync_cancelled().await?,
                Pass::New => self.sync_new().await?,
            };
            info!(
                pass = pass.as_str(),
                fetched = summary.fetched,
                synced = summary.synced,
                skipped = summary.skipped,
                "finished {} bookings pass",
                pass.as_str()
            );
            passes.push(summary);
        }
        let summary = RunSummary {
            timestamp: self.timestamp,
            passes,
        };
        info!(
            synced = summary.total_synced(),
            skipped = summary.total_skipped(),
            "booking sync complete"
        );
        Ok(summary)
    }

    // -----------------------------------------------------------------------
    // Passes
    // -----------------------------------------------------------------------

    async fn sync_updated(&self) -> Result<PassSummary, SyncError> {
        let Some(bookings) = fetch(Pass::Updated, self.source.updated_bookings()).await? else {
            return Ok(PassSummary::fetch_failed(Pass::Updated));
        };
        let mut summary = PassSummary::new(Pass::Updated, bookings.len());
        for mut booking in bookings {
            let span = booking_span(Pass::Updated, &booking);
            let step = self.update_one(&mut booking).instrument(span).await?;
            summary.record(step);
        }
        Ok(summary)
    }

    async fn sync_cancelled(&self) -> Result<PassSummary, SyncError> {
        let Some(bookings) = fetch(Pass::Cancelled, self.source.cancelled_bookings()).await?
        else {
            return Ok(PassSummary::fetch_failed(Pass::Cancelled));
        };
        let mut summary = PassSummary::new(Pass::Cancelled, bookings.len());
        for booking in &bookings {
            let span = info_span!(
                "booking",
                pass = Pass::Cancelled.as_str(),
                booking_product_id = %booking.id,
                booking_reference = %booking.reference,
            );
            let step = self.delete_one(booking).instrument(span).await?;
            summary.record(step);
        }
        Ok(summary)
    }

    async fn sync_new(&self) -> Result<PassSummary, SyncError> {
        let Some(bookings) = fetch(Pass::New, self.source.new_bookings()).await? else {
            return Ok(PassSummary::fetch_failed(Pass::New));
        };
        let mut summary = PassSummary::new(Pass::New, bookings.len());
        for mut booking in bookings {
            let span = booking_span(Pass::New, &booking);
            let step = self.create_one(&mut booking).instrument(span).await?;
            summary.record(step);
        }
        Ok(summary)
    }

    // -----------------------------------------------------------------------
    // Per booking
    // -----------------------------------------------------------------------

    async fn create_one(&self, booking: &mut BookingDetails) -> Result<Step, SyncError> {
        self.enrich(booking).await?;
        match self.target.create_booking(booking).await {
            Ok(()) => self.mark_synced(booking.id()).await,
            Err(err) if err.downstream_kind() == Some(DownstreamKind::Duplicate) => {
                warn!(error = %err, "booking already exists in SARAS, marking as synced");
                self.mark_synced(booking.id()).await
            }
            Err(err) => skip(err, "create booking"),
        }
    }

    async fn update_one(&self, booking: &mut BookingDetails) -> Result<Step, SyncError> {
        self.enrich(booking).await?;
        match self.target.update_booking(booking).await {
            Ok(()) => self.mark_synced(booking.id()).await,
            Err(err) => skip(err, "update booking"),
        }
    }

    async fn delete_one(&self, booking: &BookingReference) -> Result<Step, SyncError> {
        match self.target.delete_booking(booking).await {
            Ok(()) => self.mark_synced(&booking.id).await,
            Err(err) if err.downstream_kind() == Some(DownstreamKind::NotFound) => {
                warn!(error = %err, "booking already absent from SARAS, marking as synced");
                self.mark_synced(&booking.id).await
            }
            Err(err) => skip(err, "delete booking"),
        }
    }

    /// A swallowed lookup failure leaves the booking un-enriched.
    async fn enrich(&self, booking: &mut BookingDetails) -> Result<(), SyncError> {
        match enrich::enrich(self.source.as_ref(), self.mode, booking).await {
            Ok(()) => Ok(()),
            Err(err) => policy::resolve(err, "test history lookup"),
        }
    }

    async fn mark_synced(&self, id: &BookingProductId) -> Result<Step, SyncError> {
        match self.source.mark_synced(id, &self.timestamp).await {
            Ok(()) => {
                info!(timestamp = %self.timestamp, "marked booking as synced");
                Ok(Step::Done)
            }
            Err(err) => skip(err, "mark booking as synced"),
        }
    }
}

/// Fetch a pass's bookings; `None` means the fetch failed and was swallowed.
async fn fetch<T>(
    pass: Pass,
    request: impl Future<Output = Result<Vec<T>, SyncError>>,
) -> Result<Option<Vec<T>>, SyncError> {
    match request.await {
        Ok(bookings) => {
            info!(pass = pass.as_str(), count = bookings.len(), "fetched bookings");
            Ok(Some(bookings))
        }
        Err(err) => {
            policy::resolve(err, &format!("fetch {} bookings", pass.as_str()))?;
            Ok(None)
        }
    }
}

fn skip(err: SyncError, context: &str) -> Result<Step, SyncError> {
    policy::resolve(err, context).map(|()| Step::Skipped)
}

fn booking_span(pass: Pass, booking: &BookingDetails) -> Span {
    info_span!(
        "booking",
        pass = pass.as_str(),
        booking_product_id = %booking.id(),
        booking_reference = %booking.reference(),
        candidate_id = %booking.booking_product.candidate_id,
    )
}
