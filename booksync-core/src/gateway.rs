//! Contracts between the synchroniser and the two remote systems.
//!
//! The synchroniser only sees these traits; `booksync-crm` and
//! `booksync-saras` provide the HTTP implementations and tests provide
//! in-memory ones.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::codes::{Organisation, TestType};
use crate::error::SyncError;
use crate::types::{BookingDetails, BookingProductId, BookingReference, SyncTimestamp};

/// The CRM: where bookings come from and where sync state is recorded.
#[async_trait]
pub trait BookingSource: Send + Sync {
    /// Confirmed (or in-progress) bookings never sent, with a test date
    /// inside the new-booking window.
    async fn new_bookings(&self) -> Result<Vec<BookingDetails>, SyncError>;

    /// Cancelled bookings that were sent and changed since.
    async fn cancelled_bookings(&self) -> Result<Vec<BookingReference>, SyncError>;

    /// Confirmed bookings updated after they were last sent.
    async fn updated_bookings(&self) -> Result<Vec<BookingDetails>, SyncError>;

    /// Record that the booking was sent at `timestamp`.
    async fn mark_synced(
        &self,
        id: &BookingProductId,
        timestamp: &SyncTimestamp,
    ) -> Result<(), SyncError>;

    /// Whether the candidate holds an unexpired pass of `test_type` as of
    /// `test_date`. Source-store failures yield `Ok(false)`.
    async fn candidate_has_valid_test_pass(
        &self,
        candidate_id: &str,
        test_type: TestType,
        test_date: DateTime<Utc>,
    ) -> Result<bool, SyncError>;

    /// Test date of the candidate's latest relevant pass of `test_type`.
    async fn last_passed_test_date(
        &self,
        candidate_id: &str,
        test_type: TestType,
        organisation: Organisation,
    ) -> Result<Option<String>, SyncError>;
}

/// SARAS: where appointments are created, updated and deleted.
#[async_trait]
pub trait BookingTarget: Send + Sync {
    async fn create_booking(&self, booking: &BookingDetails) -> Result<(), SyncError>;

    /// Update, falling back to a single create when SARAS reports not-found.
    async fn update_booking(&self, booking: &BookingDetails) -> Result<(), SyncError>;

    async fn delete_booking(&self, booking: &BookingReference) -> Result<(), SyncError>;
}
