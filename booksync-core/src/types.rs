//! Domain types for the booking sync job.
//!
//! These are the normalized shapes both gateways agree on. CRM records are
//! mapped into them by `booksync-crm`; `booksync-saras` maps them out to the
//! test-engine wire format.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::codes::{Organisation, TestType};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// CRM identifier of a booking product (`ftts_bookingproductid`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingProductId(pub String);

impl fmt::Display for BookingProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for BookingProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BookingProductId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Timestamp shared by every mark-as-synced call of one run.
///
/// Captured once when the run starts; rendered as RFC 3339 with millisecond
/// precision, e.g. `2021-04-05T14:30:00.000Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SyncTimestamp(DateTime<Utc>);

impl SyncTimestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for SyncTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

// ---------------------------------------------------------------------------
// Booking entity
// ---------------------------------------------------------------------------

/// Minimal projection used when only identity matters (cancellations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingReference {
    pub id: BookingProductId,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingProduct {
    pub id: BookingProductId,
    pub reference: String,
    pub test_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<DateTime<Utc>>,
    pub candidate_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_reference_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entitlement_confirmation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_language: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voiceover_language: Option<i64>,
    /// Raw comma-separated accommodation codes, e.g. `"1,2,3"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_accommodation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub line3: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub postcode: Option<String>,
}

impl Address {
    /// Address lines in display order.
    pub fn lines(&self) -> [Option<&str>; 6] {
        [
            self.line1.as_deref(),
            self.line2.as_deref(),
            self.line3.as_deref(),
            self.city.as_deref(),
            self.county.as_deref(),
            self.postcode.as_deref(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender_code: Option<i64>,
    #[serde(default)]
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCentre {
    pub remit: Option<i64>,
    pub delivery_mode: Option<i64>,
    pub test_centre_code: Option<String>,
    #[serde(default)]
    pub region_a: bool,
    #[serde(default)]
    pub region_b: bool,
    #[serde(default)]
    pub region_c: bool,
}

impl TestCentre {
    /// A centre with no remit is treated as DVSA.
    pub fn organisation(&self) -> Organisation {
        self.remit.map_or(Organisation::default(), Organisation::from_remit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Licence {
    pub licence_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub test_type: TestType,
}

/// The unit of work: one booking product with its linked entities.
///
/// `test_history` and `test_last_passed_date` stay `None` until the
/// synchroniser enriches a booking whose test type has a counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub booking_product: BookingProduct,
    pub contact: Contact,
    pub organisation: TestCentre,
    pub licence: Licence,
    pub product: Product,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_history: Option<Vec<TestType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_last_passed_date: Option<String>,
}

impl BookingDetails {
    pub fn id(&self) -> &BookingProductId {
        &self.booking_product.id
    }

    pub fn reference(&self) -> &str {
        &self.booking_product.reference
    }

    pub fn as_reference(&self) -> BookingReference {
        BookingReference {
            id: self.booking_product.id.clone(),
            reference: self.booking_product.reference.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
