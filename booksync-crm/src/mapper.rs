//! Raw booking product → [`BookingDetails`].
//!
//! A record that cannot be mapped is dropped with a single
//! `CBS_CDS_CORRUPTED_DATA` warning. One bad record never fails the batch.

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use booksync_core::telemetry::BusinessEvent;
use booksync_core::{
    Address, BookingDetails, BookingProduct, BookingProductId, Contact, Licence, Product,
    TestCentre, TestType,
};

use crate::records::RawBookingProduct;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("missing {0}")]
    Missing(&'static str),

    #[error("invalid test date {0:?}")]
    InvalidTestDate(String),
}

/// Mapped bookings plus the ids of records that were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedBatch {
    pub bookings: Vec<BookingDetails>,
    pub dropped: Vec<String>,
}

pub fn map_batch(records: Vec<Value>) -> MappedBatch {
    let mut batch = MappedBatch::default();
    for record in records {
        let id = record
            .get("ftts_bookingproductid")
            .and_then(Value::as_str)
            .unwrap_or("<unknown>")
            .to_string();
        let reference = record
            .get("ftts_reference")
            .and_then(Value::as_str)
            .map(str::to_string);
        match map_record(record) {
            Ok(booking) => batch.bookings.push(booking),
            Err(err) => {
                warn!(
                    event = BusinessEvent::CdsCorruptedData.as_str(),
                    booking_product_id = %id,
                    booking_reference = reference.as_deref().unwrap_or(""),
                    error = %err,
                    "booking product {id} missing required data"
                );
                batch.dropped.push(id);
            }
        }
    }
    batch
}

pub fn map_record(record: Value) -> Result<BookingDetails, MapError> {
    let raw: RawBookingProduct = serde_json::from_value(record)?;

    let id = raw
        .ftts_bookingproductid
        .ok_or(MapError::Missing("booking product id"))?;
    let reference = raw
        .ftts_reference
        .filter(|r| !r.trim().is_empty())
        .ok_or(MapError::Missing("booking reference"))?;
    let candidate = raw.candidate.ok_or(MapError::Missing("linked candidate entity"))?;
    let product = raw.product.ok_or(MapError::Missing("linked product entity"))?;
    let test_type = product
        .ftts_testenginetesttype
        .ok_or(MapError::Missing("test engine test type"))?;
    let booking = raw.booking.ok_or(MapError::Missing("linked booking entity"))?;
    let centre = booking
        .test_centre
        .ok_or(MapError::Missing("linked test centre entity"))?;
    let licence = booking
        .licence
        .ok_or(MapError::Missing("linked licence entity"))?;
    let raw_date = raw.ftts_testdate.ok_or(MapError::Missing("test date"))?;
    let test_date =
        parse_datetime(&raw_date).ok_or_else(|| MapError::InvalidTestDate(raw_date.clone()))?;
    let candidate_id = raw
        ._ftts_candidateid_value
        .or_else(|| candidate.contactid.clone())
        .ok_or(MapError::Missing("candidate id"))?;

    Ok(BookingDetails {
        booking_product: BookingProduct {
            id: BookingProductId(id),
            reference,
            test_date,
            last_updated_at: raw
                .ftts_testenginebookingupdated
                .as_deref()
                .and_then(parse_datetime),
            candidate_id: candidate_id.clone(),
            personal_reference_number: raw.ftts_personalreferencenumber,
            entitlement_confirmation: raw.ftts_entitlementconfirmation,
            test_language: raw.ftts_testlanguage,
            voiceover_language: raw.ftts_voiceoverlanguage,
            test_accommodation: raw.ftts_testaccommodation,
        },
        contact: Contact {
            id: candidate.contactid.unwrap_or(candidate_id),
            first_name: candidate.ftts_firstandmiddlenames,
            last_name: candidate.lastname,
            date_of_birth: candidate.birthdate,
            gender_code: candidate.gendercode,
            address: Address {
                line1: candidate.address1_line1,
                line2: candidate.address1_line2,
                line3: candidate.address1_line3,
                city: candidate.address1_city,
                county: candidate.address1_county,
                postcode: candidate.address1_postalcode,
            },
        },
        organisation: TestCentre {
            remit: centre.ftts_remit,
            delivery_mode: centre.ftts_testenginedeliverymodel,
            test_centre_code: centre.ftts_testenginetestcentrecode,
            region_a: centre.ftts_regiona.unwrap_or(false),
            region_b: centre.ftts_regionb.unwrap_or(false),
            region_c: centre.ftts_regionc.unwrap_or(false),
        },
        licence: Licence {
            licence_number: licence.ftts_licence,
        },
        product: Product {
            test_type: TestType(test_type),
        },
        test_history: None,
        test_last_passed_date: None,
    })
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
