//! Test-history enrichment.
//!
//! LGV and PCV theory tests come in multiple-choice / hazard-perception
//! pairs. Before a booking for one half is sent, SARAS is told whether the
//! candidate already passed the other half.

use tracing::{debug, info};

use booksync_core::{BookingDetails, BookingSource, SyncError};

/// How the counterpart pass is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentMode {
    /// Boolean "holds a valid pass as of the test date" lookup.
    Legacy,
    /// Last pass date for the booking's organisation.
    Current,
}

impl EnrichmentMode {
    /// `enable_saras_api_v2` selects [`EnrichmentMode::Current`].
    pub fn from_flag(enable_saras_api_v2: bool) -> Self {
        if enable_saras_api_v2 {
            EnrichmentMode::Current
        } else {
            EnrichmentMode::Legacy
        }
    }
}

/// Attach test history to `booking` if its test type has a counterpart.
///
/// Bookings without a counterpart are left untouched and trigger no lookup.
pub async fn enrich(
    source: &dyn BookingSource,
    mode: EnrichmentMode,
    booking: &mut BookingDetails,
) -> Result<(), SyncError> {
    let test_type = booking.product.test_type;
    let Some(counterpart) = test_type.counterpart() else {
        return Ok(());
    };
    let candidate_id = booking.booking_product.candidate_id.clone();
    debug!(%test_type, %counterpart, ?mode, "looking up counterpart test pass");

    match mode {
        EnrichmentMode::Legacy => {
            let has_pass = source
                .candidate_has_valid_test_pass(
                    &candidate_id,
                    counterpart,
                    booking.booking_product.test_date,
                )
                .await?;
            if has_pass {
                info!(%counterpart, "candidate holds a valid counterpart pass");
                booking.test_history = Some(vec![counterpart]);
            }
        }
        EnrichmentMode::Current => {
            let organisation = booking.organisation.organisation();
            let last_passed = source
                .last_passed_test_date(&candidate_id, counterpart, organisation)
                .await?;
            if let Some(date) = last_passed {
                info!(%counterpart, last_passed = %date, "found counterpart pass");
                booking.test_history = Some(vec![counterpart]);
                booking.test_last_passed_date = Some(date);
            }
        }
    }
    Ok(())
}
