//! CRM option-set codes and the small lookup tables shared by both gateways.
//!
//! CRM exposes option sets as large integers (`675030001`, ...). SARAS uses
//! small enumerations. Only codes the sync job actually reasons about live
//! here; the field-by-field wire tables belong to `booksync-saras`.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Booking / test status
// ---------------------------------------------------------------------------

/// `ftts_bookingstatus` values used by the booking queries.
pub mod booking_status {
    pub const CONFIRMED: i64 = 675_030_001;
    pub const CANCELLATION_IN_PROGRESS: i64 = 675_030_002;
    pub const CHANGE_IN_PROGRESS: i64 = 675_030_003;
    pub const CANCELLED: i64 = 675_030_008;
}

/// `ftts_teststatus` values on test history records.
pub mod test_status {
    pub const PASSED: i64 = 2;
}

/// `ftts_remit` values on test centres.
pub mod remit {
    pub const DVSA_ENGLAND: i64 = 675_030_000;
    pub const DVA: i64 = 675_030_001;
    pub const DVSA_WALES: i64 = 675_030_002;
    pub const DVSA_SCOTLAND: i64 = 675_030_003;
}

/// `ftts_origin` values on test history records.
pub mod origin {
    pub const CANDIDATE_BOOKING_PORTAL: i64 = 675_030_000;
    pub const CUSTOMER_SERVICE_CENTRE: i64 = 675_030_001;
    pub const IHTTC_PORTAL: i64 = 675_030_002;
    pub const TRAINER_BOOKER_PORTAL: i64 = 675_030_003;
}

// ---------------------------------------------------------------------------
// Test type
// ---------------------------------------------------------------------------

/// Test-engine test type code (`ftts_testenginetesttype`).
///
/// Any integer is accepted; only the LGV/PCV theory pairs carry extra
/// behaviour through [`TestType::counterpart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestType(pub i64);

impl TestType {
    pub const LGV_MULTIPLE_CHOICE: TestType = TestType(3);
    pub const LGV_HAZARD_PERCEPTION: TestType = TestType(4);
    pub const PCV_MULTIPLE_CHOICE: TestType = TestType(7);
    pub const PCV_HAZARD_PERCEPTION: TestType = TestType(8);

    /// The paired test type a candidate must also hold a pass for, if any.
    ///
    /// Multiple-choice and hazard-perception parts of the same LGV/PCV
    /// category point at each other; every other test type has no pair.
    pub fn counterpart(self) -> Option<TestType> {
        match self {
            Self::LGV_MULTIPLE_CHOICE => Some(Self::LGV_HAZARD_PERCEPTION),
            Self::LGV_HAZARD_PERCEPTION => Some(Self::LGV_MULTIPLE_CHOICE),
            Self::PCV_MULTIPLE_CHOICE => Some(Self::PCV_HAZARD_PERCEPTION),
            Self::PCV_HAZARD_PERCEPTION => Some(Self::PCV_MULTIPLE_CHOICE),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for TestType {
    fn from(code: i64) -> Self {
        Self(code)
    }
}

// ---------------------------------------------------------------------------
// Organisation
// ---------------------------------------------------------------------------

/// Organisation a test centre belongs to, derived from its remit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(into = "u8")]
pub enum Organisation {
    Dva = 0,
    #[default]
    Dvsa = 1,
}

impl Organisation {
    /// Unknown remits fall back to DVSA.
    pub fn from_remit(code: i64) -> Self {
        match code {
            remit::DVA => Organisation::Dva,
            _ => Organisation::Dvsa,
        }
    }
}

impl From<Organisation> for u8 {
    fn from(org: Organisation) -> Self {
        org as u8
    }
}

impl fmt::Display for Organisation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Organisation::Dva => write!(f, "DVA"),
            Organisation::Dvsa => write!(f, "DVSA"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
