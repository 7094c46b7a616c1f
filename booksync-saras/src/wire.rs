//! SARAS booking payload.
//!
//! Absent values are skipped on serialization; empty strings and arrays are
//! sent as they are.

use serde::Serialize;

use booksync_core::{Organisation, TestType};

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:expr),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
        #[serde(into = "u8")]
        pub enum $name {
            $($variant = $value),+
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value as u8
            }
        }
    };
}

wire_enum!(Gender {
    Female = 0,
    Male = 1,
    Unknown = 3,
});

wire_enum!(TestCentreRegion {
    Default = 0,
    RegionA = 1,
    RegionB = 2,
    RegionC = 3,
});

wire_enum!(TestLanguage {
    English = 0,
    Welsh = 1,
});

wire_enum!(VoiceoverLanguage {
    English = 0,
    Welsh = 1,
    Arabic = 2,
    Farsi = 3,
    Cantonese = 4,
    Turkish = 5,
    Polish = 6,
    Portuguese = 7,
});

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SarasAppointment {
    pub date_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SarasCandidate {
    #[serde(rename = "CandidateID")]
    pub candidate_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(rename = "DOB", skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    pub gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driving_license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_reference_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entitlement_confirmation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SarasTestCentre {
    pub region: TestCentreRegion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub testcentre_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SarasBooking {
    pub appointment: SarasAppointment,
    pub candidate: SarasCandidate,
    #[serde(rename = "DeliveryModeID", skip_serializing_if = "Option::is_none")]
    pub delivery_mode_id: Option<i64>,
    pub testcentre: SarasTestCentre,
    pub test_language: TestLanguage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_over_language: Option<VoiceoverLanguage>,
    pub test_type: TestType,
    pub organisation: Organisation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_accommodation: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_passed_exams: Option<Vec<TestType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_passed_test_date: Option<String>,
}

/// Error body SARAS returns on failure.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct SarasErrorBody {
    pub code: Option<i64>,
    pub reason: Option<String>,
}
