//! OData query builders for the booking and test-history collections.

use chrono::{DateTime, Duration, NaiveTime, SecondsFormat, Utc};

use booksync_core::codes::{booking_status, test_status};
use booksync_core::TestType;

pub const BOOKING_PRODUCTS: &str = "ftts_bookingproducts";
pub const TEST_HISTORIES: &str = "ftts_testhistories";
pub const SYNC_DATE_FIELD: &str = "ftts_testengineinitialsentdate";

const BOOKING_PRODUCT_FIELDS: &[&str] = &[
    "ftts_bookingproductid",
    "ftts_testdate",
    "ftts_testenginebookingupdated",
    "_ftts_candidateid_value",
    "ftts_reference",
    "ftts_personalreferencenumber",
    "ftts_entitlementconfirmation",
    "ftts_testlanguage",
    "ftts_voiceoverlanguage",
    "ftts_testaccommodation",
];
const CANDIDATE_FIELDS: &[&str] = &[
    "contactid",
    "ftts_firstandmiddlenames",
    "lastname",
    "birthdate",
    "gendercode",
    "address1_line1",
    "address1_line2",
    "address1_line3",
    "address1_city",
    "address1_county",
    "address1_postalcode",
];
const TEST_CENTRE_FIELDS: &[&str] = &[
    "ftts_remit",
    "ftts_testenginedeliverymodel",
    "ftts_testenginetestcentrecode",
    "ftts_regiona",
    "ftts_regionb",
    "ftts_regionc",
];

/// Midnight UTC of the day containing `instant`.
pub fn start_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// `2020-05-09T00:00:00.000Z`
pub fn iso(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `$select` / `$expand` / `$filter` parameters for a booking details request.
pub fn booking_details_params(filter: String) -> Vec<(&'static str, String)> {
    let expand = format!(
        "ftts_CandidateId($select={}),ftts_productid($select=ftts_testenginetesttype),\
         ftts_bookingid($select=ftts_bookingid;$expand=ftts_testcentre($select={}),ftts_LicenceId($select=ftts_licence))",
        CANDIDATE_FIELDS.join(","),
        TEST_CENTRE_FIELDS.join(","),
    );
    vec![
        ("$select", BOOKING_PRODUCT_FIELDS.join(",")),
        ("$expand", expand),
        ("$filter", filter),
    ]
}

pub fn new_bookings_filter(now: DateTime<Utc>, window_hours: u32) -> String {
    let limit = now + Duration::hours(i64::from(window_hours));
    format!(
        "(ftts_bookingstatus eq {} or ftts_bookingstatus eq {} or ftts_bookingstatus eq {}) \
         and ftts_testengineinitialsentdate eq null \
         and Microsoft.Dynamics.CRM.Between(PropertyName='ftts_testdate', PropertyValues=['{}', '{}']) \
         and _ftts_bookingid_value ne null and _ftts_candidateid_value ne null",
        booking_status::CONFIRMED,
        booking_status::CANCELLATION_IN_PROGRESS,
        booking_status::CHANGE_IN_PROGRESS,
        iso(start_of_day(now)),
        iso(limit),
    )
}

pub fn cancelled_bookings_filter(now: DateTime<Utc>) -> String {
    format!(
        "ftts_bookingstatus eq {} and ftts_testengineinitialsentdate ne null \
         and ftts_testenginebookingupdated ne null \
         and ftts_testenginebookingupdated ge ftts_testengineinitialsentdate \
         and _ftts_bookingid_value ne null and _ftts_candidateid_value ne null \
         and Microsoft.Dynamics.CRM.OnOrAfter(PropertyName='ftts_testdate',PropertyValue='{}')",
        booking_status::CANCELLED,
        iso(start_of_day(now)),
    )
}

pub fn updated_bookings_filter(now: DateTime<Utc>) -> String {
    format!(
        "ftts_bookingstatus eq {} and ftts_testengineinitialsentdate ne null \
         and ftts_testenginebookingupdated gt ftts_testengineinitialsentdate \
         and Microsoft.Dynamics.CRM.OnOrAfter(PropertyName='ftts_testdate',PropertyValue='{}')",
        booking_status::CONFIRMED,
        iso(start_of_day(now)),
    )
}

/// Passed, unexpired histories of `test_type` for the candidate.
///
/// CRM stores expiry at 00:00 but a pass is valid to the end of that day,
/// so the comparison uses the start of the test date's day.
pub fn valid_pass_filter(candidate_id: &str, test_type: TestType, on: DateTime<Utc>) -> String {
    format!(
        "_ftts_person_value eq {candidate_id} \
         and ftts_Testtype/ftts_testenginetesttype eq {} \
         and ftts_teststatus eq {} and ftts_expirydate ge {}",
        test_type.code(),
        test_status::PASSED,
        iso(start_of_day(on)),
    )
}
