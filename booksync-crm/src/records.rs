//! Raw CRM record shapes as returned by the Dynamics Web API.
//!
//! Every field is optional: CRM happily returns nulls for lookups and
//! required columns alike. Deciding what is mandatory is the mapper's job.

use serde::Deserialize;
use serde_json::Value;

/// One page of an OData collection response.
#[derive(Debug, Clone, Deserialize)]
pub struct CrmCollection {
    #[serde(default)]
    pub value: Vec<Value>,
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
    #[serde(rename = "@odata.count", default)]
    pub count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBookingProduct {
    pub ftts_bookingproductid: Option<String>,
    pub ftts_reference: Option<String>,
    pub ftts_testdate: Option<String>,
    pub ftts_testenginebookingupdated: Option<String>,
    pub _ftts_candidateid_value: Option<String>,
    pub ftts_personalreferencenumber: Option<String>,
    pub ftts_entitlementconfirmation: Option<String>,
    pub ftts_testlanguage: Option<i64>,
    pub ftts_voiceoverlanguage: Option<i64>,
    pub ftts_testaccommodation: Option<String>,
    #[serde(rename = "ftts_CandidateId")]
    pub candidate: Option<RawContact>,
    #[serde(rename = "ftts_productid")]
    pub product: Option<RawProduct>,
    #[serde(rename = "ftts_bookingid")]
    pub booking: Option<RawBooking>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContact {
    pub contactid: Option<String>,
    pub ftts_firstandmiddlenames: Option<String>,
    pub lastname: Option<String>,
    pub birthdate: Option<String>,
    pub gendercode: Option<i64>,
    pub address1_line1: Option<String>,
    pub address1_line2: Option<String>,
    pub address1_line3: Option<String>,
    pub address1_city: Option<String>,
    pub address1_county: Option<String>,
    pub address1_postalcode: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProduct {
    pub ftts_testenginetesttype: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBooking {
    #[serde(rename = "ftts_testcentre")]
    pub test_centre: Option<RawTestCentre>,
    #[serde(rename = "ftts_LicenceId")]
    pub licence: Option<RawLicence>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTestCentre {
    pub ftts_remit: Option<i64>,
    pub ftts_testenginedeliverymodel: Option<i64>,
    pub ftts_testenginetestcentrecode: Option<String>,
    pub ftts_regiona: Option<bool>,
    pub ftts_regionb: Option<bool>,
    pub ftts_regionc: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLicence {
    pub ftts_licence: Option<String>,
}

/// A row of the corresponding-test-results FetchXML query, keyed by alias.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTestHistory {
    pub test_history_id: Option<String>,
    pub test_date: Option<String>,
    pub test_status: Option<i64>,
    pub candidate_id: Option<String>,
    pub test_centre_remit: Option<i64>,
    pub origin: Option<i64>,
    pub booking_product_reference: Option<String>,
}
