//! [`BookingDetails`] → [`SarasBooking`].

use chrono::SecondsFormat;
use tracing::debug;

use booksync_core::{Address, BookingDetails, TestCentre};

use crate::wire::{
    Gender, SarasAppointment, SarasBooking, SarasCandidate, SarasTestCentre, TestCentreRegion,
    TestLanguage, VoiceoverLanguage,
};

pub fn to_saras(booking: &BookingDetails) -> SarasBooking {
    let product = &booking.booking_product;
    let contact = &booking.contact;
    SarasBooking {
        appointment: SarasAppointment {
            date_time: product.test_date.to_rfc3339_opts(SecondsFormat::Secs, true),
        },
        candidate: SarasCandidate {
            candidate_id: product.candidate_id.clone(),
            name: contact.first_name.clone(),
            surname: contact.last_name.clone(),
            dob: contact.date_of_birth.clone(),
            gender: gender(contact.gender_code),
            address: address(&contact.address),
            driving_license_number: booking.licence.licence_number.clone(),
            personal_reference_number: non_empty(&product.personal_reference_number),
            entitlement_confirmation: non_empty(&product.entitlement_confirmation),
        },
        delivery_mode_id: booking.organisation.delivery_mode,
        testcentre: SarasTestCentre {
            region: region(&booking.organisation),
            testcentre_code: booking.organisation.test_centre_code.clone(),
        },
        test_language: test_language(product.test_language),
        voice_over_language: product.voiceover_language.and_then(voiceover_language),
        test_type: booking.product.test_type,
        organisation: booking.organisation.organisation(),
        test_accommodation: product.test_accommodation.as_deref().and_then(accommodations),
        previous_passed_exams: booking.test_history.clone(),
        previous_passed_test_date: booking.test_last_passed_date.clone(),
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

pub fn gender(code: Option<i64>) -> Gender {
    match code {
        Some(1) => Gender::Male,
        Some(2) => Gender::Female,
        _ => Gender::Unknown,
    }
}

pub fn test_language(code: Option<i64>) -> TestLanguage {
    match code {
        Some(2) => TestLanguage::Welsh,
        _ => TestLanguage::English,
    }
}

pub fn voiceover_language(code: i64) -> Option<VoiceoverLanguage> {
    match code {
        675_030_005 => Some(VoiceoverLanguage::English),
        675_030_021 => Some(VoiceoverLanguage::Welsh),
        675_030_001 => Some(VoiceoverLanguage::Arabic),
        675_030_006 => Some(VoiceoverLanguage::Farsi),
        675_030_003 => Some(VoiceoverLanguage::Cantonese),
        675_030_018 => Some(VoiceoverLanguage::Turkish),
        675_030_012 => Some(VoiceoverLanguage::Polish),
        675_030_013 => Some(VoiceoverLanguage::Portuguese),
        _ => None,
    }
}

/// First set flag wins, in A, B, C order.
pub fn region(centre: &TestCentre) -> TestCentreRegion {
    if centre.region_a {
        TestCentreRegion::RegionA
    } else if centre.region_b {
        TestCentreRegion::RegionB
    } else if centre.region_c {
        TestCentreRegion::RegionC
    } else {
        TestCentreRegion::Default
    }
}

/// `"1,2,3"` → `[1, 2, 3]`; empty input is omitted.
pub fn accommodations(raw: &str) -> Option<Vec<i64>> {
    if raw.is_empty() {
        return None;
    }
    let codes = raw
        .split(',')
        .filter_map(|part| match part.trim().parse::<i64>() {
            Ok(code) => Some(code),
            Err(_) => {
                debug!(value = part, "ignoring non-numeric test accommodation");
                None
            }
        })
        .collect();
    Some(codes)
}

pub fn address(address: &Address) -> Option<String> {
    let joined = address
        .lines()
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(",");
    (!joined.is_empty()).then_some(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use booksync_core::{
        BookingProduct, BookingProductId, Contact, Licence, Organisation, Product, TestType,
    };
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::json;

    fn booking() -> BookingDetails {
        BookingDetails {
            booking_product: BookingProduct {
                id: BookingProductId::from("001"),
                reference: "REF001".into(),
                test_date: Utc.with_ymd_and_hms(2021, 4, 5, 14, 30, 0).unwrap(),
                last_updated_at: None,
                candidate_id: "cand-1".into(),
                personal_reference_number: Some(String::new()),
                entitlement_confirmation: Some("EC1".into()),
                test_language: Some(2),
                voiceover_language: Some(675_030_012),
                test_accommodation: Some("1,2,3".into()),
            },
            contact: Contact {
                id: "cand-1".into(),
                first_name: Some("Ada".into()),
                last_name: Some("Lovelace".into()),
                date_of_birth: Some("1990-01-01".into()),
                gender_code: Some(2),
                address: Address {
                    line1: Some(" 1 Street ".into()),
                    line2: Some(String::new()),
                    city: Some("Leeds".into()),
                    ..Address::default()
                },
            },
            organisation: TestCentre {
                remit: Some(675_030_001),
                delivery_mode: Some(1),
                test_centre_code: Some("TC1".into()),
                region_a: false,
                region_b: true,
                region_c: true,
            },
            licence: Licence {
                licence_number: Some("LIC1".into()),
            },
            product: Product {
                test_type: TestType::LGV_MULTIPLE_CHOICE,
            },
            test_history: Some(vec![TestType::LGV_HAZARD_PERCEPTION]),
            test_last_passed_date: Some("2020-01-01".into()),
        }
    }

    #[test]
    fn full_payload_shape() {
        let payload = serde_json::to_value(to_saras(&booking())).expect("json");
        assert_eq!(
            payload,
            json!({
                "Appointment": { "DateTime": "2021-04-05T14:30:00Z" },
                "Candidate": {
                    "CandidateID": "cand-1",
                    "Name": "Ada",
                    "Surname": "Lovelace",
                    "DOB": "1990-01-01",
                    "Gender": 0,
                    "Address": "1 Street,Leeds",
                    "DrivingLicenseNumber": "LIC1",
                    "EntitlementConfirmation": "EC1"
                },
                "DeliveryModeID": 1,
                "Testcentre": { "Region": 2, "TestcentreCode": "TC1" },
                "TestLanguage": 1,
                "VoiceOverLanguage": 6,
                "TestType": 3,
                "Organisation": 0,
                "TestAccommodation": [1, 2, 3],
                "PreviousPassedExams": [4],
                "PreviousPassedTestDate": "2020-01-01"
            })
        );
    }

    #[test]
    fn absent_values_are_omitted() {
        let mut b = booking();
        b.booking_product.voiceover_language = Some(42);
        b.booking_product.test_accommodation = Some(String::new());
        b.contact.address = Address::default();
        b.test_history = None;
        b.test_last_passed_date = None;
        let payload = serde_json::to_value(to_saras(&b)).expect("json");
        let obj = payload.as_object().expect("object");
        assert!(!obj.contains_key("VoiceOverLanguage"));
        assert!(!obj.contains_key("TestAccommodation"));
        assert!(!obj.contains_key("PreviousPassedExams"));
        assert!(!obj.contains_key("PreviousPassedTestDate"));
        assert!(payload["Candidate"].get("Address").is_none());
    }

    #[rstest]
    #[case(Some(1), Gender::Male)]
    #[case(Some(2), Gender::Female)]
    #[case(Some(3), Gender::Unknown)]
    #[case(Some(9), Gender::Unknown)]
    #[case(None, Gender::Unknown)]
    fn gender_table(#[case] code: Option<i64>, #[case] expected: Gender) {
        assert_eq!(gender(code), expected);
    }

    #[rstest]
    #[case(Some(1), TestLanguage::English)]
    #[case(Some(2), TestLanguage::Welsh)]
    #[case(None, TestLanguage::English)]
    fn test_language_table(#[case] code: Option<i64>, #[case] expected: TestLanguage) {
        assert_eq!(test_language(code), expected);
    }

    #[rstest]
    #[case(675_030_000, Organisation::Dvsa)]
    #[case(675_030_001, Organisation::Dva)]
    #[case(675_030_002, Organisation::Dvsa)]
    #[case(675_030_003, Organisation::Dvsa)]
    #[case(1, Organisation::Dvsa)]
    fn remit_table(#[case] remit: i64, #[case] expected: Organisation) {
        let mut b = booking();
        b.organisation.remit = Some(remit);
        assert_eq!(to_saras(&b).organisation, expected);
    }

    #[test]
    fn centre_without_remit_is_dvsa() {
        let mut b = booking();
        b.organisation.remit = None;
        assert_eq!(to_saras(&b).organisation, Organisation::Dvsa);
    }

    #[test]
    fn region_defaults_when_no_flag_set() {
        let mut b = booking();
        b.organisation.region_b = false;
        b.organisation.region_c = false;
        assert_eq!(region(&b.organisation), TestCentreRegion::Default);
        b.organisation.region_a = true;
        b.organisation.region_c = true;
        assert_eq!(region(&b.organisation), TestCentreRegion::RegionA);
    }
}
