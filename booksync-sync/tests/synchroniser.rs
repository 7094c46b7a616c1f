//! Synchroniser behaviour against in-memory gateways.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use booksync_core::{
    Address, BookingDetails, BookingProduct, BookingProductId, BookingReference, BookingSource,
    BookingTarget, Contact, DownstreamError, ErrorKind, Licence, Organisation, Product,
    SyncError, SyncTimestamp, TestCentre, TestType,
};
use booksync_sync::{EnrichmentMode, Pass, Synchroniser};
use chrono::{DateTime, TimeZone, Utc};
use rstest::rstest;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum SourceCall {
    Fetch(Pass),
    Mark(String, SyncTimestamp),
    HasPass(String, TestType, DateTime<Utc>),
    LastPass(String, TestType, Organisation),
}

#[derive(Default)]
struct FakeSource {
    updated: Vec<BookingDetails>,
    cancelled: Vec<BookingReference>,
    new: Vec<BookingDetails>,
    fetch_errors: HashMap<Pass, SyncError>,
    /// Keyed by booking product id; every mark of that id fails.
    mark_errors: HashMap<String, SyncError>,
    has_pass: Option<Result<bool, SyncError>>,
    last_pass: Option<Result<Option<String>, SyncError>>,
    calls: Mutex<Vec<SourceCall>>,
}

impl FakeSource {
    fn calls(&self) -> Vec<SourceCall> {
        self.calls.lock().expect("calls").clone()
    }

    fn marked(&self) -> Vec<(String, SyncTimestamp)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SourceCall::Mark(id, ts) => Some((id, ts)),
                _ => None,
            })
            .collect()
    }

    fn fetched(&self) -> Vec<Pass> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SourceCall::Fetch(pass) => Some(pass),
                _ => None,
            })
            .collect()
    }

    fn lookups(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SourceCall::HasPass(..) | SourceCall::LastPass(..)))
            .count()
    }

    fn record(&self, call: SourceCall) {
        self.calls.lock().expect("calls").push(call);
    }

    fn fetch<T: Clone>(&self, pass: Pass, items: &[T]) -> Result<Vec<T>, SyncError> {
        self.record(SourceCall::Fetch(pass));
        match self.fetch_errors.get(&pass) {
            Some(err) => Err(err.clone()),
            None => Ok(items.to_vec()),
        }
    }
}

#[async_trait]
impl BookingSource for FakeSource {
    async fn new_bookings(&self) -> Result<Vec<BookingDetails>, SyncError> {
        self.fetch(Pass::New, &self.new)
    }

    async fn cancelled_bookings(&self) -> Result<Vec<BookingReference>, SyncError> {
        self.fetch(Pass::Cancelled, &self.cancelled)
    }

    async fn updated_bookings(&self) -> Result<Vec<BookingDetails>, SyncError> {
        self.fetch(Pass::Updated, &self.updated)
    }

    async fn mark_synced(
        &self,
        id: &BookingProductId,
        timestamp: &SyncTimestamp,
    ) -> Result<(), SyncError> {
        self.record(SourceCall::Mark(id.0.clone(), *timestamp));
        match self.mark_errors.get(&id.0) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn candidate_has_valid_test_pass(
        &self,
        candidate_id: &str,
        test_type: TestType,
        test_date: DateTime<Utc>,
    ) -> Result<bool, SyncError> {
        self.record(SourceCall::HasPass(candidate_id.into(), test_type, test_date));
        self.has_pass.clone().unwrap_or(Ok(false))
    }

    async fn last_passed_test_date(
        &self,
        candidate_id: &str,
        test_type: TestType,
        organisation: Organisation,
    ) -> Result<Option<String>, SyncError> {
        self.record(SourceCall::LastPass(candidate_id.into(), test_type, organisation));
        self.last_pass.clone().unwrap_or(Ok(None))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TargetCall {
    Create(BookingDetails),
    Update(BookingDetails),
    Delete(String),
}

/// Errors are keyed by booking reference.
#[derive(Default)]
struct FakeTarget {
    create_errors: HashMap<String, SyncError>,
    update_errors: HashMap<String, SyncError>,
    delete_errors: HashMap<String, SyncError>,
    calls: Mutex<Vec<TargetCall>>,
}

impl FakeTarget {
    fn calls(&self) -> Vec<TargetCall> {
        self.calls.lock().expect("calls").clone()
    }

    fn respond(
        &self,
        call: TargetCall,
        errors: &HashMap<String, SyncError>,
        reference: &str,
    ) -> Result<(), SyncError> {
        self.calls.lock().expect("calls").push(call);
        match errors.get(reference) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BookingTarget for FakeTarget {
    async fn create_booking(&self, booking: &BookingDetails) -> Result<(), SyncError> {
        self.respond(
            TargetCall::Create(booking.clone()),
            &self.create_errors,
            booking.reference(),
        )
    }

    async fn update_booking(&self, booking: &BookingDetails) -> Result<(), SyncError> {
        self.respond(
            TargetCall::Update(booking.clone()),
            &self.update_errors,
            booking.reference(),
        )
    }

    async fn delete_booking(&self, booking: &BookingReference) -> Result<(), SyncError> {
        self.respond(
            TargetCall::Delete(booking.reference.clone()),
            &self.delete_errors,
            &booking.reference,
        )
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn run_timestamp() -> SyncTimestamp {
    SyncTimestamp::at(Utc.with_ymd_and_hms(2020, 5, 9, 11, 30, 0).unwrap())
}

fn test_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 5, 10, 9, 0, 0).unwrap()
}

fn booking(n: u32, test_type: TestType) -> BookingDetails {
    BookingDetails {
        booking_product: BookingProduct {
            id: BookingProductId(format!("id-{n}")),
            reference: format!("REF{n}"),
            test_date: test_date(),
            last_updated_at: None,
            candidate_id: format!("cand-{n}"),
            personal_reference_number: None,
            entitlement_confirmation: None,
            test_language: Some(1),
            voiceover_language: None,
            test_accommodation: None,
        },
        contact: Contact {
            id: format!("cand-{n}"),
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            date_of_birth: None,
            gender_code: Some(2),
            address: Address::default(),
        },
        organisation: TestCentre {
            remit: Some(675_030_001),
            delivery_mode: None,
            test_centre_code: Some("TC1".into()),
            region_a: false,
            region_b: false,
            region_c: false,
        },
        licence: Licence {
            licence_number: Some("LIC1".into()),
        },
        product: Product { test_type },
        test_history: None,
        test_last_passed_date: None,
    }
}

fn plain(n: u32) -> BookingDetails {
    booking(n, TestType(0))
}

fn crm_error(status: Option<u16>) -> SyncError {
    SyncError::source_store(status, "CRM failure")
}

fn saras_error(status: u16, code: Option<i64>) -> SyncError {
    DownstreamError::classify("SARAS failure", Some(status), code, None).into()
}

fn access_denied() -> SyncError {
    SyncError::AccessDenied {
        host: "evil.example".into(),
        message: "blocked".into(),
    }
}

fn synchroniser(source: &Arc<FakeSource>, target: &Arc<FakeTarget>) -> Synchroniser {
    synchroniser_in(source, target, EnrichmentMode::Current)
}

fn synchroniser_in(
    source: &Arc<FakeSource>,
    target: &Arc<FakeTarget>,
    mode: EnrichmentMode,
) -> Synchroniser {
    Synchroniser::new(source.clone(), target.clone(), run_timestamp(), mode)
}

fn created(target: &FakeTarget) -> Vec<BookingDetails> {
    target
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            TargetCall::Create(b) => Some(b),
            _ => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Pass order and shared timestamp
// ---------------------------------------------------------------------------

#[tokio::test]
async fn passes_run_in_order_and_share_one_timestamp() {
    let source = Arc::new(FakeSource {
        updated: vec![plain(1), plain(2)],
        cancelled: vec![plain(3).as_reference()],
        new: vec![plain(4), plain(5)],
        ..FakeSource::default()
    });
    let target = Arc::new(FakeTarget::default());

    let summary = synchroniser(&source, &target)
        .process_bookings()
        .await
        .expect("run");

    assert_eq!(source.fetched(), vec![Pass::Updated, Pass::Cancelled, Pass::New]);
    let marked = source.marked();
    let ids: Vec<_> = marked.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["id-1", "id-2", "id-3", "id-4", "id-5"]);
    assert!(marked.iter().all(|(_, ts)| *ts == run_timestamp()));
    assert_eq!(summary.total_synced(), 5);
    assert_eq!(summary.timestamp, run_timestamp());
    assert_eq!(
        target.calls(),
        vec![
            TargetCall::Update(plain(1)),
            TargetCall::Update(plain(2)),
            TargetCall::Delete("REF3".into()),
            TargetCall::Create(plain(4)),
            TargetCall::Create(plain(5)),
        ]
    );
}

// ---------------------------------------------------------------------------
// Fetch failures
// ---------------------------------------------------------------------------

#[rstest]
#[tokio::test]
async fn swallowed_fetch_failure_empties_only_that_pass(
    #[values(Pass::Updated, Pass::Cancelled, Pass::New)] failing: Pass,
    #[values(400, 500)] status: u16,
) {
    let mut fetch_errors = HashMap::new();
    fetch_errors.insert(failing, crm_error(Some(status)));
    let source = Arc::new(FakeSource {
        updated: vec![plain(1)],
        cancelled: vec![plain(2).as_reference()],
        new: vec![plain(3)],
        fetch_errors,
        ..FakeSource::default()
    });
    let target = Arc::new(FakeTarget::default());

    let summary = synchroniser(&source, &target)
        .process_bookings()
        .await
        .expect("run completes");

    assert_eq!(source.fetched(), vec![Pass::Updated, Pass::Cancelled, Pass::New]);
    assert_eq!(target.calls().len(), 2);
    assert_eq!(summary.total_synced(), 2);
    let failed = summary.pass(failing).expect("pass summary");
    assert!(!failed.fetched_ok);
    assert_eq!(failed.synced, 0);
}

#[rstest]
#[case(Pass::Updated, Some(401), vec![Pass::Updated])]
#[case(Pass::Updated, None, vec![Pass::Updated])]
#[case(Pass::Cancelled, Some(403), vec![Pass::Updated, Pass::Cancelled])]
#[case(Pass::New, Some(404), vec![Pass::Updated, Pass::Cancelled, Pass::New])]
#[tokio::test]
async fn fatal_fetch_failure_aborts_remaining_passes(
    #[case] failing: Pass,
    #[case] status: Option<u16>,
    #[case] expected_fetches: Vec<Pass>,
) {
    let mut fetch_errors = HashMap::new();
    fetch_errors.insert(failing, crm_error(status));
    let source = Arc::new(FakeSource {
        fetch_errors,
        ..FakeSource::default()
    });
    let target = Arc::new(FakeTarget::default());

    let err = synchroniser(&source, &target)
        .process_bookings()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SourceStore);
    assert_eq!(err.status(), status);
    assert_eq!(source.fetched(), expected_fetches);
}

#[tokio::test]
async fn cancelled_fetch_404_aborts_before_new_pass() {
    let mut fetch_errors = HashMap::new();
    fetch_errors.insert(Pass::Cancelled, crm_error(Some(404)));
    let source = Arc::new(FakeSource {
        new: vec![plain(1), plain(2)],
        fetch_errors,
        ..FakeSource::default()
    });
    let target = Arc::new(FakeTarget::default());

    let result = synchroniser(&source, &target).process_bookings().await;

    assert!(result.is_err());
    assert!(!source.fetched().contains(&Pass::New));
    assert!(target.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Downstream failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generic_create_failure_skips_only_that_booking() {
    let mut create_errors = HashMap::new();
    create_errors.insert("REF1".to_string(), saras_error(500, None));
    let source = Arc::new(FakeSource {
        new: vec![plain(1), plain(2)],
        ..FakeSource::default()
    });
    let target = Arc::new(FakeTarget {
        create_errors,
        ..FakeTarget::default()
    });

    let summary = synchroniser(&source, &target)
        .process_bookings()
        .await
        .expect("run completes");

    assert_eq!(source.marked(), vec![("id-2".to_string(), run_timestamp())]);
    let new = summary.pass(Pass::New).expect("new pass");
    assert_eq!((new.fetched, new.synced, new.skipped), (2, 1, 1));
}

#[tokio::test]
async fn duplicate_create_marks_synced_without_second_create() {
    let mut create_errors = HashMap::new();
    create_errors.insert("REF1".to_string(), saras_error(400, Some(1025)));
    let source = Arc::new(FakeSource {
        new: vec![plain(1)],
        ..FakeSource::default()
    });
    let target = Arc::new(FakeTarget {
        create_errors,
        ..FakeTarget::default()
    });

    let summary = synchroniser(&source, &target)
        .process_bookings()
        .await
        .expect("run completes");

    assert_eq!(target.calls(), vec![TargetCall::Create(plain(1))]);
    assert_eq!(source.marked(), vec![("id-1".to_string(), run_timestamp())]);
    assert_eq!(summary.total_synced(), 1);
}

#[tokio::test]
async fn not_found_delete_marks_synced_without_second_delete() {
    let mut delete_errors = HashMap::new();
    delete_errors.insert("REF1".to_string(), saras_error(404, Some(1029)));
    let source = Arc::new(FakeSource {
        cancelled: vec![plain(1).as_reference()],
        ..FakeSource::default()
    });
    let target = Arc::new(FakeTarget {
        delete_errors,
        ..FakeTarget::default()
    });

    synchroniser(&source, &target)
        .process_bookings()
        .await
        .expect("run completes");

    assert_eq!(target.calls(), vec![TargetCall::Delete("REF1".into())]);
    assert_eq!(source.marked(), vec![("id-1".to_string(), run_timestamp())]);
}

#[tokio::test]
async fn not_found_surfacing_from_update_is_generic() {
    let mut update_errors = HashMap::new();
    update_errors.insert("REF1".to_string(), saras_error(404, Some(1029)));
    let source = Arc::new(FakeSource {
        updated: vec![plain(1), plain(2)],
        ..FakeSource::default()
    });
    let target = Arc::new(FakeTarget {
        update_errors,
        ..FakeTarget::default()
    });

    synchroniser(&source, &target)
        .process_bookings()
        .await
        .expect("run completes");

    assert!(created(&target).is_empty());
    assert_eq!(source.marked(), vec![("id-2".to_string(), run_timestamp())]);
}

#[tokio::test]
async fn delete_generic_failure_is_not_marked() {
    let mut delete_errors = HashMap::new();
    delete_errors.insert("REF1".to_string(), saras_error(500, Some(9999)));
    let source = Arc::new(FakeSource {
        cancelled: vec![plain(1).as_reference()],
        ..FakeSource::default()
    });
    let target = Arc::new(FakeTarget {
        delete_errors,
        ..FakeTarget::default()
    });

    synchroniser(&source, &target)
        .process_bookings()
        .await
        .expect("run completes");

    assert!(source.marked().is_empty());
}

#[tokio::test]
async fn access_denied_from_target_aborts_immediately() {
    let mut create_errors = HashMap::new();
    create_errors.insert("REF1".to_string(), access_denied());
    let source = Arc::new(FakeSource {
        new: vec![plain(1), plain(2)],
        ..FakeSource::default()
    });
    let target = Arc::new(FakeTarget {
        create_errors,
        ..FakeTarget::default()
    });

    let err = synchroniser(&source, &target)
        .process_bookings()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AccessDenied);
    assert_eq!(target.calls(), vec![TargetCall::Create(plain(1))]);
    assert!(source.marked().is_empty());
}

#[tokio::test]
async fn unexpected_error_aborts_the_run() {
    let mut update_errors = HashMap::new();
    update_errors.insert("REF1".to_string(), SyncError::Unexpected("bug".into()));
    let source = Arc::new(FakeSource {
        updated: vec![plain(1)],
        new: vec![plain(2)],
        ..FakeSource::default()
    });
    let target = Arc::new(FakeTarget {
        update_errors,
        ..FakeTarget::default()
    });

    let err = synchroniser(&source, &target)
        .process_bookings()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert_eq!(source.fetched(), vec![Pass::Updated]);
}

// ---------------------------------------------------------------------------
// Mark-as-synced failures
// ---------------------------------------------------------------------------

#[rstest]
#[case(Some(400))]
#[case(Some(500))]
#[tokio::test]
async fn swallowed_mark_failure_continues(#[case] status: Option<u16>) {
    let mut mark_errors = HashMap::new();
    mark_errors.insert("id-1".to_string(), crm_error(status));
    let source = Arc::new(FakeSource {
        new: vec![plain(1), plain(2)],
        mark_errors,
        ..FakeSource::default()
    });
    let target = Arc::new(FakeTarget::default());

    let summary = synchroniser(&source, &target)
        .process_bookings()
        .await
        .expect("run completes");

    assert_eq!(created(&target).len(), 2);
    let new = summary.pass(Pass::New).expect("new pass");
    assert_eq!((new.synced, new.skipped), (1, 1));
}

#[tokio::test]
async fn re_mark_after_duplicate_is_classified_on_its_own() {
    let mut create_errors = HashMap::new();
    create_errors.insert("REF1".to_string(), saras_error(400, Some(1025)));
    let mut mark_errors = HashMap::new();
    mark_errors.insert("id-1".to_string(), crm_error(Some(404)));
    let source = Arc::new(FakeSource {
        new: vec![plain(1), plain(2)],
        mark_errors,
        ..FakeSource::default()
    });
    let target = Arc::new(FakeTarget {
        create_errors,
        ..FakeTarget::default()
    });

    let err = synchroniser(&source, &target)
        .process_bookings()
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(target.calls(), vec![TargetCall::Create(plain(1))]);
    assert_eq!(source.marked().len(), 1);
}

// ---------------------------------------------------------------------------
// Enrichment
// ---------------------------------------------------------------------------

#[rstest]
#[tokio::test]
async fn types_without_counterpart_trigger_no_lookup(
    #[values(EnrichmentMode::Legacy, EnrichmentMode::Current)] mode: EnrichmentMode,
) {
    let source = Arc::new(FakeSource {
        new: vec![booking(1, TestType(0)), booking(2, TestType(5))],
        has_pass: Some(Ok(true)),
        last_pass: Some(Ok(Some("2020-01-01".into()))),
        ..FakeSource::default()
    });
    let target = Arc::new(FakeTarget::default());

    synchroniser_in(&source, &target, mode)
        .process_bookings()
        .await
        .expect("run");

    assert_eq!(source.lookups(), 0);
    assert!(created(&target)
        .iter()
        .all(|b| b.test_history.is_none() && b.test_last_passed_date.is_none()));
}

#[rstest]
#[case(TestType::LGV_MULTIPLE_CHOICE, TestType::LGV_HAZARD_PERCEPTION)]
#[case(TestType::LGV_HAZARD_PERCEPTION, TestType::LGV_MULTIPLE_CHOICE)]
#[case(TestType::PCV_MULTIPLE_CHOICE, TestType::PCV_HAZARD_PERCEPTION)]
#[case(TestType::PCV_HAZARD_PERCEPTION, TestType::PCV_MULTIPLE_CHOICE)]
#[tokio::test]
async fn legacy_pass_sets_history(#[case] test_type: TestType, #[case] counterpart: TestType) {
    let source = Arc::new(FakeSource {
        updated: vec![booking(1, test_type)],
        has_pass: Some(Ok(true)),
        ..FakeSource::default()
    });
    let target = Arc::new(FakeTarget::default());

    synchroniser_in(&source, &target, EnrichmentMode::Legacy)
        .process_bookings()
        .await
        .expect("run");

    assert!(source
        .calls()
        .contains(&SourceCall::HasPass("cand-1".into(), counterpart, test_date())));
    let TargetCall::Update(sent) = &target.calls()[0] else {
        panic!("expected update");
    };
    assert_eq!(sent.test_history, Some(vec![counterpart]));
    assert_eq!(sent.test_last_passed_date, None);
}

#[tokio::test]
async fn legacy_without_pass_leaves_booking_alone() {
    let source = Arc::new(FakeSource {
        new: vec![booking(1, TestType::LGV_MULTIPLE_CHOICE)],
        has_pass: Some(Ok(false)),
        ..FakeSource::default()
    });
    let target = Arc::new(FakeTarget::default());

    synchroniser_in(&source, &target, EnrichmentMode::Legacy)
        .process_bookings()
        .await
        .expect("run");

    assert_eq!(created(&target)[0].test_history, None);
}

#[tokio::test]
async fn current_mode_sets_history_and_date() {
    let source = Arc::new(FakeSource {
        new: vec![booking(1, TestType::PCV_MULTIPLE_CHOICE)],
        last_pass: Some(Ok(Some("2020-03-04".into()))),
        ..FakeSource::default()
    });
    let target = Arc::new(FakeTarget::default());

    synchroniser(&source, &target)
        .process_bookings()
        .await
        .expect("run");

    assert!(source.calls().contains(&SourceCall::LastPass(
        "cand-1".into(),
        TestType::PCV_HAZARD_PERCEPTION,
        Organisation::Dva,
    )));
    let sent = &created(&target)[0];
    assert_eq!(sent.test_history, Some(vec![TestType::PCV_HAZARD_PERCEPTION]));
    assert_eq!(sent.test_last_passed_date.as_deref(), Some("2020-03-04"));
}

#[tokio::test]
async fn current_mode_without_date_sets_nothing() {
    let source = Arc::new(FakeSource {
        new: vec![booking(1, TestType::LGV_HAZARD_PERCEPTION)],
        last_pass: Some(Ok(None)),
        ..FakeSource::default()
    });
    let target = Arc::new(FakeTarget::default());

    synchroniser(&source, &target)
        .process_bookings()
        .await
        .expect("run");

    let sent = &created(&target)[0];
    assert_eq!(sent.test_history, None);
    assert_eq!(sent.test_last_passed_date, None);
}

#[tokio::test]
async fn swallowed_lookup_failure_still_sends_booking() {
    let source = Arc::new(FakeSource {
        new: vec![booking(1, TestType::LGV_MULTIPLE_CHOICE)],
        last_pass: Some(Err(crm_error(Some(500)))),
        ..FakeSource::default()
    });
    let target = Arc::new(FakeTarget::default());

    synchroniser(&source, &target)
        .process_bookings()
        .await
        .expect("run");

    assert_eq!(created(&target).len(), 1);
    assert_eq!(created(&target)[0].test_history, None);
    assert_eq!(source.marked().len(), 1);
}

#[tokio::test]
async fn fatal_lookup_failure_aborts_before_sending() {
    let source = Arc::new(FakeSource {
        new: vec![booking(1, TestType::LGV_MULTIPLE_CHOICE)],
        has_pass: Some(Err(access_denied())),
        ..FakeSource::default()
    });
    let target = Arc::new(FakeTarget::default());

    let err = synchroniser_in(&source, &target, EnrichmentMode::Legacy)
        .process_bookings()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AccessDenied);
    assert!(target.calls().is_empty());
}

#[tokio::test]
async fn cancelled_bookings_are_never_enriched() {
    let source = Arc::new(FakeSource {
        cancelled: vec![booking(1, TestType::LGV_MULTIPLE_CHOICE).as_reference()],
        has_pass: Some(Ok(true)),
        ..FakeSource::default()
    });
    let target = Arc::new(FakeTarget::default());

    synchroniser_in(&source, &target, EnrichmentMode::Legacy)
        .process_bookings()
        .await
        .expect("run");

    assert_eq!(source.lookups(), 0);
}
