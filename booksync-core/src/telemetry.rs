//! Named business events.
//!
//! Alerting keys on the `event` field of a log line rather than on its
//! message, so every event id used anywhere in the job is listed here.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusinessEvent {
    Launch,
    NotWhitelistedUrlCall,
    // SARAS
    TeSuccessCreate,
    TeSuccessUpdate,
    TeSuccessDelete,
    TeBadRequest,
    TeAuthIssue,
    TeNotFound,
    TeInternalError,
    // CRM
    CdsBadRequest,
    CdsConnectivityIssue,
    CdsNotFound,
    CdsInternalError,
    CdsCorruptedData,
}

impl BusinessEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessEvent::Launch => "LAUNCH",
            BusinessEvent::NotWhitelistedUrlCall => "NOT_WHITELISTED_URL_CALL",
            BusinessEvent::TeSuccessCreate => "CBS_TE_SUCC_CREATE",
            BusinessEvent::TeSuccessUpdate => "CBS_TE_SUCC_UPDATE",
            BusinessEvent::TeSuccessDelete => "CBS_TE_SUCC_DELETE",
            BusinessEvent::TeBadRequest => "CBS_TE_BAD_REQUEST",
            BusinessEvent::TeAuthIssue => "CBS_TE_AUTH_ISSUE",
            BusinessEvent::TeNotFound => "CBS_TE_NOT_FOUND",
            BusinessEvent::TeInternalError => "CBS_TE_INTERNAL_ERROR",
            BusinessEvent::CdsBadRequest => "CBS_CDS_BAD_REQUEST",
            BusinessEvent::CdsConnectivityIssue => "CBS_CDS_CONNECTIVITY_ISSUE",
            BusinessEvent::CdsNotFound => "CBS_CDS_NOT_FOUND",
            BusinessEvent::CdsInternalError => "CBS_CDS_INTERNAL_ERROR",
            BusinessEvent::CdsCorruptedData => "CBS_CDS_CORRUPTED_DATA",
        }
    }

    /// Event for a failed SARAS call, if its status has one.
    pub fn for_saras_status(status: Option<u16>) -> Option<Self> {
        match status? {
            400 => Some(BusinessEvent::TeBadRequest),
            401 => Some(BusinessEvent::TeAuthIssue),
            404 => Some(BusinessEvent::TeNotFound),
            500 => Some(BusinessEvent::TeInternalError),
            _ => None,
        }
    }

    /// Event for a failed CRM call, if its status has one.
    pub fn for_crm_status(status: Option<u16>) -> Option<Self> {
        match status? {
            400 => Some(BusinessEvent::CdsBadRequest),
            401 | 403 => Some(BusinessEvent::CdsConnectivityIssue),
            404 => Some(BusinessEvent::CdsNotFound),
            500 => Some(BusinessEvent::CdsInternalError),
            _ => None,
        }
    }
}

impl fmt::Display for BusinessEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log a business event at info level.
pub fn emit(event: BusinessEvent, message: &str) {
    tracing::info!(event = event.as_str(), "{message}");
}

/// Log the status-derived SARAS event, if any.
pub fn emit_saras_status(status: Option<u16>) {
    if let Some(event) = BusinessEvent::for_saras_status(status) {
        emit(event, "SARAS request failed");
    }
}

/// Log the status-derived CRM event, if any.
pub fn emit_crm_status(status: Option<u16>) {
    if let Some(event) = BusinessEvent::for_crm_status(status) {
        emit(event, "CRM request failed");
    }
}
