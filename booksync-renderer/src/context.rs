//! Query context: the values injected into a FetchXML template.

use serde::Serialize;

use booksync_core::codes::{remit, test_status};
use booksync_core::TestType;

use crate::error::RenderError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryContext {
    pub candidate_id: String,
    /// Counterpart test-engine test type being looked up.
    pub test_type: i64,
    pub status_pass: i64,
    pub dva_remit: i64,
}

impl QueryContext {
    pub fn new(candidate_id: impl Into<String>, test_type: TestType) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            test_type: test_type.code(),
            status_pass: test_status::PASSED,
            dva_remit: remit::DVA,
        }
    }

    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}
