//! # booksync-renderer
//!
//! Tera-based rendering of the FetchXML queries the CRM gateway sends for
//! test-history lookups.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use booksync_core::{Organisation, TestType};
//! use booksync_renderer::{QueryContext, QueryKind, QueryRenderer};
//!
//! fn query(candidate: &str) -> Option<String> {
//!     let renderer = QueryRenderer::new().ok()?;
//!     let ctx = QueryContext::new(candidate, TestType::LGV_MULTIPLE_CHOICE);
//!     renderer
//!         .render(QueryKind::for_organisation(Organisation::Dvsa), &ctx)
//!         .ok()
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::QueryContext;
pub use engine::{QueryKind, QueryRenderer};
pub use error::RenderError;
