//! Tera rendering engine for FetchXML queries.
//!
//! | Query                      | Used for organisation |
//! |----------------------------|-----------------------|
//! | `CorrespondingDvsaResults` | DVSA                  |
//! | `CorrespondingDvaResults`  | DVA                   |
//!
//! Template names end in `.xml`, so Tera escapes every injected value.

use tera::Tera;

use booksync_core::Organisation;

use crate::context::QueryContext;
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    (
        "fetchxml/corresponding_dvsa_results.xml",
        include_str!("templates/corresponding_dvsa_results.xml.tera"),
    ),
    (
        "fetchxml/corresponding_dva_results.xml",
        include_str!("templates/corresponding_dva_results.xml.tera"),
    ),
];

fn build_tera() -> Result<Tera, RenderError> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TPLS.iter().copied())?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// QueryKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    CorrespondingDvsaResults,
    CorrespondingDvaResults,
}

impl QueryKind {
    pub fn all() -> &'static [QueryKind] {
        &[
            QueryKind::CorrespondingDvsaResults,
            QueryKind::CorrespondingDvaResults,
        ]
    }

    pub fn for_organisation(organisation: Organisation) -> Self {
        match organisation {
            Organisation::Dva => QueryKind::CorrespondingDvaResults,
            Organisation::Dvsa => QueryKind::CorrespondingDvsaResults,
        }
    }

    pub fn template_name(&self) -> &'static str {
        match self {
            QueryKind::CorrespondingDvsaResults => "fetchxml/corresponding_dvsa_results.xml",
            QueryKind::CorrespondingDvaResults => "fetchxml/corresponding_dva_results.xml",
        }
    }
}

// ---------------------------------------------------------------------------
// QueryRenderer
// ---------------------------------------------------------------------------

/// Renders FetchXML from embedded templates. Build once per run and reuse.
pub struct QueryRenderer {
    tera: Tera,
}

impl QueryRenderer {
    pub fn new() -> Result<Self, RenderError> {
        Ok(QueryRenderer { tera: build_tera()? })
    }

    pub fn render(&self, kind: QueryKind, ctx: &QueryContext) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        Ok(self.tera.render(kind.template_name(), &tera_ctx)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
