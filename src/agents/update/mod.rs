// Release merge - folds one published build into the catalog.
//
// - report: UpdateReport describing what changed on the matched app
// - handlers: one ReleaseHandler per release-history layout
pub mod handlers;
pub mod report;

pub use report::UpdateReport;

use crate::config::ReleaseInput;
use crate::error::Result;
use crate::sources::Catalog;

/// Run the handler for `input` against the first app with its bundle identifier.
///
/// Only that app is modified. On error the catalog may be partially edited in
/// memory and must not be written.
pub fn apply_release(catalog: &mut Catalog, input: &ReleaseInput) -> Result<UpdateReport> {
    let handler = handlers::handler_for(input);
    handler.check_catalog(catalog)?;
    let app = catalog.find_app_mut(input.bundle_identifier.as_deref())?;
    handler.apply(app)
}
