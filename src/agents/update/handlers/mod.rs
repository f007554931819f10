// Merge strategies, one per release-history layout.
//
// Both run against a single app that the caller has already located, so the
// lookup and persistence steps stay shared.

pub mod beta_handler;
pub mod channel_handler;

pub use beta_handler::BetaHandler;
pub use channel_handler::ChannelHandler;

use crate::agents::update::report::UpdateReport;
use crate::config::{ReleaseInput, ReleaseTrack};
use crate::error::Result;
use crate::sources::Catalog;
use serde_json::{Map, Value};

pub trait ReleaseHandler {
    /// Document-level checks, run before any app is looked up.
    fn check_catalog(&self, _catalog: &Catalog) -> Result<()> {
        Ok(())
    }

    /// Merge the release into the matched app.
    fn apply(&self, app: &mut Map<String, Value>) -> Result<UpdateReport>;
}

/// Picks the strategy matching the input's release track.
pub fn handler_for(input: &ReleaseInput) -> Box<dyn ReleaseHandler + '_> {
    match &input.track {
        ReleaseTrack::Channel { name, .. } => Box::new(ChannelHandler::new(input, name)),
        ReleaseTrack::BetaFlag { .. } => Box::new(BetaHandler::new(input)),
    }
}
