use crate::agents::update::handlers::ReleaseHandler;
use crate::agents::update::report::{HistoryChange, UpdateReport};
use crate::config::ReleaseInput;
use crate::error::Result;
use crate::sources::{AppMetadata, Catalog, Release};
use crate::utils::json::JsonUtils;
use serde_json::{Map, Value};

pub const VERSIONS_KEY: &str = "versions";

/// Writes a release into the flat `versions` list.
///
/// A new version/beta pair is prepended. Re-publishing the pair already at
/// the top overwrites it, so repeated runs stay idempotent. Front-page
/// metadata is always overwritten.
pub struct BetaHandler<'a> {
    input: &'a ReleaseInput,
}

impl<'a> BetaHandler<'a> {
    pub fn new(input: &'a ReleaseInput) -> Self {
        Self { input }
    }

    fn is_same_build(top: &Value, release: &Release) -> bool {
        top.get("version").and_then(Value::as_str) == Some(release.version.as_str())
            && top.get("beta").and_then(Value::as_bool) == release.beta
    }
}

impl ReleaseHandler for BetaHandler<'_> {
    fn apply(&self, app: &mut Map<String, Value>) -> Result<UpdateReport> {
        let bundle_identifier = Catalog::bundle_identifier_of(app);
        let release = Release::from_input(self.input);

        JsonUtils::ensure_array(app, VERSIONS_KEY, &bundle_identifier)?;

        let metadata = JsonUtils::to_object(&AppMetadata::from_input(self.input))?;
        JsonUtils::merge_fields(app, metadata);

        let versions = JsonUtils::ensure_array(app, VERSIONS_KEY, &bundle_identifier)?;
        let same_build = versions
            .first()
            .is_some_and(|top| Self::is_same_build(top, &release));
        let entry = serde_json::to_value(&release)?;

        let history = if same_build {
            versions[0] = entry;
            HistoryChange::ReplacedSameBuild
        } else {
            versions.insert(0, entry);
            HistoryChange::Inserted
        };

        Ok(UpdateReport {
            bundle_identifier,
            version: self.input.version.clone(),
            metadata_updated: true,
            history,
            history_len: versions.len(),
        })
    }
}
