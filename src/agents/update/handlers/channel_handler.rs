use crate::agents::update::handlers::ReleaseHandler;
use crate::agents::update::report::{HistoryChange, UpdateReport};
use crate::config::ReleaseInput;
use crate::error::{Result, UpdaterError};
use crate::sources::{AppMetadata, Catalog, Release};
use crate::utils::json::JsonUtils;
use serde_json::{Map, Value};

pub const RELEASE_CHANNELS_KEY: &str = "releaseChannels";

/// Oldest schema that has `releaseChannels`.
pub const MIN_SCHEMA_VERSION: i64 = 2;

/// Writes a release into `releaseChannels.<channel>`.
///
/// The channel's newest entry is always overwritten, so history never grows
/// through this handler. Front-page metadata only follows the stable channel.
pub struct ChannelHandler<'a> {
    input: &'a ReleaseInput,
    channel: &'a str,
}

impl<'a> ChannelHandler<'a> {
    pub fn new(input: &'a ReleaseInput, channel: &'a str) -> Self {
        Self { input, channel }
    }
}

impl ReleaseHandler for ChannelHandler<'_> {
    fn check_catalog(&self, catalog: &Catalog) -> Result<()> {
        catalog.ensure_schema_at_least(MIN_SCHEMA_VERSION)
    }

    fn apply(&self, app: &mut Map<String, Value>) -> Result<UpdateReport> {
        let bundle_identifier = Catalog::bundle_identifier_of(app);
        let release = serde_json::to_value(Release::from_input(self.input))?;

        // A malformed history must fail before metadata is edited.
        JsonUtils::ensure_object(app, RELEASE_CHANNELS_KEY, &bundle_identifier)?;

        let metadata_updated = self.input.track.is_stable_channel();
        if metadata_updated {
            let metadata = JsonUtils::to_object(&AppMetadata::from_input(self.input))?;
            JsonUtils::merge_fields(app, metadata);
        }

        let channels = JsonUtils::ensure_object(app, RELEASE_CHANNELS_KEY, &bundle_identifier)?;
        let (history, history_len) = match channels.get_mut(self.channel) {
            Some(Value::Array(releases)) if !releases.is_empty() => {
                let previous_version = releases[0]
                    .get("version")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                releases[0] = release;
                (
                    HistoryChange::ReplacedLatest {
                        channel: self.channel.to_string(),
                        previous_version,
                    },
                    releases.len(),
                )
            }
            Some(other) if !other.is_null() && !other.is_array() => {
                return Err(UpdaterError::Parse(format!(
                    "`{}.{}` of '{}' must be an array, found {}",
                    RELEASE_CHANNELS_KEY,
                    self.channel,
                    bundle_identifier,
                    JsonUtils::kind(other)
                )));
            }
            _ => {
                channels.insert(self.channel.to_string(), Value::Array(vec![release]));
                (
                    HistoryChange::CreatedChannel {
                        channel: self.channel.to_string(),
                    },
                    1,
                )
            }
        };

        Ok(UpdateReport {
            bundle_identifier,
            version: self.input.version.clone(),
            metadata_updated,
            history,
            history_len,
        })
    }
}
