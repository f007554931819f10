use crate::cli::Variant;
use crate::error::{Result, UpdaterError};
use jiff::Timestamp;

pub const STABLE_CHANNEL: &str = "stable";

pub const VERSION_IPA: &str = "VERSION_IPA";
pub const VERSION_DATE: &str = "VERSION_DATE";
pub const RELEASE_CHANNEL: &str = "RELEASE_CHANNEL";
pub const BETA: &str = "BETA";
pub const COMMIT_ID: &str = "COMMIT_ID";
pub const SIZE: &str = "SIZE";
pub const SHA256: &str = "SHA256";
pub const LOCALIZED_DESCRIPTION: &str = "LOCALIZED_DESCRIPTION";
pub const DOWNLOAD_URL: &str = "DOWNLOAD_URL";
pub const BUNDLE_IDENTIFIER: &str = "BUNDLE_IDENTIFIER";

/// Placeholder values for the beta variant, used for local dry runs.
mod beta_defaults {
    pub const VERSION_IPA: &str = "0.0.0";
    pub const VERSION_DATE: &str = "2000-12-18T00:00:00Z";
    pub const BETA: &str = "true";
    pub const COMMIT_ID: &str = "1234567";
    pub const SIZE: &str = "0";
    pub const SHA256: &str = "";
    pub const LOCALIZED_DESCRIPTION: &str = "Invalid Update";
    pub const DOWNLOAD_URL: &str =
        "https://github.com/SideStore/SideStore/releases/download/0.0.0/SideStore.ipa";
    pub const BUNDLE_IDENTIFIER: &str = "com.SideStore.SideStore";

    pub fn for_name(name: &str) -> Option<&'static str> {
        let value = match name {
            super::VERSION_IPA => VERSION_IPA,
            super::VERSION_DATE => VERSION_DATE,
            super::BETA => BETA,
            super::COMMIT_ID => COMMIT_ID,
            super::SIZE => SIZE,
            super::SHA256 => SHA256,
            super::LOCALIZED_DESCRIPTION => LOCALIZED_DESCRIPTION,
            super::DOWNLOAD_URL => DOWNLOAD_URL,
            super::BUNDLE_IDENTIFIER => BUNDLE_IDENTIFIER,
            _ => return None,
        };
        Some(value)
    }
}

/// Where the release lands in the app's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseTrack {
    /// Named channel inside `releaseChannels`. The name is already lower-cased.
    Channel {
        name: String,
        commit_id: Option<String>,
    },
    /// Flat `versions` list tagged with a beta flag.
    BetaFlag { beta: bool, commit_id: String },
}

impl ReleaseTrack {
    pub fn is_stable_channel(&self) -> bool {
        matches!(self, ReleaseTrack::Channel { name, .. } if name == STABLE_CHANNEL)
    }

    pub fn commit_id(&self) -> Option<&str> {
        match self {
            ReleaseTrack::Channel { commit_id, .. } => commit_id.as_deref(),
            ReleaseTrack::BetaFlag { commit_id, .. } => Some(commit_id),
        }
    }
}

/// Everything known about the freshly published build, validated once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInput {
    pub version: String,
    pub version_date: String,
    pub track: ReleaseTrack,
    pub size: u64,
    pub sha256: String,
    pub localized_description: String,
    pub download_url: String,
    /// Unset only in the channel variant; such a run matches no app.
    pub bundle_identifier: Option<String>,
}

impl ReleaseInput {
    /// Build the input from the process environment.
    pub fn from_env(variant: Variant) -> Result<Self> {
        Self::from_lookup(variant, |name| std::env::var(name).ok())
    }

    /// Build the input from an arbitrary variable lookup.
    pub fn from_lookup<F>(variant: Variant, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let reader = EnvReader::new(lookup);
        match variant {
            Variant::Channel => Self::channel_input(reader),
            Variant::Beta => Self::beta_input(reader),
        }
    }

    fn channel_input<F>(mut reader: EnvReader<F>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let version = reader.required(VERSION_IPA);
        let version_date = reader.required(VERSION_DATE);
        let channel = reader.required(RELEASE_CHANNEL);
        let size = reader.required(SIZE);
        let sha256 = reader.required(SHA256);
        let localized_description = reader.required(LOCALIZED_DESCRIPTION);
        let download_url = reader.required(DOWNLOAD_URL);
        let bundle_identifier = reader.optional(BUNDLE_IDENTIFIER);
        let commit_id = reader.optional(COMMIT_ID);
        reader.finish()?;

        let size = parse_size(&size)?;
        let name = channel.to_lowercase();
        if name != STABLE_CHANNEL && commit_id.is_none() {
            return Err(UpdaterError::MissingCommitId(name));
        }

        Ok(Self {
            version,
            version_date,
            track: ReleaseTrack::Channel { name, commit_id },
            size,
            sha256,
            localized_description,
            download_url,
            bundle_identifier,
        })
    }

    fn beta_input<F>(reader: EnvReader<F>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let beta = reader
            .with_default(BETA, beta_defaults::BETA)
            .eq_ignore_ascii_case("true");
        let size = parse_size(&reader.with_default(SIZE, beta_defaults::SIZE))?;

        Ok(Self {
            version: reader.with_default(VERSION_IPA, beta_defaults::VERSION_IPA),
            version_date: reader.with_default(VERSION_DATE, beta_defaults::VERSION_DATE),
            track: ReleaseTrack::BetaFlag {
                beta,
                commit_id: reader.with_default(COMMIT_ID, beta_defaults::COMMIT_ID),
            },
            size,
            sha256: reader.with_default(SHA256, beta_defaults::SHA256),
            localized_description: reader
                .with_default(LOCALIZED_DESCRIPTION, beta_defaults::LOCALIZED_DESCRIPTION),
            download_url: reader.with_default(DOWNLOAD_URL, beta_defaults::DOWNLOAD_URL),
            bundle_identifier: Some(
                reader.with_default(BUNDLE_IDENTIFIER, beta_defaults::BUNDLE_IDENTIFIER),
            ),
        })
    }

    /// Every recognised variable with its raw value, beta placeholders applied.
    /// Built before validation so a broken run still shows what it received.
    pub fn parameter_list<F>(variant: Variant, lookup: F) -> Vec<(&'static str, Option<String>)>
    where
        F: Fn(&str) -> Option<String>,
    {
        let track_label = match variant {
            Variant::Channel => ("ReleaseChannel", RELEASE_CHANNEL),
            Variant::Beta => ("Beta", BETA),
        };
        let fields = [
            ("Version", VERSION_IPA),
            ("Version Date", VERSION_DATE),
            track_label,
            ("Commit ID", COMMIT_ID),
            ("Size", SIZE),
            ("Sha256", SHA256),
            ("Localized Description", LOCALIZED_DESCRIPTION),
            ("Download URL", DOWNLOAD_URL),
            ("Bundle Identifier", BUNDLE_IDENTIFIER),
        ];

        fields
            .into_iter()
            .map(|(label, name)| {
                let value = match variant {
                    Variant::Channel => lookup(name),
                    Variant::Beta => lookup(name)
                        .or_else(|| beta_defaults::for_name(name).map(str::to_string)),
                };
                (label, value)
            })
            .collect()
    }

    pub fn parameter_list_from_env(variant: Variant) -> Vec<(&'static str, Option<String>)> {
        Self::parameter_list(variant, |name| std::env::var(name).ok())
    }

    /// Warn when the date is not an RFC 3339 timestamp. The catalog stores it
    /// as free text, so this never fails the run.
    pub fn version_date_warning(&self) -> Option<String> {
        match self.version_date.parse::<Timestamp>() {
            Ok(_) => None,
            Err(e) => Some(format!(
                "{} '{}' is not an RFC 3339 timestamp: {}",
                VERSION_DATE, self.version_date, e
            )),
        }
    }
}

fn parse_size(raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| UpdaterError::ParameterFormat {
            name: SIZE,
            reason: format!("'{}' is not a non-negative integer ({})", raw, e),
        })
}

/// Collects every missing variable so a single error names all of them.
struct EnvReader<F> {
    lookup: F,
    missing: Vec<&'static str>,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn new(lookup: F) -> Self {
        Self {
            lookup,
            missing: Vec::new(),
        }
    }

    fn required(&mut self, name: &'static str) -> String {
        match (self.lookup)(name) {
            Some(value) => value,
            None => {
                self.missing.push(name);
                String::new()
            }
        }
    }

    fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
    }

    fn with_default(&self, name: &str, default: &str) -> String {
        (self.lookup)(name).unwrap_or_else(|| default.to_string())
    }

    fn finish(self) -> Result<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(UpdaterError::MissingParameter(self.missing))
        }
    }
}
