use crate::config::{ReleaseInput, ReleaseTrack};
use serde::Serialize;

/// One published build inside an app's release history.
///
/// Field order is the order written to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub version: String,
    pub date: String,
    pub localized_description: String,
    #[serde(rename = "downloadURL")]
    pub download_url: String,
    pub size: u64,
    pub sha256: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta: Option<bool>,
    #[serde(rename = "commitID", skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
}

impl Release {
    /// Stable channel releases never carry a commit id.
    pub fn from_input(input: &ReleaseInput) -> Self {
        let (beta, commit_id) = match &input.track {
            ReleaseTrack::Channel { .. } if input.track.is_stable_channel() => (None, None),
            ReleaseTrack::Channel { .. } => (None, input.track.commit_id().map(str::to_string)),
            ReleaseTrack::BetaFlag { beta, commit_id } => (Some(*beta), Some(commit_id.clone())),
        };

        Self {
            version: input.version.clone(),
            date: input.version_date.clone(),
            localized_description: input.localized_description.clone(),
            download_url: input.download_url.clone(),
            size: input.size,
            sha256: input.sha256.clone(),
            beta,
            commit_id,
        }
    }
}

/// Top-level fields an app shows on the catalog's front page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppMetadata {
    pub version: String,
    pub version_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta: Option<bool>,
    #[serde(rename = "commitID", skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
    pub size: u64,
    pub sha256: String,
    pub localized_description: String,
    #[serde(rename = "downloadURL")]
    pub download_url: String,
}

impl AppMetadata {
    pub fn from_input(input: &ReleaseInput) -> Self {
        let (beta, commit_id) = match &input.track {
            ReleaseTrack::Channel { .. } => (None, None),
            ReleaseTrack::BetaFlag { beta, commit_id } => (Some(*beta), Some(commit_id.clone())),
        };

        Self {
            version: input.version.clone(),
            version_date: input.version_date.clone(),
            beta,
            commit_id,
            size: input.size,
            sha256: input.sha256.clone(),
            localized_description: input.localized_description.clone(),
            download_url: input.download_url.clone(),
        }
    }
}
