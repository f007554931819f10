use std::fmt;

/// What happened to the app's release history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryChange {
    /// The channel had no releases; it now holds only the new one.
    CreatedChannel { channel: String },
    /// The newest release of the channel was overwritten.
    ReplacedLatest {
        channel: String,
        previous_version: Option<String>,
    },
    /// A new release was prepended to `versions`.
    Inserted,
    /// `versions[0]` already described this version/beta pair and was refreshed.
    ReplacedSameBuild,
}

impl fmt::Display for HistoryChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryChange::CreatedChannel { channel } => {
                write!(f, "created release channel '{}'", channel)
            }
            HistoryChange::ReplacedLatest {
                channel,
                previous_version: Some(previous),
            } => write!(f, "replaced latest '{}' release (was {})", channel, previous),
            HistoryChange::ReplacedLatest { channel, .. } => {
                write!(f, "replaced latest '{}' release", channel)
            }
            HistoryChange::Inserted => f.write_str("inserted new release at the top of versions"),
            HistoryChange::ReplacedSameBuild => {
                f.write_str("refreshed existing entry for the same build")
            }
        }
    }
}

/// Tracks the changes made to the matched app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub bundle_identifier: String,
    pub version: String,
    pub metadata_updated: bool,
    pub history: HistoryChange,
    /// Number of releases in the touched history after the update.
    pub history_len: usize,
}

impl UpdateReport {
    /// True when the update added an entry instead of overwriting one.
    pub fn grew_history(&self) -> bool {
        matches!(
            self.history,
            HistoryChange::CreatedChannel { .. } | HistoryChange::Inserted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_replacements() {
        let change = HistoryChange::ReplacedLatest {
            channel: "beta".into(),
            previous_version: Some("0.5.0".into()),
        };
        assert_eq!(change.to_string(), "replaced latest 'beta' release (was 0.5.0)");
    }

    #[test]
    fn growth_only_for_new_entries() {
        let mut report = UpdateReport {
            bundle_identifier: "com.Foo.Bar".into(),
            version: "1.0".into(),
            metadata_updated: true,
            history: HistoryChange::Inserted,
            history_len: 2,
        };
        assert!(report.grew_history());
        report.history = HistoryChange::ReplacedSameBuild;
        assert!(!report.grew_history());
    }
}
