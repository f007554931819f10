use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpdaterError {
    #[error("Missing required parameter(s): {}", .0.join(", "))]
    MissingParameter(Vec<&'static str>),

    #[error("Invalid value for {name}: {reason}")]
    ParameterFormat { name: &'static str, reason: String },

    #[error("Failed to read sources file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse sources file: {0}")]
    Parse(String),

    #[error("Only v2 and above are supported for direct updates to sources.json (found {0})")]
    UnsupportedSchema(String),

    #[error("COMMIT_ID must be set when release channel is '{0}' (only 'stable' may omit it)")]
    MissingCommitId(String),

    #[error("{}", describe_missing_app(.0.as_deref()))]
    AppNotFound(Option<String>),

    #[error("Failed to write sources file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, UpdaterError>;

fn describe_missing_app(bundle_identifier: Option<&str>) -> String {
    match bundle_identifier {
        Some(id) => format!("No app with bundle identifier '{}' found", id),
        None => "No app with the specified bundle identifier found (BUNDLE_IDENTIFIER is not set)"
            .to_string(),
    }
}
