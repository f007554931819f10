pub mod release;

pub use release::{AppMetadata, Release};

use crate::error::{Result, UpdaterError};
use crate::utils::json::JsonUtils;
use serde_json::{Map, Value};

pub const APPS_KEY: &str = "apps";
pub const BUNDLE_IDENTIFIER_KEY: &str = "bundleIdentifier";

/// The whole sources document. Unknown fields are kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    document: Map<String, Value>,
}

impl Catalog {
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(document) => {
                if let Some(apps) = document.get(APPS_KEY) {
                    if !apps.is_array() {
                        return Err(UpdaterError::Parse(format!(
                            "`{}` must be an array, found {}",
                            APPS_KEY,
                            JsonUtils::kind(apps)
                        )));
                    }
                }
                Ok(Self { document })
            }
            other => Err(UpdaterError::Parse(format!(
                "top level must be an object, found {}",
                JsonUtils::kind(&other)
            ))),
        }
    }

    /// Declared schema version, if it is readable as an integer.
    pub fn schema_version(&self) -> Option<i64> {
        self.document.get("version").and_then(JsonUtils::as_integer)
    }

    pub fn ensure_schema_at_least(&self, minimum: i64) -> Result<()> {
        match self.schema_version() {
            Some(version) if version >= minimum => Ok(()),
            Some(version) => Err(UpdaterError::UnsupportedSchema(format!("v{}", version))),
            None => Err(UpdaterError::UnsupportedSchema(
                self.document
                    .get("version")
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "no version".to_string()),
            )),
        }
    }

    pub fn apps(&self) -> &[Value] {
        self.document
            .get(APPS_KEY)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First app whose bundle identifier matches. An unset identifier matches nothing.
    pub fn find_app_mut(
        &mut self,
        bundle_identifier: Option<&str>,
    ) -> Result<&mut Map<String, Value>> {
        let not_found = || UpdaterError::AppNotFound(bundle_identifier.map(str::to_string));
        let bundle_identifier = bundle_identifier.ok_or_else(not_found)?;
        self.document
            .get_mut(APPS_KEY)
            .and_then(Value::as_array_mut)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object_mut)
            .find(|app| {
                app.get(BUNDLE_IDENTIFIER_KEY).and_then(Value::as_str) == Some(bundle_identifier)
            })
            .ok_or_else(not_found)
    }

    /// Bundle identifier of an app entry, empty when the entry has none.
    pub fn bundle_identifier_of(app: &Map<String, Value>) -> String {
        app.get(BUNDLE_IDENTIFIER_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// Pretty JSON with two-space indentation; non-ASCII stays unescaped.
    pub fn render(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.document)?)
    }
}
