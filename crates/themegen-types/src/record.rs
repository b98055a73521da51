//! Source rows and the rows written to the destination.

use serde::{Deserialize, Serialize};

/// Opaque record identifier taken from the source's id column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Create a new record identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S: Into<String>> From<S> for RecordId {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

/// One row fetched from the source, immutable once constructed.
///
/// `id` is `None` when the source row's id column is absent or NULL;
/// such records are failed by the enricher before any model call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub id: Option<RecordId>,
    /// Field name to scalar value, in the source's column order.
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl SourceRecord {
    /// Construct a record with an id.
    #[must_use]
    pub fn new(id: impl Into<RecordId>, fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            id: Some(id.into()),
            fields,
        }
    }

    /// Construct a record whose source row had no usable id.
    #[must_use]
    pub fn without_id(fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { id: None, fields }
    }
}

/// The unit written to the destination, 1:1 from each enriched record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub id: RecordId,
    /// The generated themes serialized as a JSON array of strings.
    pub themes_json: String,
}

impl CommitRecord {
    /// Build a commit row from an id and its generated themes.
    #[must_use]
    pub fn new(id: RecordId, themes: &[String]) -> Self {
        let themes_json =
            serde_json::to_string(themes).expect("a string array always serializes");
        Self { id, themes_json }
    }
}
