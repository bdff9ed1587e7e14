use core::fmt;
use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

pub type Fields = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document {0} does not exist")]
    NotFound(String),

    #[error("Document {0} already exists")]
    AlreadyExists(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Invalid document path: {0}")]
    InvalidPath(String),

    #[error("Failed to convert document: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Address of a single document, `collection/id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath {
    pub collection: String,
    pub id: String,
}

impl DocPath {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn parse(path: &str) -> Result<Self, StoreError> {
        match path.split_once('/') {
            Some((collection, id))
                if !collection.is_empty() && !id.is_empty() && !id.contains('/') =>
            {
                Ok(Self::new(collection, id))
            }
            _ => Err(StoreError::InvalidPath(path.to_string())),
        }
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        let value = Value::Object(self.fields.clone());
        Ok(serde_json::from_value(value)?)
    }
}

/// Serializes a record into the field map the store persists.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Transport(format!(
            "Expected an object document, got {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

impl FieldFilter {
    pub fn matches(&self, fields: &Fields) -> bool {
        fields.get(&self.field) == Some(&self.value)
    }
}

/// Collection query: one equality filter, one descending order and a limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Option<FieldFilter>,
    pub order_desc: Option<String>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filter = Some(FieldFilter {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn order_desc(mut self, field: &str) -> Self {
        self.order_desc = Some(field.to_string());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn limit_opt(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Evaluates the query against an unordered set of documents.
    pub fn apply<'a, I>(&self, documents: I) -> Vec<Document>
    where
        I: IntoIterator<Item = (&'a String, &'a Fields)>,
    {
        let mut rows: Vec<Document> = documents
            .into_iter()
            .filter(|(_, fields)| self.filter.as_ref().is_none_or(|f| f.matches(fields)))
            .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
            .collect();

        if let Some(field) = &self.order_desc {
            rows.sort_by(|a, b| {
                compare_values(b.fields.get(field), a.fields.get(field))
                    .then_with(|| a.id.cmp(&b.id))
            });
        }

        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }

        rows
    }
}

/// Orders field values the way the provider does for mixed documents:
/// missing < null < bool < number < timestamp/string.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None => 0,
            Some(Value::Null) => 1,
            Some(Value::Bool(_)) => 2,
            Some(Value::Number(_)) => 3,
            Some(Value::String(_)) => 4,
            Some(Value::Array(_)) => 5,
            Some(Value::Object(_)) => 6,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (parse_timestamp(x), parse_timestamp(y)) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok()
}

/// Result of a non-atomic bulk delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub deleted: usize,
    pub failed: Vec<String>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
