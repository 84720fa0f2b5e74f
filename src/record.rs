use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{Result, ShowcaseError};

/// Field names the showcase and dashboard know about.
///
/// Records may carry any other column too; these are just the ones the
/// rendering and analytics code look at.
pub mod fields {
    pub const NAME: &str = "Name";
    pub const TYPE: &str = "Type";
    pub const DESCRIPTION: &str = "Description";
    pub const VIDEO_LINK: &str = "Video Link";
    pub const MATERIALS: &str = "Materials";
    pub const SOFTWARE: &str = "Software";
    pub const CODE: &str = "Code";

    /// Recognised columns in display/export order.
    pub const ALL: [&str; 7] = [NAME, TYPE, DESCRIPTION, VIDEO_LINK, MATERIALS, SOFTWARE, CODE];
}

/// JSON key of the spreadsheet row number attached by the script endpoint.
pub const ROW_KEY: &str = "_row";

/// One project, as a map from column name to text.
///
/// `row` is the `_row` value handed out by the script endpoint, kept exactly as
/// received and written back unchanged. Only a positive integer can address a
/// spreadsheet row; see [`ProjectRecord::row`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ProjectRecord {
    fields: BTreeMap<String, String>,
    row: Option<Value>,
}

impl ProjectRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from `(column, value)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            row: None,
        }
    }

    pub fn with_row(mut self, row: u32) -> Self {
        self.row = Some(Value::from(row));
        self
    }

    /// Spreadsheet row usable for update/delete.
    ///
    /// `None` when `_row` is missing or is not a positive integer (a numeric
    /// string or a whole float such as `3.0` still counts).
    pub fn row(&self) -> Option<u32> {
        self.row.as_ref().and_then(row_key)
    }

    /// `_row` as the endpoint sent it.
    pub fn raw_row(&self) -> Option<&Value> {
        self.row.as_ref()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Value of `field`, or `""` when the column is absent.
    pub fn field(&self, field: &str) -> &str {
        self.get(field).unwrap_or("")
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn name(&self) -> &str {
        self.field(fields::NAME)
    }

    /// The `Type` column.
    pub fn kind(&self) -> &str {
        self.field(fields::TYPE)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// JSON object with every field as a string plus `_row` when present.
    pub fn to_json_map(&self) -> Map<String, Value> {
        let mut map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        if let Some(row) = &self.row {
            map.insert(ROW_KEY.to_string(), row.clone());
        }
        map
    }
}

impl From<Map<String, Value>> for ProjectRecord {
    fn from(map: Map<String, Value>) -> Self {
        let mut record = ProjectRecord::new();
        for (key, value) in map {
            match value {
                Value::Null => {}
                row if key == ROW_KEY => record.row = Some(row),
                Value::String(s) => record.set(key, s),
                other => record.set(key, other.to_string()),
            }
        }
        record
    }
}

/// A list entry from the script endpoint; anything but an object is malformed.
impl TryFrom<Value> for ProjectRecord {
    type Error = ShowcaseError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(map.into()),
            other => Err(ShowcaseError::MalformedData(format!(
                "expected a project object, got {other}"
            ))),
        }
    }
}

impl From<ProjectRecord> for Map<String, Value> {
    fn from(record: ProjectRecord) -> Self {
        record.to_json_map()
    }
}

fn row_key(value: &Value) -> Option<u32> {
    let row = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 1.0 && *f <= f64::from(u32::MAX))
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    row.and_then(|r| u32::try_from(r).ok()).filter(|&r| r > 0)
}
