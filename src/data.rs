use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::schema::ColumnDescriptor;

/// A single cell value with its tag carried through the whole pipeline.
///
/// Date, time, and datetime cells keep their original text as
/// [`Value::String`]; no timezone or calendar normalization is performed.
/// [`Value::Null`] marks a cell that was absent from its row, as opposed to
/// an empty string that was actually present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Null,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl Value {
    pub fn empty() -> Self {
        Value::String(String::new())
    }

    /// True for absent cells and empty strings alike.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => {
                if f.fract() == 0.0 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            Value::Boolean(b) => b.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// One parsed row, shaped by [`RowMode`](crate::RowMode).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Row {
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Row {
    /// Value at `index` (array mode) or under the column name owning `index`
    /// (object mode), if present.
    pub fn get<'a>(&'a self, index: usize, columns: &[ColumnDescriptor]) -> Option<&'a Value> {
        match self {
            Row::Array(values) => values.get(index),
            Row::Object(map) => columns.get(index).and_then(|c| map.get(&c.name)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Row::Array(values) => values.len(),
            Row::Object(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The cumulative outcome of a parse: ordered column descriptors, the header
/// row text (empty when headers are disabled), and the parsed rows.
///
/// Every row covers every header entry, padded with empty strings where the
/// source row was short; rows may additionally carry synthesized `column_N`
/// cells beyond the header's width.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParseResult {
    pub columns: Vec<ColumnDescriptor>,
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl ParseResult {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }
}
