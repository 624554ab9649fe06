use serde::{Deserialize, Serialize};

pub const DEFAULT_DELIMITER: char = ',';
pub const DEFAULT_QUOTE: char = '"';
pub const DEFAULT_COMMENT: &str = "#";

/// Shape of each row in a [`ParseResult`](crate::ParseResult).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowMode {
    /// Rows are ordered sequences of values.
    #[default]
    Array,
    /// Rows are maps from column name to value.
    Object,
}

/// Format templates used for date/time/datetime detection. Tokens: `YYYY`
/// (4 digits), `MM`/`DD`/`HH`/`mm`/`ss` (2 digits), `SSS` (3 digits); every
/// other character matches literally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFormats {
    pub date: Vec<String>,
    pub time: Vec<String>,
    pub datetime: Vec<String>,
}

impl Default for DateFormats {
    fn default() -> Self {
        Self {
            date: vec![
                "YYYY-MM-DD".into(),
                "DD/MM/YYYY".into(),
                "MM/DD/YYYY".into(),
            ],
            time: vec!["HH:mm:ss".into(), "HH:mm".into(), "HH:mm:ss.SSS".into()],
            datetime: vec![
                "YYYY-MM-DDTHH:mm:ss".into(),
                "YYYY-MM-DD HH:mm:ss".into(),
                "YYYY-MM-DDTHH:mm:ssZ".into(),
            ],
        }
    }
}

/// Configuration shared by batch and streaming parsing.
///
/// `date_formats: None` disables date/time/datetime detection entirely; such
/// values classify as strings. An empty `comment` string disables comment
/// skipping. `encoding` is a WHATWG encoding label consumed only when reading
/// files or readers; in-memory text is parsed as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOptions {
    pub delimiter: char,
    pub quote: char,
    pub comment: String,
    pub has_headers: bool,
    pub encoding: Option<String>,
    pub date_formats: Option<DateFormats>,
    pub max_rows: Option<usize>,
    pub row_mode: RowMode,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            quote: DEFAULT_QUOTE,
            comment: DEFAULT_COMMENT.to_string(),
            has_headers: true,
            encoding: None,
            date_formats: None,
            max_rows: None,
            row_mode: RowMode::Array,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_comment(&self, trimmed_line: &str) -> bool {
        !self.comment.is_empty() && trimmed_line.starts_with(&self.comment)
    }
}
