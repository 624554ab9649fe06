//! Column descriptors and incremental schema tracking.
//!
//! The tracker owns the ordered descriptor list and applies the
//! one-directional widening rule as rows arrive: a column confirmed
//! non-string never flips back on a later, weaker observation, and a numeric
//! column's sub-format may widen from integer to decimal once fractional
//! evidence appears. In streaming use every emitted snapshot therefore
//! reflects the best type information known so far.

use serde::{Deserialize, Serialize};

use crate::detect::{CellType, NumberFormat, TypedCell};

/// One column of a parse result. `name` is stable once assigned; `index`
/// always matches the descriptor's position in the owning list;
/// `datatype`/`number_format` may only widen over the parser's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub datatype: CellType,
    pub number_format: Option<NumberFormat>,
    pub index: usize,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            datatype: CellType::String,
            number_format: None,
            index,
        }
    }
}

/// Auto-generated name for a column with no header text: `column_N`, 1-based.
pub(crate) fn synthesized_name(index: usize) -> String {
    format!("column_{}", index + 1)
}

/// Maintains the ordered descriptor list across a parse session.
#[derive(Debug, Clone, Default)]
pub(crate) struct SchemaTracker {
    columns: Vec<ColumnDescriptor>,
    established: bool,
}

impl SchemaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_established(&self) -> bool {
        self.established
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<ColumnDescriptor> {
        self.columns
    }

    /// Creates descriptors from the header row's text values, falling back to
    /// a synthesized name for empty header cells. Names keep the header text
    /// verbatim so object-mode rows key on exactly what the header said.
    /// Initial types are `string` until data rows supply stronger evidence.
    pub fn establish_from_header(&mut self, fields: &[String]) {
        debug_assert!(!self.is_established());
        self.columns = fields
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let name = if field.trim().is_empty() {
                    synthesized_name(index)
                } else {
                    field.clone()
                };
                ColumnDescriptor::new(name, index)
            })
            .collect();
        self.established = true;
    }

    /// Folds one typed row into the schema: new indices append synthesized
    /// descriptors carrying the cell's type, existing ones widen per the
    /// merge rule. Empty cells never change anything.
    pub fn observe_row(&mut self, cells: &[TypedCell]) {
        for (index, cell) in cells.iter().enumerate() {
            if index >= self.columns.len() {
                let mut descriptor = ColumnDescriptor::new(synthesized_name(index), index);
                if !cell.is_empty() {
                    descriptor.datatype = cell.kind;
                    descriptor.number_format = cell.number_format;
                }
                self.columns.push(descriptor);
            } else {
                Self::widen(&mut self.columns[index], cell);
            }
        }
        self.established = true;
    }

    fn widen(descriptor: &mut ColumnDescriptor, cell: &TypedCell) {
        if cell.is_empty() {
            return;
        }
        match (descriptor.datatype, cell.kind) {
            // One-directional: string upgrades to anything, never the
            // reverse, and never between two non-string types.
            (CellType::String, kind) if kind != CellType::String => {
                descriptor.datatype = kind;
                descriptor.number_format = cell.number_format;
            }
            // A numeric column's integer guess widens to decimal once a
            // fractional value shows up.
            (CellType::Number, CellType::Number) => {
                if descriptor.number_format == Some(NumberFormat::Integer)
                    && cell.number_format == Some(NumberFormat::Decimal)
                {
                    descriptor.number_format = Some(NumberFormat::Decimal);
                }
            }
            _ => {}
        }
    }
}
