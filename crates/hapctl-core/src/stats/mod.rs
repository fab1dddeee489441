//! Parser for the CSV table returned by `show stat`.
//!
//! The first record is the header. Each following record is zipped with it
//! positionally into a [`StatRow`]; all rows from one response share a single
//! [`StatHeader`] behind an [`Arc`].

use std::collections::HashMap;
use std::sync::Arc;

use csv::{ReaderBuilder, StringRecord};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{AdminError, ProtocolError};

/// Column names of a statistics response, in header order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatHeader {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl StatHeader {
    /// Builds a header from column names.
    ///
    /// Lookups resolve to the first column carrying a given name.
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            index.entry(name.clone()).or_insert(position);
        }
        Self { names, index }
    }

    /// Column names in order, verbatim.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.names
    }

    /// Position of the first column with the given name.
    #[must_use]
    pub fn position(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the header has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One data row mapped onto its header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRow {
    header: Arc<StatHeader>,
    values: Vec<String>,
}

impl StatRow {
    /// Zips `values` with `header`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::FieldCountMismatch`] when the value count
    /// differs from the column count. `line` is reported in the error.
    pub fn new(
        header: Arc<StatHeader>,
        values: Vec<String>,
        line: u64,
    ) -> Result<Self, ProtocolError> {
        if values.len() != header.len() {
            return Err(ProtocolError::FieldCountMismatch {
                line,
                expected: header.len(),
                found: values.len(),
            });
        }
        Ok(Self { header, values })
    }

    /// Value of the named column, if the header has it.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.header
            .position(column)
            .and_then(|position| self.values.get(position))
            .map(String::as_str)
    }

    /// `(column, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.header
            .columns()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    /// Shared header of this row.
    #[must_use]
    pub fn header(&self) -> &StatHeader {
        &self.header
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for StatRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Parses a `show stat` response.
///
/// Blank lines are skipped. An empty response, or one holding only a header,
/// yields no rows.
///
/// # Errors
///
/// Returns [`AdminError::Protocol`] with
/// [`ProtocolError::FieldCountMismatch`] when a row's field count differs from
/// the header's, or [`ProtocolError::MalformedStats`] when the text is not
/// valid UTF-8 CSV.
pub fn parse_stats(response: &[u8]) -> Result<Vec<StatRow>, AdminError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(response);
    let mut records = reader.records();

    let Some(first) = records.next() else {
        return Ok(Vec::new());
    };
    let header_record = first.map_err(|error| malformed(&error))?;
    let header = Arc::new(StatHeader::new(into_fields(&header_record)));

    let mut rows = Vec::new();
    for record in records {
        let data = record.map_err(|error| malformed(&error))?;
        let line = data.position().map_or(0, csv::Position::line);
        rows.push(StatRow::new(Arc::clone(&header), into_fields(&data), line)?);
    }
    Ok(rows)
}

fn into_fields(record: &StringRecord) -> Vec<String> {
    record.iter().map(str::to_owned).collect()
}

fn malformed(error: &csv::Error) -> AdminError {
    AdminError::malformed_stats(error.to_string())
}
