use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// One input record: column name to raw value, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from (column, value) pairs, keeping their order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = Row::new();
        for (column, value) in pairs {
            row.insert(column, value);
        }
        row
    }

    /// Set a column value. An existing column keeps its position.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A row whose identifier columns have been zero-padded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRow {
    pub nro_rolo: String,
    pub nro_peca: String,
    pub aviso: String,
    pub tear: String,
    pub lote: String,
    pub num_etq_aux: String,
}

/// A single generated `UPDATE` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlStatement(String);

impl SqlStatement {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SqlStatement {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Output of one generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSql {
    /// Full joined text, never truncated.
    pub text: String,
    pub statement_count: usize,
    /// Where the text was persisted, when it was.
    pub output_path: Option<PathBuf>,
}

/// Serializable summary of a generation pass.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub rows_read: usize,
    pub statements_generated: usize,
    pub bytes_written: u64,
    pub duration_ms: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_keeps_header_order_and_overwrites_in_place() {
        let mut row = Row::from_pairs([("B", "1"), ("A", "2")]);
        row.insert("B", "3");
        row.insert("C", "4");

        let columns: Vec<&str> = row.columns().collect();
        assert_eq!(columns, vec!["B", "A", "C"]);
        assert_eq!(row.get("B"), Some("3"));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn column_lookup_is_case_sensitive() {
        let row = Row::from_pairs([("Num_Etq_Aux", "X1")]);
        assert_eq!(row.get("NUM_ETQ_AUX"), None);
        assert_eq!(row.get("Num_Etq_Aux"), Some("X1"));
    }
}
