use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::Result;
use crate::loader::{LoadOptions, load_rows};
use crate::model::{GeneratedSql, GenerationReport, Row};
use crate::normalize::normalize_rows;
use crate::output::{DEFAULT_PREVIEW_CHARS, join_statements, preview, write_output};
use crate::statement::generate_statements;

/// Options for a generation pass.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub load: LoadOptions,
    /// Where to persist the generated text. `None` keeps it in memory only.
    pub output_path: Option<PathBuf>,
    pub preview_chars: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            load: LoadOptions::default(),
            output_path: None,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

/// Everything a caller needs to show the outcome of a pass.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub sql: GeneratedSql,
    pub preview: String,
    pub report: GenerationReport,
}

/// Turns tabular input into `UPDATE CTE_peca` statements.
#[derive(Debug, Clone, Default)]
pub struct UpdateGenerator {
    options: GenerateOptions,
}

impl UpdateGenerator {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Generate the statement text for rows the caller already parsed.
    ///
    /// Every row is normalized before any statement is built, so a bad row
    /// anywhere in the batch yields an error and no text.
    pub fn generate_from_rows(&self, rows: &[Row]) -> Result<GeneratedSql> {
        let normalized = normalize_rows(rows)?;
        let statements = generate_statements(&normalized);
        Ok(GeneratedSql {
            text: join_statements(&statements),
            statement_count: statements.len(),
            output_path: None,
        })
    }

    /// Load `input`, generate, and persist when an output path is configured.
    pub fn run(&self, input: &Path) -> Result<GenerationResult> {
        let started = Instant::now();
        tracing::info!(event = "run_started", input = %input.display());

        let rows = load_rows(input, &self.options.load)?;
        let mut sql = self.generate_from_rows(&rows)?;

        let mut bytes_written = 0;
        if let Some(path) = &self.options.output_path {
            bytes_written = write_output(path, &sql.text)?;
            sql.output_path = Some(path.clone());
        }

        let duration_ms = started.elapsed().as_millis();
        tracing::info!(
            event = "run_finished",
            rows = rows.len(),
            statements = sql.statement_count,
            duration_ms = duration_ms
        );

        let report = GenerationReport {
            input_path: Some(input.to_path_buf()),
            output_path: sql.output_path.clone(),
            rows_read: rows.len(),
            statements_generated: sql.statement_count,
            bytes_written,
            duration_ms,
        };

        Ok(GenerationResult {
            preview: preview(&sql.text, self.options.preview_chars).to_string(),
            sql,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn row(rolo: &str, peca: &str) -> Row {
        Row::from_pairs([
            ("NRO_ROLO", rolo),
            ("NRO_PECA", peca),
            ("AVISO", "12"),
            ("TEAR", "5"),
            ("LOTE", "88"),
            ("Num_Etq_Aux", "X1"),
        ])
    }

    #[test]
    fn generates_one_statement_per_row() {
        let generator = UpdateGenerator::default();
        let sql = generator
            .generate_from_rows(&[row("1", "1"), row("2", "2")])
            .expect("generate");
        assert_eq!(sql.statement_count, 2);
        assert_eq!(sql.text.matches("UPDATE CTE_peca").count(), 2);
        assert!(sql.output_path.is_none());
    }

    #[test]
    fn no_rows_yields_empty_text() {
        let sql = UpdateGenerator::default()
            .generate_from_rows(&[])
            .expect("generate");
        assert_eq!(sql.text, "");
        assert_eq!(sql.statement_count, 0);
    }

    #[test]
    fn a_bad_row_aborts_the_batch() {
        let err = UpdateGenerator::default()
            .generate_from_rows(&[row("1", "1"), row("2", "two")])
            .expect_err("bad row");
        assert_eq!(err.kind(), ErrorKind::FieldFormat);
        assert_eq!(err.row(), Some(1));
    }
}
