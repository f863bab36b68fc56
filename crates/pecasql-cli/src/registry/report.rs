use std::path::Path;

use chrono::{DateTime, Utc};
use pecasql_core::{ErrorKind, GenerationReport, PipelineError};
use serde::Serialize;

use super::RegistryResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunStatus {
    Ok,
    Error,
}

/// Structured form of a pipeline failure, for callers that render errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub message: String,
}

impl From<&PipelineError> for ErrorReport {
    fn from(err: &PipelineError) -> Self {
        Self {
            kind: err.kind(),
            row: err.row(),
            column: err.column().map(str::to_string),
            message: err.to_string(),
        }
    }
}

/// JSON document written by `--report`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: String,
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<GenerationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
}

impl RunReport {
    pub fn success(
        run_id: String,
        started_at: DateTime<Utc>,
        generation: GenerationReport,
    ) -> Self {
        Self {
            run_id,
            started_at: started_at.to_rfc3339(),
            status: RunStatus::Ok,
            generation: Some(generation),
            error: None,
        }
    }

    pub fn failure(run_id: String, started_at: DateTime<Utc>, err: &PipelineError) -> Self {
        Self {
            run_id,
            started_at: started_at.to_rfc3339(),
            status: RunStatus::Error,
            generation: None,
            error: Some(ErrorReport::from(err)),
        }
    }
}

pub fn write_report(path: &Path, report: &RunReport) -> RegistryResult<()> {
    let mut encoded = serde_json::to_string_pretty(report)?;
    encoded.push('\n');
    pecasql_core::write_output(path, &encoded).map_err(|err| match err {
        PipelineError::IoWrite { source, .. } => source,
        other => std::io::Error::other(other.to_string()),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_report_carries_row_and_column() {
        let err = PipelineError::FieldFormat {
            row: 3,
            column: "NRO_PECA".to_string(),
            reason: "\"x\" is not a non-negative integer".to_string(),
        };
        let report = RunReport::failure("run".to_string(), Utc::now(), &err);
        let value = serde_json::to_value(&report).expect("serialize");

        assert_eq!(value["status"], "ERROR");
        assert_eq!(value["error"]["kind"], "field_format");
        assert_eq!(value["error"]["row"], 3);
        assert_eq!(value["error"]["column"], "NRO_PECA");
        assert!(value.get("generation").is_none());
    }

    #[test]
    fn success_report_omits_error() {
        let generation = GenerationReport {
            input_path: None,
            output_path: None,
            rows_read: 2,
            statements_generated: 2,
            bytes_written: 0,
            duration_ms: 1,
        };
        let report = RunReport::success("run".to_string(), Utc::now(), generation);
        let value = serde_json::to_value(&report).expect("serialize");

        assert_eq!(value["status"], "OK");
        assert_eq!(value["generation"]["statements_generated"], 2);
        assert!(value.get("error").is_none());
    }
}
