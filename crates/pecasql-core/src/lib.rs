//! CSV-to-SQL update generator for the `CTE_peca` table.
//!
//! This crate turns a semicolon-delimited export of roll pieces into one
//! `UPDATE CTE_peca` statement per record, normalizing the identifier columns
//! to fixed-width zero-padded strings on the way.

pub mod engine;
pub mod error;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod output;
pub mod statement;

pub use engine::{GenerateOptions, GenerationResult, UpdateGenerator};
pub use error::{ErrorKind, PipelineError, Result};
pub use loader::{LoadOptions, load_rows, parse_rows};
pub use model::{GeneratedSql, GenerationReport, NormalizedRow, Row, SqlStatement};
pub use normalize::{normalize_row, normalize_rows, pad_left_zeros};
pub use output::{
    DEFAULT_OUTPUT_FILE, DEFAULT_PREVIEW_CHARS, join_statements, preview, write_output,
};
pub use statement::{TARGET_TABLE, generate_statement, generate_statements};

/// Column holding the roll number.
pub const COL_NRO_ROLO: &str = "NRO_ROLO";
/// Column holding the piece number within the roll.
pub const COL_NRO_PECA: &str = "NRO_PECA";
/// Column holding the notice (aviso) number.
pub const COL_AVISO: &str = "AVISO";
/// Column holding the loom identifier.
pub const COL_TEAR: &str = "TEAR";
/// Column holding the sub-lot, emitted verbatim.
pub const COL_LOTE: &str = "LOTE";
/// Column holding the auxiliary label number, emitted verbatim.
pub const COL_NUM_ETQ_AUX: &str = "Num_Etq_Aux";

/// Columns every input row must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_NRO_ROLO,
    COL_NRO_PECA,
    COL_AVISO,
    COL_TEAR,
    COL_LOTE,
    COL_NUM_ETQ_AUX,
];
