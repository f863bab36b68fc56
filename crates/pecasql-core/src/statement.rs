use crate::model::{NormalizedRow, SqlStatement};

/// Table every statement updates.
pub const TARGET_TABLE: &str = "CTE_peca";

/// Build the `UPDATE` for one row.
///
/// Values are interpolated verbatim between single quotes. Embedded quotes
/// are not escaped, so a value containing `'` yields a broken statement.
pub fn generate_statement(row: &NormalizedRow) -> SqlStatement {
    SqlStatement::new(format!(
        "UPDATE {TARGET_TABLE}\n\
         SET Tear = '{tear}', Num_Etq_Aux = '{etq}'\n\
         WHERE Nro_rolo = '{rolo}' AND Nro_peca = '{peca}' AND Sublote = '{lote}' AND Aviso = '{aviso}';",
        tear = row.tear,
        etq = row.num_etq_aux,
        rolo = row.nro_rolo,
        peca = row.nro_peca,
        lote = row.lote,
        aviso = row.aviso,
    ))
}

/// One statement per row, in row order.
pub fn generate_statements(rows: &[NormalizedRow]) -> Vec<SqlStatement> {
    let statements: Vec<SqlStatement> = rows.iter().map(generate_statement).collect();
    tracing::debug!(event = "statements_generated", statements = statements.len());
    statements
}
