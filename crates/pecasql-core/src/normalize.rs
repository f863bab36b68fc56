use crate::error::{PipelineError, Result};
use crate::model::{NormalizedRow, Row};
use crate::{COL_AVISO, COL_LOTE, COL_NRO_PECA, COL_NRO_ROLO, COL_NUM_ETQ_AUX, COL_TEAR};

pub const NRO_ROLO_WIDTH: usize = 10;
pub const NRO_PECA_WIDTH: usize = 3;
pub const AVISO_WIDTH: usize = 6;
pub const TEAR_WIDTH: usize = 6;

/// Left-fill `value` with `0` up to `width` characters.
///
/// `width` is a minimum: longer values come back unchanged, never truncated.
pub fn pad_left_zeros(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }
    let mut padded = String::with_capacity(value.len() + (width - len));
    padded.extend(std::iter::repeat_n('0', width - len));
    padded.push_str(value);
    padded
}

/// Apply the padding rules to one row. `index` is the 0-based data row index.
pub fn normalize_row(row: &Row, index: usize) -> Result<NormalizedRow> {
    let nro_rolo = required(row, index, COL_NRO_ROLO)?;
    let nro_peca = required(row, index, COL_NRO_PECA)?;
    let aviso = required(row, index, COL_AVISO)?;
    let tear = required(row, index, COL_TEAR)?;
    let lote = required(row, index, COL_LOTE)?;
    let num_etq_aux = required(row, index, COL_NUM_ETQ_AUX)?;

    Ok(NormalizedRow {
        nro_rolo: pad_left_zeros(nro_rolo, NRO_ROLO_WIDTH),
        nro_peca: pad_left_zeros(
            &canonical_integer(nro_peca, index, COL_NRO_PECA)?,
            NRO_PECA_WIDTH,
        ),
        aviso: pad_left_zeros(aviso, AVISO_WIDTH),
        tear: pad_left_zeros(tear, TEAR_WIDTH),
        lote: lote.to_string(),
        num_etq_aux: num_etq_aux.to_string(),
    })
}

/// Normalize every row, stopping at the first failure.
pub fn normalize_rows(rows: &[Row]) -> Result<Vec<NormalizedRow>> {
    let normalized = rows
        .iter()
        .enumerate()
        .map(|(index, row)| normalize_row(row, index))
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!(event = "rows_normalized", rows = normalized.len());
    Ok(normalized)
}

fn required<'a>(row: &'a Row, index: usize, column: &str) -> Result<&'a str> {
    let value = row
        .get(column)
        .ok_or_else(|| PipelineError::field(index, column, "column is missing"))?;
    if value.trim().is_empty() {
        return Err(PipelineError::field(index, column, "value is empty"));
    }
    Ok(value)
}

// Decimal text of a non-negative integer without leading zeros.
fn canonical_integer(value: &str, index: usize, column: &str) -> Result<String> {
    let digits = value.trim();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(PipelineError::field(
            index,
            column,
            format!("{value:?} is not a non-negative integer"),
        ));
    }
    let stripped = digits.trim_start_matches('0');
    Ok(if stripped.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn sample_row() -> Row {
        Row::from_pairs([
            ("NRO_ROLO", "7"),
            ("NRO_PECA", "3"),
            ("AVISO", "12"),
            ("TEAR", "5"),
            ("LOTE", "88"),
            ("Num_Etq_Aux", "X1"),
        ])
    }

    #[test]
    fn pads_to_minimum_width() {
        assert_eq!(pad_left_zeros("7", 10), "0000000007");
        assert_eq!(pad_left_zeros("", 3), "000");
        assert_eq!(pad_left_zeros("123456", 6), "123456");
    }

    #[test]
    fn overlong_values_are_not_truncated() {
        assert_eq!(pad_left_zeros("12345678901", 10), "12345678901");
    }

    #[test]
    fn width_counts_characters_not_bytes() {
        assert_eq!(pad_left_zeros("é", 3), "00é");
    }

    #[test]
    fn normalizes_sample_row() {
        let normalized = normalize_row(&sample_row(), 0).expect("normalize");
        assert_eq!(
            normalized,
            NormalizedRow {
                nro_rolo: "0000000007".to_string(),
                nro_peca: "003".to_string(),
                aviso: "000012".to_string(),
                tear: "000005".to_string(),
                lote: "88".to_string(),
                num_etq_aux: "X1".to_string(),
            }
        );
    }

    #[test]
    fn nro_peca_is_read_as_an_integer() {
        let mut row = sample_row();
        row.insert("NRO_PECA", "0012");
        assert_eq!(normalize_row(&row, 0).expect("normalize").nro_peca, "012");

        row.insert("NRO_PECA", " 4 ");
        assert_eq!(normalize_row(&row, 0).expect("normalize").nro_peca, "004");

        row.insert("NRO_PECA", "000");
        assert_eq!(normalize_row(&row, 0).expect("normalize").nro_peca, "000");

        row.insert("NRO_PECA", "1234");
        assert_eq!(normalize_row(&row, 0).expect("normalize").nro_peca, "1234");
    }

    #[test]
    fn tear_is_padded_as_text() {
        let mut row = sample_row();
        row.insert("TEAR", "T7");
        assert_eq!(normalize_row(&row, 0).expect("normalize").tear, "0000T7");
    }

    #[test]
    fn rejects_non_integer_nro_peca() {
        for bad in ["abc", "-1", "3.5", "1e2"] {
            let mut row = sample_row();
            row.insert("NRO_PECA", bad);
            let err = normalize_row(&row, 7).expect_err(bad);
            assert_eq!(err.kind(), ErrorKind::FieldFormat);
            assert_eq!(err.row(), Some(7));
            assert_eq!(err.column(), Some("NRO_PECA"));
        }
    }

    #[test]
    fn rejects_missing_and_empty_columns() {
        let row = Row::from_pairs([("NRO_ROLO", "1")]);
        let err = normalize_row(&row, 2).expect_err("missing column");
        assert_eq!(err.column(), Some("NRO_PECA"));

        let mut row = sample_row();
        row.insert("LOTE", "  ");
        let err = normalize_row(&row, 0).expect_err("empty value");
        assert_eq!(err.column(), Some("LOTE"));
    }

    #[test]
    fn normalize_rows_stops_at_first_failure() {
        let mut bad = sample_row();
        bad.insert("NRO_PECA", "x");
        let mut also_bad = sample_row();
        also_bad.insert("AVISO", "");

        let err = normalize_rows(&[sample_row(), bad, also_bad]).expect_err("failure");
        assert_eq!(err.row(), Some(1));
        assert_eq!(err.column(), Some("NRO_PECA"));
    }
}
