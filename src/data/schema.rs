use std::collections::BTreeMap;

use thiserror::Error;

use super::model::{CellValue, Dataset, NAME_COLUMN, Record, RawTable, SCORE_COLUMN};

// ---------------------------------------------------------------------------
// Schema validation: RawTable → Dataset
// ---------------------------------------------------------------------------

/// Why a decoded table cannot be analysed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row}: score '{value}' is not a number")]
    InvalidScore { row: usize, value: String },

    #[error("row {row}: score is empty")]
    MissingScore { row: usize },
}

/// Check that `table` has the `name` and `score` columns and turn it into a
/// [`Dataset`]. Column names are matched case-sensitively.
///
/// Rows are numbered from 1 in error messages (the header is not counted).
pub fn validate(table: RawTable) -> Result<Dataset, SchemaError> {
    let name_idx = table.columns.iter().position(|c| c == NAME_COLUMN);
    let score_idx = table.columns.iter().position(|c| c == SCORE_COLUMN);

    let (name_idx, score_idx) = match (name_idx, score_idx) {
        (Some(n), Some(s)) => (n, s),
        (n, s) => {
            let missing = [(NAME_COLUMN, n), (SCORE_COLUMN, s)]
                .into_iter()
                .filter(|(_, idx)| idx.is_none())
                .map(|(col, _)| col.to_string())
                .collect();
            return Err(SchemaError::MissingColumns(missing));
        }
    };

    let mut records = Vec::with_capacity(table.rows.len());

    for (i, row) in table.rows.into_iter().enumerate() {
        let row_no = i + 1;

        let score_cell = row.get(score_idx).unwrap_or(&CellValue::Null);
        if score_cell.is_null() {
            return Err(SchemaError::MissingScore { row: row_no });
        }
        let score = score_cell.as_f64().ok_or_else(|| SchemaError::InvalidScore {
            row: row_no,
            value: score_cell.to_string(),
        })?;
        // NaN is a missing value; infinities are not scores.
        if score.is_nan() {
            return Err(SchemaError::MissingScore { row: row_no });
        }
        if score.is_infinite() {
            return Err(SchemaError::InvalidScore {
                row: row_no,
                value: score_cell.to_string(),
            });
        }

        let name = match row.get(name_idx) {
            Some(CellValue::Null) | None => String::new(),
            Some(cell) => cell.to_string(),
        };

        let extra: BTreeMap<String, CellValue> = table
            .columns
            .iter()
            .zip(row)
            .enumerate()
            .filter(|(idx, _)| *idx != name_idx && *idx != score_idx)
            .map(|(_, (col, value))| (col.clone(), value))
            .collect();

        records.push(Record { name, score, extra });
    }

    Ok(Dataset {
        columns: table.columns,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn table(columns: &[&str], rows: Vec<Vec<CellValue>>) -> RawTable {
        let mut t = RawTable::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            t.push_row(row);
        }
        t
    }

    #[test]
    fn test_valid_table() {
        let t = table(
            &["id", "name", "score"],
            vec![
                vec![CellValue::Integer(1), text("Kate"), text("92")],
                vec![CellValue::Integer(2), text("Peter"), CellValue::Float(58.5)],
            ],
        );
        let ds = validate(t).unwrap();
        assert_eq!(ds.columns, vec!["id", "name", "score"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].name, "Kate");
        assert_eq!(ds.records[0].score, 92.0);
        assert_eq!(ds.records[1].score, 58.5);
        assert_eq!(ds.records[1].extra["id"], CellValue::Integer(2));
    }

    #[test]
    fn test_missing_score_column() {
        let t = table(&["name"], vec![vec![text("Kate")]]);
        assert_eq!(
            validate(t),
            Err(SchemaError::MissingColumns(vec!["score".into()]))
        );
    }

    #[test]
    fn test_missing_both_columns() {
        let t = table(&["Name", "Score"], vec![]);
        let err = validate(t).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingColumns(vec!["name".into(), "score".into()])
        );
        assert_eq!(err.to_string(), "missing required column(s): name, score");
    }

    #[test]
    fn test_non_numeric_score() {
        let t = table(
            &["name", "score"],
            vec![vec![text("Kate"), text("92")], vec![text("John"), text("A+")]],
        );
        assert_eq!(
            validate(t),
            Err(SchemaError::InvalidScore {
                row: 2,
                value: "A+".into()
            })
        );
    }

    #[test]
    fn test_empty_score_cell() {
        let t = table(&["name", "score"], vec![vec![text("Kate")]]);
        assert_eq!(validate(t), Err(SchemaError::MissingScore { row: 1 }));
    }

    #[test]
    fn test_nan_score_is_missing() {
        let t = table(
            &["name", "score"],
            vec![
                vec![text("Kate"), text("92")],
                vec![text("Ghost"), text("NaN")],
            ],
        );
        assert_eq!(validate(t), Err(SchemaError::MissingScore { row: 2 }));

        let t = table(
            &["name", "score"],
            vec![vec![text("Ghost"), CellValue::Float(f64::NAN)]],
        );
        assert_eq!(validate(t), Err(SchemaError::MissingScore { row: 1 }));
    }

    #[test]
    fn test_infinite_score_rejected() {
        for value in ["inf", "-infinity", "Infinity"] {
            let t = table(&["name", "score"], vec![vec![text("Kate"), text(value)]]);
            assert_eq!(
                validate(t),
                Err(SchemaError::InvalidScore {
                    row: 1,
                    value: value.to_string()
                })
            );
        }
        let t = table(
            &["name", "score"],
            vec![vec![text("Kate"), CellValue::Float(f64::INFINITY)]],
        );
        assert!(matches!(validate(t), Err(SchemaError::InvalidScore { row: 1, .. })));
    }

    #[test]
    fn test_header_only_is_valid_but_empty() {
        let t = table(&["name", "score"], vec![]);
        let ds = validate(t).unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn test_numeric_name_rendered_as_text() {
        let t = table(
            &["name", "score"],
            vec![vec![CellValue::Integer(7), CellValue::Integer(70)]],
        );
        let ds = validate(t).unwrap();
        assert_eq!(ds.records[0].name, "7");
    }
}
