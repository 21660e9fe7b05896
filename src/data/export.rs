use std::path::Path;

use anyhow::{Context, Result};

use super::analysis::{ClassifiedRecord, PASSED_COLUMN};

// ---------------------------------------------------------------------------
// CSV export of the classified table
// ---------------------------------------------------------------------------

/// Header of the exported file: the source columns, then `passed` (unless the
/// source already had a `passed` column, which is overwritten in place).
pub fn export_columns(columns: &[String]) -> Vec<String> {
    let mut out = columns.to_vec();
    if !out.iter().any(|c| c == PASSED_COLUMN) {
        out.push(PASSED_COLUMN.to_string());
    }
    out
}

/// Serialize `rows` as UTF-8 CSV with a header row, one record per line.
pub fn to_csv_bytes(columns: &[String], rows: &[ClassifiedRecord]) -> Result<Vec<u8>> {
    let header = export_columns(columns);
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&header).context("writing CSV header")?;

    for row in rows {
        writer
            .write_record(header.iter().map(|col| {
                if col == PASSED_COLUMN {
                    row.passed_label().to_string()
                } else {
                    row.record.field(col)
                }
            }))
            .with_context(|| format!("writing CSV row for '{}'", row.record.name))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV buffer: {}", e.error()))
}

/// Write the CSV export to `path`.
pub fn write_csv(path: &Path, columns: &[String], rows: &[ClassifiedRecord]) -> Result<()> {
    let bytes = to_csv_bytes(columns, rows)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::data::analysis::analyze;
    use crate::data::loader::load_bytes;
    use crate::data::model::{CellValue, Dataset};

    #[test]
    fn test_sample_export() {
        let analysis = analyze(&Dataset::sample(), &AppConfig::default()).unwrap();
        let bytes = analysis.export_csv().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "name,score,passed\n\
             Kate,92,Yes\n\
             Alice,86,Yes\n\
             John,76,Yes\n\
             Jammy,66,Yes\n\
             Peter,58,No\n"
        );
    }

    #[test]
    fn test_export_is_deterministic() {
        let analysis = analyze(&Dataset::sample(), &AppConfig::default()).unwrap();
        assert_eq!(analysis.export_csv().unwrap(), analysis.export_csv().unwrap());
    }

    #[test]
    fn test_export_round_trip() {
        let input = "id,name,score,class\n\
                     1,\"Lee, Ann\",71.5,A\n\
                     2,Bob,88,\n\
                     3,Cy,71.5,B\n";
        let ds = load_bytes(input.as_bytes(), Some("csv")).unwrap();
        let analysis = analyze(&ds, &AppConfig::default()).unwrap();
        let bytes = analysis.export_csv().unwrap();

        let reloaded = load_bytes(&bytes, Some("csv")).unwrap();
        assert_eq!(reloaded.columns, vec!["id", "name", "score", "class", "passed"]);
        assert_eq!(reloaded.len(), analysis.sorted.len());
        for (back, orig) in reloaded.records.iter().zip(&analysis.sorted) {
            assert_eq!(back.name, orig.record.name);
            assert_eq!(back.score, orig.record.score);
            assert_eq!(back.field("id"), orig.record.field("id"));
            assert_eq!(back.field("class"), orig.record.field("class"));
            assert_eq!(
                back.extra["passed"],
                CellValue::Text(orig.passed_label().to_string())
            );
        }
    }

    #[test]
    fn test_existing_passed_column_overwritten() {
        let ds = load_bytes(b"name,passed,score\nKate,maybe,92\n", Some("csv")).unwrap();
        let analysis = analyze(&ds, &AppConfig::default()).unwrap();
        let text = String::from_utf8(analysis.export_csv().unwrap()).unwrap();
        assert_eq!(text, "name,passed,score\nKate,Yes,92\n");
    }

    #[test]
    fn test_write_csv_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("student_scores.csv");
        let analysis = analyze(&Dataset::sample(), &AppConfig::default()).unwrap();
        write_csv(&path, &analysis.columns, &analysis.sorted).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("name,score,passed\nKate,92,Yes\n"));
    }
}
