use anyhow::Result;
use thiserror::Error;

use super::export;
use super::model::{Dataset, Record, format_score};
use super::stats::Describe;
use crate::config::AppConfig;

pub const PASSED_COLUMN: &str = "passed";

// ---------------------------------------------------------------------------
// Pipeline outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("no data: the dataset has no records")]
    EmptyDataset,
}

/// A record with its pass/fail classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecord {
    /// Position in the input dataset.
    pub index: usize,
    pub record: Record,
    pub passed: bool,
}

impl ClassifiedRecord {
    pub fn passed_label(&self) -> &'static str {
        if self.passed { "Yes" } else { "No" }
    }
}

/// Input for the bar chart, one entry per record of the sorted table.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub names: Vec<String>,
    pub scores: Vec<f64>,
    /// Text drawn above each bar: the score truncated to an integer.
    pub labels: Vec<i64>,
    pub passed: Vec<bool>,
    /// Upper bound of the y axis.
    pub y_max: f64,
}

/// Everything the results view shows for one dataset.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Source column order, used for tables and export.
    pub columns: Vec<String>,
    pub stats: Describe,
    /// Rows scoring at or above the high-score threshold, input order.
    pub high_scorers: Vec<ClassifiedRecord>,
    pub top: Record,
    /// Input order with `passed` attached.
    pub classified: Vec<ClassifiedRecord>,
    /// `classified`, highest score first.
    pub sorted: Vec<ClassifiedRecord>,
    pub chart: ChartData,
}

impl Analysis {
    /// Mean score with two decimals, e.g. `75.60`.
    pub fn mean_text(&self) -> String {
        format!("{:.2}", self.stats.mean)
    }

    pub fn max_text(&self) -> String {
        format_score(self.stats.max)
    }

    pub fn min_text(&self) -> String {
        format_score(self.stats.min)
    }

    /// The sorted table as CSV (source columns, then `passed`).
    pub fn export_csv(&self) -> Result<Vec<u8>> {
        export::to_csv_bytes(&self.columns, &self.sorted)
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the full analysis over `dataset`. The dataset itself is not modified.
pub fn analyze(dataset: &Dataset, config: &AppConfig) -> Result<Analysis, AnalysisError> {
    let stats = Describe::new(dataset.records.iter().map(|r| r.score))
        .ok_or(AnalysisError::EmptyDataset)?;
    let top = top_record(&dataset.records)
        .ok_or(AnalysisError::EmptyDataset)?
        .clone();

    let classified = classify(&dataset.records, config.pass_threshold);
    let high_scorers = high_scorers(&classified, config.high_score_threshold);
    let sorted = sort_desc(&classified);
    let chart = chart_data(&sorted, config.chart_headroom);

    Ok(Analysis {
        columns: dataset.columns.clone(),
        stats,
        high_scorers,
        top,
        classified,
        sorted,
        chart,
    })
}

/// Rows scoring at least `threshold`, in input order.
pub fn high_scorers(rows: &[ClassifiedRecord], threshold: f64) -> Vec<ClassifiedRecord> {
    rows.iter()
        .filter(|r| r.record.score >= threshold)
        .cloned()
        .collect()
}

/// The record with the highest score; the earliest one wins a tie.
pub fn top_record(records: &[Record]) -> Option<&Record> {
    records.iter().reduce(|best, r| if r.score > best.score { r } else { best })
}

pub fn classify(records: &[Record], pass_threshold: f64) -> Vec<ClassifiedRecord> {
    records
        .iter()
        .enumerate()
        .map(|(index, r)| ClassifiedRecord {
            index,
            record: r.clone(),
            passed: r.score >= pass_threshold,
        })
        .collect()
}

/// Highest score first. Equal scores keep their input order (`sort_by` is
/// stable).
pub fn sort_desc(rows: &[ClassifiedRecord]) -> Vec<ClassifiedRecord> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| b.record.score.total_cmp(&a.record.score));
    sorted
}

pub fn chart_data(sorted: &[ClassifiedRecord], headroom: f64) -> ChartData {
    let scores: Vec<f64> = sorted.iter().map(|r| r.record.score).collect();
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    ChartData {
        names: sorted.iter().map(|r| r.record.name.clone()).collect(),
        labels: scores.iter().map(|s| s.trunc() as i64).collect(),
        passed: sorted.iter().map(|r| r.passed).collect(),
        y_max: if scores.is_empty() { 0.0 } else { max * headroom },
        scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(pairs: &[(&str, f64)]) -> Vec<Record> {
        pairs.iter().map(|&(n, s)| Record::new(n, s)).collect()
    }

    fn names(rows: &[ClassifiedRecord]) -> Vec<&str> {
        rows.iter().map(|r| r.record.name.as_str()).collect()
    }

    #[test]
    fn test_sample_class() {
        let analysis = analyze(&Dataset::sample(), &AppConfig::default()).unwrap();

        assert!((analysis.stats.mean - 75.6).abs() < 1e-9);
        assert_eq!(analysis.mean_text(), "75.60");
        assert_eq!(analysis.max_text(), "92");
        assert_eq!(analysis.min_text(), "58");
        assert_eq!(analysis.top, Record::new("Kate", 92.0));
        assert_eq!(names(&analysis.high_scorers), ["Alice", "Kate"]);
        assert_eq!(
            analysis.high_scorers.iter().map(|r| r.index).collect::<Vec<_>>(),
            [2, 4]
        );
        assert_eq!(
            names(&analysis.sorted),
            ["Kate", "Alice", "John", "Jammy", "Peter"]
        );
        let flags: Vec<_> = analysis.classified.iter().map(|r| r.passed_label()).collect();
        assert_eq!(flags, ["Yes", "Yes", "Yes", "Yes", "No"]);
        let unchanged: Vec<_> = analysis.classified.iter().map(|r| r.record.clone()).collect();
        assert_eq!(unchanged, Dataset::sample().records);
        assert_eq!(
            analysis.sorted.iter().map(|r| r.index).collect::<Vec<_>>(),
            [4, 2, 1, 0, 3]
        );
    }

    #[test]
    fn test_empty_dataset() {
        let ds = Dataset::from_records(Vec::new());
        assert_eq!(
            analyze(&ds, &AppConfig::default()).unwrap_err(),
            AnalysisError::EmptyDataset
        );
    }

    #[test]
    fn test_top_record_first_on_tie() {
        let recs = records(&[("A", 70.0), ("B", 95.0), ("C", 95.0), ("D", 10.0)]);
        assert_eq!(top_record(&recs).unwrap().name, "B");
        assert_eq!(top_record(&[]), None);
    }

    #[test]
    fn test_sort_is_stable() {
        let recs = records(&[("A", 70.0), ("B", 80.0), ("C", 70.0), ("D", 80.0), ("E", 90.0)]);
        let sorted = sort_desc(&classify(&recs, 60.0));
        assert_eq!(names(&sorted), ["E", "B", "D", "A", "C"]);
        assert!(sorted.windows(2).all(|w| w[0].record.score >= w[1].record.score));
    }

    #[test]
    fn test_threshold_boundaries() {
        let recs = records(&[("A", 60.0), ("B", 59.999), ("C", 80.0), ("D", 79.5)]);
        let classified = classify(&recs, 60.0);
        assert!(classified[0].passed);
        assert!(!classified[1].passed);
        assert_eq!(names(&high_scorers(&classified, 80.0)), ["C"]);
    }

    #[test]
    fn test_chart_data() {
        let recs = records(&[("A", 70.9), ("B", 50.0)]);
        let sorted = sort_desc(&classify(&recs, 60.0));
        let chart = chart_data(&sorted, 1.1);
        assert_eq!(chart.names, ["A", "B"]);
        assert_eq!(chart.scores, [70.9, 50.0]);
        assert_eq!(chart.labels, [70, 50]);
        assert_eq!(chart.passed, [true, false]);
        assert!((chart.y_max - 70.9 * 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = AppConfig {
            pass_threshold: 70.0,
            high_score_threshold: 90.0,
            ..AppConfig::default()
        };
        let analysis = analyze(&Dataset::sample(), &config).unwrap();
        assert_eq!(names(&analysis.high_scorers), ["Kate"]);
        let failed: Vec<_> = analysis
            .classified
            .iter()
            .filter(|r| !r.passed)
            .map(|r| r.record.name.as_str())
            .collect();
        assert_eq!(failed, ["Jammy", "Peter"]);
    }
}
