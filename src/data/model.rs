use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a decoded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, as produced by the format decoders.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Date/time kept as text for simplicity.
    Date(String),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) | CellValue::Date(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{}", format_score(*v)),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64`. Text is parsed after trimming.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Render the value as a CSV field. `Null` becomes an empty field.
    pub fn to_field(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            other => other.to_string(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

/// Format a score the way a spreadsheet user expects to read it back:
/// whole numbers without a fractional part, everything else in the shortest
/// representation that parses back to the same `f64`.
pub fn format_score(score: f64) -> String {
    if score.is_finite() && score.fract() == 0.0 && score.abs() < 1e15 {
        format!("{}", score as i64)
    } else {
        format!("{score}")
    }
}

// ---------------------------------------------------------------------------
// RawTable – decoder output, before schema validation
// ---------------------------------------------------------------------------

/// A decoded table: ordered column names and rows aligned with them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding short rows with `Null` and truncating long ones.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Null);
        self.rows.push(row);
    }
}

// ---------------------------------------------------------------------------
// Record / Dataset – validated score table
// ---------------------------------------------------------------------------

pub const NAME_COLUMN: &str = "name";
pub const SCORE_COLUMN: &str = "score";

/// One student: the two required fields plus any other columns of the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    pub score: f64,
    /// Remaining source columns: column_name → value.
    pub extra: BTreeMap<String, CellValue>,
}

impl Record {
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        Self {
            name: name.into(),
            score,
            extra: BTreeMap::new(),
        }
    }

    /// Value of `column` rendered for display or export.
    pub fn field(&self, column: &str) -> String {
        match column {
            NAME_COLUMN => self.name.clone(),
            SCORE_COLUMN => format_score(self.score),
            other => self
                .extra
                .get(other)
                .map(CellValue::to_field)
                .unwrap_or_default(),
        }
    }
}

/// A validated dataset. `columns` keeps the source column order and always
/// contains `name` and `score`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    /// A two-column dataset (`name`, `score`) from plain records.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            columns: vec![NAME_COLUMN.to_string(), SCORE_COLUMN.to_string()],
            records,
        }
    }

    /// The built-in preset class.
    pub fn sample() -> Self {
        Self::from_records(
            [("Jammy", 66.0), ("John", 76.0), ("Alice", 86.0), ("Peter", 58.0), ("Kate", 92.0)]
                .into_iter()
                .map(|(name, score)| Record::new(name, score))
                .collect(),
        )
    }

    /// Build a dataset from the rows entered by hand in this session.
    pub fn from_manual(rows: &[Record]) -> Self {
        Self::from_records(rows.to_vec())
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(92.0), "92");
        assert_eq!(format_score(-3.0), "-3");
        assert_eq!(format_score(85.5), "85.5");
        assert_eq!(format_score(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_cell_as_f64() {
        assert_eq!(CellValue::Integer(7).as_f64(), Some(7.0));
        assert_eq!(CellValue::Text(" 85.5 ".into()).as_f64(), Some(85.5));
        assert_eq!(CellValue::Text("abc".into()).as_f64(), None);
        assert_eq!(CellValue::Null.as_f64(), None);
        assert_eq!(CellValue::Bool(true).as_f64(), None);
    }

    #[test]
    fn test_push_row_pads_and_truncates() {
        let mut table = RawTable::new(vec!["a".into(), "b".into()]);
        table.push_row(vec![CellValue::Integer(1)]);
        table.push_row(vec![
            CellValue::Integer(1),
            CellValue::Integer(2),
            CellValue::Integer(3),
        ]);
        assert_eq!(table.rows[0], vec![CellValue::Integer(1), CellValue::Null]);
        assert_eq!(table.rows[1].len(), 2);
    }

    #[test]
    fn test_record_field() {
        let mut record = Record::new("Kate", 92.0);
        record
            .extra
            .insert("class".into(), CellValue::Text("A".into()));
        assert_eq!(record.field("name"), "Kate");
        assert_eq!(record.field("score"), "92");
        assert_eq!(record.field("class"), "A");
        assert_eq!(record.field("missing"), "");
    }

    #[test]
    fn test_sample_dataset() {
        let ds = Dataset::sample();
        assert_eq!(ds.len(), 5);
        assert_eq!(ds.columns, vec!["name", "score"]);
        assert_eq!(ds.records[4].name, "Kate");
    }
}
