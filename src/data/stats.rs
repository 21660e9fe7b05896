// ---------------------------------------------------------------------------
// Descriptive statistics over the score column
// ---------------------------------------------------------------------------

/// Summary statistics of a set of scores, in the order a data-frame
/// `describe()` reports them.
#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    /// Number of values.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (N-1 denominator). `None` for a single value.
    pub std: Option<f64>,
    pub min: f64,
    /// 25th percentile.
    pub q25: f64,
    /// 50th percentile.
    pub median: f64,
    /// 75th percentile.
    pub q75: f64,
    pub max: f64,
}

impl Describe {
    /// Computes the summary from unsorted values.
    ///
    /// Returns `None` if there are no values.
    ///
    /// ```ignore
    /// let stats = Describe::new([66.0, 76.0, 86.0, 58.0, 92.0]).unwrap();
    /// assert_eq!(stats.median, 76.0);
    /// ```
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes the summary from values sorted in ascending order.
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        debug_assert!(sorted.is_sorted_by(|a, b| a <= b));

        let min = *sorted.first()?;
        let max = *sorted.last()?;
        let count = sorted.len();
        let n = count as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let std = (count > 1).then(|| {
            let ss = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
            (ss / (n - 1.0)).sqrt()
        });

        Some(Self {
            count,
            mean,
            std,
            min,
            q25: percentile(sorted, 25.0),
            median: percentile(sorted, 50.0),
            q75: percentile(sorted, 75.0),
            max,
        })
    }

    /// Label/value pairs for a two-column summary table.
    pub fn rows(&self) -> [(&'static str, Option<f64>); 8] {
        [
            ("count", Some(self.count as f64)),
            ("mean", Some(self.mean)),
            ("std", self.std),
            ("min", Some(self.min)),
            ("25%", Some(self.q25)),
            ("50%", Some(self.median)),
            ("75%", Some(self.q75)),
            ("max", Some(self.max)),
        ]
    }
}

/// Percentile `p` (0–100) of ascending-sorted values, interpolating linearly
/// between the two closest ranks at position `p / 100 * (n - 1)`.
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    assert!(!sorted.is_empty(), "percentile of an empty slice");
    let pos = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty() {
        assert_eq!(Describe::new(Vec::new()), None);
    }

    #[test]
    fn test_sample_class() {
        let stats = Describe::new([66.0, 76.0, 86.0, 58.0, 92.0]).unwrap();
        assert_eq!(stats.count, 5);
        assert!(approx(stats.mean, 75.6));
        assert!(approx(stats.std.unwrap(), 194.8_f64.sqrt()));
        assert_eq!(stats.min, 58.0);
        assert_eq!(stats.q25, 66.0);
        assert_eq!(stats.median, 76.0);
        assert_eq!(stats.q75, 86.0);
        assert_eq!(stats.max, 92.0);
    }

    #[test]
    fn test_single_value() {
        let stats = Describe::new([42.0]).unwrap();
        assert_eq!(stats.std, None);
        assert_eq!(stats.q25, 42.0);
        assert_eq!(stats.q75, 42.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!(approx(percentile(&sorted, 25.0), 1.75));
        assert!(approx(percentile(&sorted, 50.0), 2.5));
        assert!(approx(percentile(&sorted, 75.0), 3.25));
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 100.0), 4.0);
    }

    #[test]
    fn test_rows_order() {
        let stats = Describe::new([1.0, 3.0]).unwrap();
        let labels: Vec<_> = stats.rows().iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            ["count", "mean", "std", "min", "25%", "50%", "75%", "max"]
        );
        assert_eq!(stats.rows()[0].1, Some(2.0));
    }
}
