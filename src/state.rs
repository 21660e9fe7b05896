use std::fmt;
use std::path::Path;

use crate::color::PassColors;
use crate::config::AppConfig;
use crate::data::analysis::{Analysis, analyze};
use crate::data::export;
use crate::data::loader;
use crate::data::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Input source selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSource {
    #[default]
    Preset,
    Upload,
    Manual,
}

impl DataSource {
    pub const ALL: [DataSource; 3] = [DataSource::Preset, DataSource::Upload, DataSource::Manual];
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DataSource::Preset => "Sample data",
            DataSource::Upload => "Upload a file",
            DataSource::Manual => "Manual entry",
        })
    }
}

// ---------------------------------------------------------------------------
// Manual entry form
// ---------------------------------------------------------------------------

/// Form fields plus the rows submitted so far. Rows are only ever appended
/// (or cleared as a whole).
#[derive(Debug, Clone, Default)]
pub struct ManualEntry {
    pub name: String,
    pub score: u8,
    rows: Vec<Record>,
}

impl ManualEntry {
    pub const MAX_SCORE: u8 = 100;

    /// Append the current form values. The name is trimmed; blank names are
    /// ignored.
    /// Returns whether a row was added.
    pub fn submit(&mut self) -> bool {
        let name = self.name.trim();
        if name.is_empty() {
            return false;
        }
        let score = self.score.min(Self::MAX_SCORE);
        self.rows.push(Record::new(name, f64::from(score)));
        self.name.clear();
        true
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    pub source: DataSource,

    /// Dataset under analysis (None until something is loaded).
    pub dataset: Option<Dataset>,

    /// Result of the last analysis run.
    pub analysis: Option<Analysis>,

    pub manual: ManualEntry,

    pub colors: PassColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl AppState {
    /// Fresh state; the preset source is selected and analysed right away.
    pub fn new(config: AppConfig) -> Self {
        let mut state = Self {
            config,
            source: DataSource::default(),
            dataset: None,
            analysis: None,
            manual: ManualEntry::default(),
            colors: PassColors::default(),
            status_message: None,
        };
        state.select_source(DataSource::Preset);
        state
    }

    /// Switch input source. Results of the previous source are discarded.
    pub fn select_source(&mut self, source: DataSource) {
        self.source = source;
        self.dataset = None;
        self.analysis = None;
        self.status_message = None;
        if source == DataSource::Preset {
            self.set_dataset(Dataset::sample());
        }
    }

    /// Ingest a dataset and run the analysis on it.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        match analyze(&dataset, &self.config) {
            Ok(analysis) => {
                log::info!(
                    "Analysed {} records, mean score {}",
                    dataset.len(),
                    analysis.mean_text()
                );
                self.analysis = Some(analysis);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Analysis skipped: {e}");
                self.analysis = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
        self.dataset = Some(dataset);
    }

    /// Load a file chosen by the user and analyse it.
    pub fn load_path(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} records with columns {:?} from {}",
                    dataset.len(),
                    dataset.columns,
                    path.display()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.dataset = None;
                self.analysis = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Add the manual form values as a new row.
    pub fn submit_manual(&mut self) {
        if self.manual.submit() {
            log::debug!("{} manual rows entered", self.manual.rows().len());
        }
    }

    /// Analyse every manually entered row.
    pub fn analyze_manual(&mut self) {
        self.set_dataset(Dataset::from_manual(self.manual.rows()));
    }

    /// Write the sorted table as CSV.
    pub fn export_to(&mut self, path: &Path) {
        let Some(analysis) = &self.analysis else {
            return;
        };
        match export::write_csv(path, &analysis.columns, &analysis.sorted) {
            Ok(()) => {
                log::info!("Exported {} rows to {}", analysis.sorted.len(), path.display());
                self.status_message = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
