use std::collections::BTreeSet;

use crate::data::filter::{all_countries, select_records};
use crate::data::model::RankingDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<RankingDataset>,

    /// Countries currently selected in the sidebar.
    pub selected_countries: BTreeSet<String>,

    /// Year currently selected on the slider.
    pub selected_year: i32,

    /// Indices of records passing the current filters (cached).
    pub selection: Vec<usize>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            selected_countries: BTreeSet::new(),
            selected_year: 0,
            selection: Vec::new(),
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and reset the filters to their
    /// defaults: every country selected, slider on the latest year.
    pub fn set_dataset(&mut self, dataset: RankingDataset) {
        self.selected_countries = all_countries(&dataset);
        self.selected_year = dataset.year_range.1;
        self.selection = select_records(&dataset, &self.selected_countries, self.selected_year);

        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
    }

    /// Recompute the cached `selection` after a filter change.
    pub fn reselect(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection = select_records(ds, &self.selected_countries, self.selected_year);
        }
    }

    /// Toggle a single country in the sidebar selection.
    pub fn toggle_country(&mut self, country: &str) {
        if !self.selected_countries.remove(country) {
            self.selected_countries.insert(country.to_string());
        }
        self.reselect();
    }

    /// Select every country present in the dataset.
    pub fn select_all_countries(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selected_countries = all_countries(ds);
        }
        self.reselect();
    }

    /// Deselect all countries.
    pub fn select_no_countries(&mut self) {
        self.selected_countries.clear();
        self.reselect();
    }

    /// Move the year slider.
    pub fn set_year(&mut self, year: i32) {
        if self.selected_year != year {
            self.selected_year = year;
            self.reselect();
        }
    }
}
