use std::collections::BTreeSet;

use super::model::RankingDataset;

// ---------------------------------------------------------------------------
// Selection filter: country set + year → record indices
// ---------------------------------------------------------------------------

/// Return indices of records matching the current selection, in dataset
/// order. A record passes when its country is in `countries` and its year
/// equals `year` exactly.
///
/// An empty country set, or a year no record carries, yields an empty
/// selection rather than an error; the UI renders placeholder views for it.
pub fn select_records(
    dataset: &RankingDataset,
    countries: &BTreeSet<String>,
    year: i32,
) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| rec.year == year && countries.contains(&rec.country))
        .map(|(i, _)| i)
        .collect()
}

/// The default selection: every country present in the dataset.
pub fn all_countries(dataset: &RankingDataset) -> BTreeSet<String> {
    dataset.countries.clone()
}
