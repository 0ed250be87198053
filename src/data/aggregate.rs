use std::collections::BTreeMap;

use super::model::RankingDataset;

// ---------------------------------------------------------------------------
// Read-only aggregations over a selection (indices from filter::select_records)
// ---------------------------------------------------------------------------

/// The `min(n, len)` selected records with the smallest `world_rank`,
/// as indices sorted ascending by rank. The sort is stable, so records
/// sharing a rank keep their selection order.
pub fn top_n(dataset: &RankingDataset, selection: &[usize], n: usize) -> Vec<usize> {
    let mut ranked: Vec<usize> = selection.to_vec();
    ranked.sort_by_key(|&i| dataset.records[i].world_rank);
    ranked.truncate(n);
    ranked
}

/// Count selected records per country, ordered descending by count.
/// Ties keep first-appearance order within the selection, which fixes the
/// bar order in the distribution chart.
pub fn country_distribution(dataset: &RankingDataset, selection: &[usize]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index_of: BTreeMap<&str, usize> = BTreeMap::new();

    for &i in selection {
        let country = dataset.records[i].country.as_str();
        match index_of.get(country) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                index_of.insert(country, counts.len());
                counts.push((country.to_string(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Per-institution (year, world_rank) series for the trend chart, one entry
/// per distinct institution in first-appearance order, points sorted
/// ascending by year.
///
/// The function takes whatever selection it is handed; the dashboard passes
/// the year-filtered selection, so each series degenerates to a single
/// point there, but multi-year slices produce real trends.
pub fn trend_series(
    dataset: &RankingDataset,
    selection: &[usize],
) -> Vec<(String, Vec<(i32, u32)>)> {
    let mut series: Vec<(String, Vec<(i32, u32)>)> = Vec::new();
    let mut index_of: BTreeMap<&str, usize> = BTreeMap::new();

    for &i in selection {
        let rec = &dataset.records[i];
        let pos = match index_of.get(rec.institution.as_str()) {
            Some(&pos) => pos,
            None => {
                index_of.insert(rec.institution.as_str(), series.len());
                series.push((rec.institution.clone(), Vec::new()));
                series.len() - 1
            }
        };
        series[pos].1.push((rec.year, rec.world_rank));
    }

    for (_, points) in &mut series {
        points.sort_by_key(|&(year, _)| year);
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{RankingDataset, RankingRecord};
    use std::collections::BTreeMap;

    fn rec(institution: &str, country: &str, rank: u32, year: i32) -> RankingRecord {
        RankingRecord {
            institution: institution.into(),
            country: country.into(),
            world_rank: rank,
            year,
            extra: BTreeMap::new(),
        }
    }

    fn dataset(records: Vec<RankingRecord>) -> RankingDataset {
        RankingDataset::from_records(records).unwrap()
    }

    #[test]
    fn top_n_sorts_by_rank_and_truncates() {
        let ds = dataset(vec![
            rec("C", "X", 30, 2020),
            rec("A", "X", 1, 2020),
            rec("B", "X", 5, 2020),
        ]);
        let sel: Vec<usize> = (0..ds.len()).collect();
        assert_eq!(top_n(&ds, &sel, 2), vec![1, 2]);
    }

    #[test]
    fn top_n_returns_all_when_short() {
        let ds = dataset(vec![rec("A", "X", 3, 2020), rec("B", "X", 1, 2020)]);
        let sel: Vec<usize> = (0..ds.len()).collect();
        assert_eq!(top_n(&ds, &sel, 10), vec![1, 0]);
    }

    #[test]
    fn top_n_ties_keep_selection_order() {
        let ds = dataset(vec![
            rec("First", "X", 7, 2020),
            rec("Second", "Y", 7, 2020),
            rec("Third", "X", 7, 2020),
        ]);
        let sel: Vec<usize> = (0..ds.len()).collect();
        assert_eq!(top_n(&ds, &sel, 3), vec![0, 1, 2]);
    }

    #[test]
    fn top_n_of_empty_selection_is_empty() {
        let ds = dataset(vec![rec("A", "X", 1, 2020)]);
        assert!(top_n(&ds, &[], 10).is_empty());
    }

    #[test]
    fn distribution_counts_sum_to_selection_len() {
        let ds = dataset(vec![
            rec("A", "United States", 1, 2020),
            rec("B", "United States", 2, 2020),
            rec("C", "Germany", 3, 2020),
            rec("D", "United States", 4, 2020),
            rec("E", "Japan", 5, 2020),
        ]);
        let sel: Vec<usize> = (0..ds.len()).collect();
        let dist = country_distribution(&ds, &sel);
        assert_eq!(dist[0], ("United States".to_string(), 3));
        assert_eq!(dist.len(), 3);
        let total: usize = dist.iter().map(|(_, c)| c).sum();
        assert_eq!(total, sel.len());
    }

    #[test]
    fn distribution_ties_keep_first_appearance_order() {
        let ds = dataset(vec![
            rec("A", "Japan", 1, 2020),
            rec("B", "Germany", 2, 2020),
            rec("C", "Japan", 3, 2020),
            rec("D", "Germany", 4, 2020),
        ]);
        let sel: Vec<usize> = (0..ds.len()).collect();
        let dist = country_distribution(&ds, &sel);
        assert_eq!(
            dist,
            vec![("Japan".to_string(), 2), ("Germany".to_string(), 2)]
        );
    }

    #[test]
    fn distribution_of_empty_selection_is_empty() {
        let ds = dataset(vec![rec("A", "X", 1, 2020)]);
        assert!(country_distribution(&ds, &[]).is_empty());
    }

    #[test]
    fn trend_points_sorted_by_year_per_institution() {
        let ds = dataset(vec![
            rec("Oxford", "United Kingdom", 5, 2021),
            rec("Oxford", "United Kingdom", 4, 2019),
            rec("Harvard", "United States", 1, 2019),
            rec("Oxford", "United Kingdom", 6, 2020),
        ]);
        let sel: Vec<usize> = (0..ds.len()).collect();
        let series = trend_series(&ds, &sel);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].0, "Oxford");
        assert_eq!(series[0].1, vec![(2019, 4), (2020, 6), (2021, 5)]);
        assert_eq!(series[1].0, "Harvard");
        assert_eq!(series[1].1, vec![(2019, 1)]);
    }

    #[test]
    fn trend_single_year_selection_gives_one_point_each() {
        let ds = dataset(vec![
            rec("A", "X", 1, 2020),
            rec("B", "X", 2, 2020),
            rec("A", "X", 3, 2021),
        ]);
        // Mirror the dashboard: trend over the year-filtered selection.
        let sel = vec![0usize, 1];
        let series = trend_series(&ds, &sel);
        assert!(series.iter().all(|(_, pts)| pts.len() == 1));
    }
}
