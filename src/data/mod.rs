/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate file → RankingDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ RankingDataset │  Vec<RankingRecord>, filter domains
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  country set + year → selected indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  top-10, country distribution, trend series
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;

#[cfg(test)]
mod pipeline_tests {
    //! End-to-end checks over filter + aggregators, mirroring how the
    //! dashboard wires them per render pass.

    use std::collections::{BTreeMap, BTreeSet};

    use super::aggregate::{country_distribution, top_n, trend_series};
    use super::filter::{all_countries, select_records};
    use super::model::{RankingDataset, RankingRecord};

    fn rec(institution: &str, country: &str, rank: u32, year: i32) -> RankingRecord {
        RankingRecord {
            institution: institution.into(),
            country: country.into(),
            world_rank: rank,
            year,
            extra: BTreeMap::new(),
        }
    }

    fn fixture() -> RankingDataset {
        RankingDataset::from_records(vec![
            rec("A", "US", 1, 2020),
            rec("B", "US", 2, 2020),
            rec("C", "UK", 1, 2021),
        ])
        .unwrap()
    }

    #[test]
    fn worked_example_us_uk_2020() {
        let ds = fixture();
        let countries: BTreeSet<String> = ["US", "UK"].iter().map(|s| s.to_string()).collect();

        let sel = select_records(&ds, &countries, 2020);
        assert_eq!(sel, vec![0, 1]);

        let top = top_n(&ds, &sel, 2);
        assert_eq!(top, vec![0, 1]);
        assert_eq!(ds.records[top[0]].institution, "A");
        assert_eq!(ds.records[top[1]].institution, "B");

        let dist = country_distribution(&ds, &sel);
        assert_eq!(dist, vec![("US".to_string(), 2)]);
    }

    #[test]
    fn no_matching_year_gives_three_empty_outputs() {
        let ds = fixture();
        let sel = select_records(&ds, &all_countries(&ds), 2099);
        assert!(sel.is_empty());
        assert!(top_n(&ds, &sel, 10).is_empty());
        assert!(country_distribution(&ds, &sel).is_empty());
        assert!(trend_series(&ds, &sel).is_empty());
    }

    #[test]
    fn selection_contains_exactly_the_matching_records() {
        let ds = fixture();
        let countries: BTreeSet<String> = ["US"].iter().map(|s| s.to_string()).collect();
        let sel = select_records(&ds, &countries, 2020);

        for &i in &sel {
            let rec = &ds.records[i];
            assert!(countries.contains(&rec.country));
            assert_eq!(rec.year, 2020);
        }
        let expected: Vec<usize> = ds
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.year == 2020 && countries.contains(&r.country))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(sel, expected);
    }

    #[test]
    fn equal_ranks_keep_original_relative_order_through_top_n() {
        let ds = RankingDataset::from_records(vec![
            rec("First", "US", 3, 2020),
            rec("Second", "US", 3, 2020),
        ])
        .unwrap();
        let sel = select_records(&ds, &all_countries(&ds), 2020);
        let top = top_n(&ds, &sel, 10);
        assert_eq!(ds.records[top[0]].institution, "First");
        assert_eq!(ds.records[top[1]].institution, "Second");
    }

    #[test]
    fn trend_over_multi_year_slice_is_year_monotonic() {
        let ds = RankingDataset::from_records(vec![
            rec("X", "US", 5, 2021),
            rec("X", "US", 3, 2019),
            rec("X", "US", 4, 2020),
            rec("Y", "UK", 9, 2020),
        ])
        .unwrap();
        let sel: Vec<usize> = (0..ds.len()).collect();
        for (_, points) in trend_series(&ds, &sel) {
            for pair in points.windows(2) {
                assert!(pair[0].0 <= pair[1].0);
            }
        }
    }
}
