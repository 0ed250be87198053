use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single pass-through cell in an extra column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value for columns the dashboard does not
/// interpret (anything beyond institution / country / world_rank / year).
/// Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.2}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// RankingRecord – one row of the source table
// ---------------------------------------------------------------------------

/// One institution's rank in one year (one row of the source table).
/// The four named fields are validated at load time; everything else the
/// source carries rides along in `extra` untouched.
#[derive(Debug, Clone)]
pub struct RankingRecord {
    pub institution: String,
    pub country: String,
    /// World rank, ≥ 1, lower is better.
    pub world_rank: u32,
    /// Ranking edition.
    pub year: i32,
    /// Pass-through columns: column_name → value.
    pub extra: BTreeMap<String, CellValue>,
}

// ---------------------------------------------------------------------------
// RankingDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table with pre-computed filter domains. Immutable after
/// load; the dashboard only ever reads from it.
#[derive(Debug, Clone)]
pub struct RankingDataset {
    /// All records in source order.
    pub records: Vec<RankingRecord>,
    /// Distinct countries present, sorted.
    pub countries: BTreeSet<String>,
    /// (min, max) year present; bounds for the year slider.
    pub year_range: (i32, i32),
    /// Ordered names of the pass-through columns.
    pub extra_columns: Vec<String>,
}

impl RankingDataset {
    /// Build the filter domains from loaded records.
    /// An empty record list has no year range, so this returns `None`
    /// instead of inventing bounds; loaders turn that into a schema error.
    pub fn from_records(records: Vec<RankingRecord>) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let mut countries = BTreeSet::new();
        let mut extra_columns_set: BTreeSet<String> = BTreeSet::new();
        let mut year_min = i32::MAX;
        let mut year_max = i32::MIN;

        for rec in &records {
            countries.insert(rec.country.clone());
            year_min = year_min.min(rec.year);
            year_max = year_max.max(rec.year);
            for col in rec.extra.keys() {
                extra_columns_set.insert(col.clone());
            }
        }

        Some(RankingDataset {
            records,
            countries,
            year_range: (year_min, year_max),
            extra_columns: extra_columns_set.into_iter().collect(),
        })
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

    fn rec(institution: &str, country: &str, rank: u32, year: i32) -> RankingRecord {
        RankingRecord {
            institution: institution.into(),
            country: country.into(),
            world_rank: rank,
            year,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn from_records_builds_domains() {
        let mut with_extra = rec("MIT", "United States", 1, 2021);
        with_extra
            .extra
            .insert("score".into(), CellValue::Float(98.4));

        let ds = RankingDataset::from_records(vec![
            rec("Oxford", "United Kingdom", 2, 2019),
            rec("ETH Zürich", "Switzerland", 6, 2021),
            with_extra,
        ])
        .unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.year_range, (2019, 2021));
        assert!(ds.countries.contains("Switzerland"));
        assert_eq!(ds.countries.len(), 3);
        assert_eq!(ds.extra_columns, vec!["score".to_string()]);
    }

    #[test]
    fn from_records_rejects_empty() {
        assert!(RankingDataset::from_records(Vec::new()).is_none());
    }

    #[test]
    fn cell_value_ordering_is_total() {
        let mut set = BTreeSet::new();
        set.insert(CellValue::Float(1.5));
        set.insert(CellValue::Float(f64::NAN));
        set.insert(CellValue::Integer(3));
        set.insert(CellValue::Null);
        set.insert(CellValue::String("x".into()));
        assert_eq!(set.len(), 5);
        assert_eq!(set.iter().next(), Some(&CellValue::Null));
    }
}
