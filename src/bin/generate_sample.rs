use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `0..bound`.
    fn next_below(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }
}

/// Jittered ordering: listing order plus a small random offset per entry,
/// so each edition reshuffles the field a little without wild jumps.
fn jittered_order(n: usize, rng: &mut SimpleRng) -> Vec<usize> {
    let mut keyed: Vec<(usize, usize)> = (0..n).map(|u| (u + rng.next_below(5), u)).collect();
    keyed.sort();
    keyed.into_iter().map(|(_, u)| u).collect()
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // (institution, country, region)
    let universities: &[(&str, &str, &str)] = &[
        ("Harvard University", "United States", "North America"),
        ("Massachusetts Institute of Technology", "United States", "North America"),
        ("Stanford University", "United States", "North America"),
        ("California Institute of Technology", "United States", "North America"),
        ("Princeton University", "United States", "North America"),
        ("University of Oxford", "United Kingdom", "Europe"),
        ("University of Cambridge", "United Kingdom", "Europe"),
        ("Imperial College London", "United Kingdom", "Europe"),
        ("ETH Zürich", "Switzerland", "Europe"),
        ("EPFL", "Switzerland", "Europe"),
        ("Technical University of Munich", "Germany", "Europe"),
        ("Heidelberg University", "Germany", "Europe"),
        ("University of Tokyo", "Japan", "Asia"),
        ("Kyoto University", "Japan", "Asia"),
        ("Tsinghua University", "China", "Asia"),
        ("Peking University", "China", "Asia"),
        ("National University of Singapore", "Singapore", "Asia"),
        ("University of Toronto", "Canada", "North America"),
        ("University of Melbourne", "Australia", "Oceania"),
        ("Sorbonne University", "France", "Europe"),
    ];
    let years = [2018i64, 2019, 2020, 2021];

    let mut all_institution: Vec<String> = Vec::new();
    let mut all_country: Vec<String> = Vec::new();
    let mut all_region: Vec<String> = Vec::new();
    let mut all_rank: Vec<i64> = Vec::new();
    let mut all_year: Vec<i64> = Vec::new();
    let mut all_score: Vec<f64> = Vec::new();

    for &year in &years {
        let order = jittered_order(universities.len(), &mut rng);

        for (pos, &u) in order.iter().enumerate() {
            let (institution, country, region) = universities[u];
            let rank = (pos + 1) as i64;
            let score = 100.0 - rank as f64 * 1.8 - rng.next_f64() * 1.5;

            all_institution.push(institution.to_string());
            all_country.push(country.to_string());
            all_region.push(region.to_string());
            all_rank.push(rank);
            all_year.push(year);
            all_score.push((score * 10.0).round() / 10.0);
        }
    }

    // Build Arrow arrays
    let institution_array = StringArray::from(
        all_institution.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
    );
    let country_array = StringArray::from(
        all_country.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
    );
    let region_array = StringArray::from(
        all_region.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
    );
    let rank_array = Int64Array::from(all_rank);
    let year_array = Int64Array::from(all_year);
    let score_array = Float64Array::from(all_score);

    let schema = Arc::new(Schema::new(vec![
        Field::new("institution", DataType::Utf8, false),
        Field::new("country", DataType::Utf8, false),
        Field::new("world_rank", DataType::Int64, false),
        Field::new("year", DataType::Int64, false),
        Field::new("score", DataType::Float64, false),
        Field::new("region", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(institution_array),
            Arc::new(country_array),
            Arc::new(rank_array),
            Arc::new(year_array),
            Arc::new(score_array),
            Arc::new(region_array),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let output_path = "university_rankings.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {} records ({} universities × {} years) to {output_path}",
        universities.len() * years.len(),
        universities.len(),
        years.len()
    );
}
