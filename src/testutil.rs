//! Test and benchmark utilities.
//!
//! This module is only available when the `testutil` feature is enabled.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

use crate::table::Table;

const LABELS: [&str; 3] = ["red", "green", "blue"];
const CITIES: [&str; 5] = ["Oslo", "Rome", "Lima", "Pune", "Kyiv"];

/// CSV text that loads into exactly [`people_table`].
pub const PEOPLE_CSV: &str = "\
age,income,city,segment
23,1500.0,Oslo,a
31,2200.5,Rome,b
45,,Oslo,
58,4100.0,Lima,a
37,3000.0,Oslo,b
29,1800.0,Rome,a
";

/// Six people: `age` (integer), `income` (float, one missing), `city` (three
/// distinct values) and `segment` (text, one missing).
pub fn people_table() -> Table {
    Table::from_columns(vec![
        (
            "age".to_string(),
            Arc::new(Int64Array::from(vec![23, 31, 45, 58, 37, 29])) as ArrayRef,
        ),
        (
            "income".to_string(),
            Arc::new(Float64Array::from(vec![
                Some(1500.0),
                Some(2200.5),
                None,
                Some(4100.0),
                Some(3000.0),
                Some(1800.0),
            ])) as ArrayRef,
        ),
        (
            "city".to_string(),
            Arc::new(StringArray::from(vec![
                "Oslo", "Rome", "Oslo", "Lima", "Oslo", "Rome",
            ])) as ArrayRef,
        ),
        (
            "segment".to_string(),
            Arc::new(StringArray::from(vec![
                Some("a"),
                Some("b"),
                None,
                Some("a"),
                Some("b"),
                Some("a"),
            ])) as ArrayRef,
        ),
    ])
    .unwrap()
}

/// `n` complete rows: `id` = 0..n, `value` = 1.5 * id, `label` cycling
/// through three colors.
pub fn sequence_table(n: usize) -> Table {
    let ids: Int64Array = (0..n as i64).collect::<Vec<_>>().into();
    let values: Float64Array = (0..n).map(|i| i as f64 * 1.5).collect::<Vec<_>>().into();
    let labels: StringArray = (0..n).map(|i| Some(LABELS[i % LABELS.len()])).collect();
    Table::from_columns(vec![
        ("id".to_string(), Arc::new(ids) as ArrayRef),
        ("value".to_string(), Arc::new(values) as ArrayRef),
        ("label".to_string(), Arc::new(labels) as ArrayRef),
    ])
    .unwrap()
}

/// CSV text that loads into exactly [`sequence_table`].
pub fn sequence_csv(n: usize) -> String {
    let mut out = String::from("id,value,label\n");
    for i in 0..n {
        writeln!(out, "{},{:.1},{}", i, i as f64 * 1.5, LABELS[i % LABELS.len()]).unwrap();
    }
    out
}

/// Seeded random table for benchmarks: integer `age`, float `score` with
/// roughly 5% missing, and `city`.
pub fn random_table(n: usize, seed: u64) -> Table {
    let mut rng = StdRng::seed_from_u64(seed);
    let ages: Int64Array = (0..n).map(|_| rng.gen_range(18..90)).collect::<Vec<i64>>().into();
    let scores: Float64Array = (0..n)
        .map(|_| (!rng.gen_bool(0.05)).then(|| rng.gen_range(0.0..100.0)))
        .collect::<Vec<Option<f64>>>()
        .into();
    let cities: StringArray = (0..n)
        .map(|_| Some(CITIES[rng.gen_range(0..CITIES.len())]))
        .collect();
    Table::from_columns(vec![
        ("age".to_string(), Arc::new(ages) as ArrayRef),
        ("score".to_string(), Arc::new(scores) as ArrayRef),
        ("city".to_string(), Arc::new(cities) as ArrayRef),
    ])
    .unwrap()
}

/// Writes `contents` to `name` inside a fresh temporary directory. The
/// directory is removed when the returned guard drops.
pub fn write_temp_file(name: &str, contents: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}
