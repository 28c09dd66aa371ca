use ahash::AHashSet;
use serde::Serialize;

use crate::core::{ColumnKind, QuarryError};
use crate::table::Table;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
    /// Share of missing cells, in percent, two decimals.
    pub missing_pct: f64,
    /// Distinct non-null values.
    pub unique: usize,
}

/// Overview of a loaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: usize,
    pub missing: usize,
    pub column_profiles: Vec<ColumnProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation; needs at least two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Pearson coefficients between numeric columns, pairwise complete.
/// `None` where fewer than two rows overlap or a column is constant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

pub fn profile(table: &Table) -> Result<DatasetProfile, QuarryError> {
    let rows = table.num_rows();
    let column_profiles: Vec<ColumnProfile> = table
        .columns()
        .map(|(name, kind)| -> Result<ColumnProfile, QuarryError> {
            let values = table.display_values(name)?;
            let missing = values.iter().filter(|v| v.is_none()).count();
            let unique = values.iter().flatten().collect::<AHashSet<_>>().len();
            let missing_pct = if rows == 0 {
                0.0
            } else {
                (missing as f64 / rows as f64 * 10_000.0).round() / 100.0
            };
            Ok(ColumnProfile {
                name: name.to_string(),
                kind,
                missing,
                missing_pct,
                unique,
            })
        })
        .collect::<Result<_, _>>()?;

    Ok(DatasetProfile {
        rows,
        columns: table.num_columns(),
        missing: column_profiles.iter().map(|p| p.missing).sum(),
        column_profiles,
    })
}

pub fn describe(table: &Table) -> Result<Vec<NumericSummary>, QuarryError> {
    table
        .columns()
        .filter(|(_, kind)| kind.is_numeric())
        .map(|(name, _)| -> Result<NumericSummary, QuarryError> {
            let values: Vec<f64> = table.numeric_values(name)?.into_iter().flatten().collect();
            let count = values.len();
            let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);
            let std = mean.filter(|_| count > 1).map(|m| {
                let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
                (ss / (count - 1) as f64).sqrt()
            });
            Ok(NumericSummary {
                name: name.to_string(),
                count,
                mean,
                std,
                min: values.iter().copied().reduce(f64::min),
                max: values.iter().copied().reduce(f64::max),
            })
        })
        .collect()
}

pub fn correlation(table: &Table) -> Result<Option<CorrelationMatrix>, QuarryError> {
    let mut numeric: Vec<(&str, Vec<Option<f64>>)> = Vec::new();
    for (name, kind) in table.columns() {
        if kind.is_numeric() {
            numeric.push((name, table.numeric_values(name)?));
        }
    }

    if numeric.len() < 2 {
        return Ok(None);
    }

    let values: Vec<Vec<Option<f64>>> = numeric
        .iter()
        .map(|(_, a)| numeric.iter().map(|(_, b)| pearson(a, b)).collect())
        .collect();

    Ok(Some(CorrelationMatrix {
        columns: numeric.iter().map(|(name, _)| name.to_string()).collect(),
        values,
    }))
}

fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}
