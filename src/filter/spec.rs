use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::QuarryError;
use crate::table::Table;

/// A single-column condition a row must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Predicate {
    /// Inclusive numeric bounds. Nulls never match.
    Range { lo: f64, hi: f64 },
    /// Rendered cell value must be one of `allowed`; nulls match only when
    /// `include_missing` is set.
    Set {
        allowed: BTreeSet<String>,
        #[serde(default)]
        include_missing: bool,
    },
}

impl Predicate {
    /// Bounds in ascending order.
    pub fn ordered_bounds(lo: f64, hi: f64) -> (f64, f64) {
        if lo > hi { (hi, lo) } else { (lo, hi) }
    }
}

/// At most one predicate per column; a row is kept when all of them hold.
///
/// [`FilterSpec::for_table`] covers every column. A spec may also name only
/// some columns, and columns it leaves out are not filtered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    predicates: BTreeMap<String, Predicate>,
}

impl FilterSpec {
    /// The widest spec for `table`: full observed range for numeric columns,
    /// every distinct value (and missing values) for the rest.
    pub fn for_table(table: &Table) -> Result<Self, QuarryError> {
        let mut predicates = BTreeMap::new();
        for (name, kind) in table.columns() {
            let predicate = if kind.is_numeric() {
                let (lo, hi) = observed_bounds(table, name)?
                    .unwrap_or((f64::NEG_INFINITY, f64::INFINITY));
                Predicate::Range { lo, hi }
            } else {
                Predicate::Set {
                    allowed: table.distinct_values(name)?,
                    include_missing: true,
                }
            };
            predicates.insert(name.to_string(), predicate);
        }
        Ok(Self { predicates })
    }

    pub fn predicate(&self, column: &str) -> Option<&Predicate> {
        self.predicates.get(column)
    }

    pub fn predicates(&self) -> impl Iterator<Item = (&str, &Predicate)> {
        self.predicates.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Narrows a numeric column. Bounds are swapped if reversed and clamped to
    /// the values observed in `table`.
    pub fn set_range(
        &mut self,
        table: &Table,
        column: &str,
        lo: f64,
        hi: f64,
    ) -> Result<(), QuarryError> {
        let kind = table.kind_of(column)?;
        if !kind.is_numeric() {
            return Err(QuarryError::InvalidFilter(format!(
                "range filter on {} column '{}'",
                kind.name(),
                column
            )));
        }
        let (mut lo, mut hi) = Predicate::ordered_bounds(lo, hi);
        if let Some((min, max)) = observed_bounds(table, column)? {
            lo = lo.clamp(min, max);
            hi = hi.clamp(min, max);
        }
        self.predicates
            .insert(column.to_string(), Predicate::Range { lo, hi });
        Ok(())
    }

    /// Restricts a column to the given rendered values.
    pub fn set_allowed<I, S>(
        &mut self,
        table: &Table,
        column: &str,
        allowed: I,
        include_missing: bool,
    ) -> Result<(), QuarryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        table.index_of(column)?;
        self.predicates.insert(
            column.to_string(),
            Predicate::Set {
                allowed: allowed.into_iter().map(Into::into).collect(),
                include_missing,
            },
        );
        Ok(())
    }
}

/// Min and max of the non-null values, `None` when the column has none.
fn observed_bounds(table: &Table, column: &str) -> Result<Option<(f64, f64)>, QuarryError> {
    let bounds = table
        .numeric_values(column)?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        });
    Ok(bounds)
}
