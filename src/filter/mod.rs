mod spec;

pub use spec::{FilterSpec, Predicate};

use arrow::array::BooleanArray;
use arrow::compute::{and, filter_record_batch};
use log::debug;

use crate::core::QuarryError;
use crate::table::Table;

/// Rows of `table` satisfying every predicate in `spec`.
///
/// Pure: the source table is untouched and the same inputs always give the
/// same rows. Reversed range bounds are swapped; an empty allowed set yields
/// no rows.
pub fn apply(table: &Table, spec: &FilterSpec) -> Result<Table, QuarryError> {
    let mut mask: Option<BooleanArray> = None;

    for (column, predicate) in spec.predicates() {
        let column_mask = match predicate {
            Predicate::Range { lo, hi } => range_mask(table, column, *lo, *hi)?,
            Predicate::Set {
                allowed,
                include_missing,
            } => table
                .display_values(column)?
                .iter()
                .map(|value| {
                    Some(match value {
                        Some(v) => allowed.contains(v),
                        None => *include_missing,
                    })
                })
                .collect(),
        };
        mask = Some(match mask {
            None => column_mask,
            Some(acc) => and(&acc, &column_mask)?,
        });
    }

    let Some(mask) = mask else {
        return Ok(table.clone());
    };
    let batch = filter_record_batch(table.batch(), &mask)?;
    debug!(
        "filter kept {} of {} rows",
        batch.num_rows(),
        table.num_rows()
    );
    Table::try_new(batch)
}

fn range_mask(table: &Table, column: &str, lo: f64, hi: f64) -> Result<BooleanArray, QuarryError> {
    let (lo, hi) = Predicate::ordered_bounds(lo, hi);
    let values = table.numeric_values(column).map_err(|e| match e {
        QuarryError::InvalidFilter(msg) => QuarryError::InvalidFilter(format!("range filter: {msg}")),
        other => other,
    })?;
    Ok(values
        .into_iter()
        .map(|v| Some(v.is_some_and(|v| v >= lo && v <= hi)))
        .collect())
}
