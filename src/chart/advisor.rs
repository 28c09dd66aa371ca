use log::debug;

use crate::core::QuarryError;
use crate::governor::ResultTable;
use crate::table::Table;

use super::spec::{Chart, ChartKind, ChartSpec};

/// Validates explicit axis choices against the result's columns.
///
/// `y` is required for every kind except histograms, which ignore it. Empty
/// strings count as "not chosen".
pub fn render(
    result: &ResultTable,
    kind: ChartKind,
    x: &str,
    y: Option<&str>,
    color: Option<&str>,
) -> Result<Chart, QuarryError> {
    let table = &result.table;
    let y = y.filter(|c| !c.is_empty());
    let color = color.filter(|c| !c.is_empty());

    require_column(table, "x", Some(x).filter(|c| !c.is_empty()), kind)?;

    let y = if kind.requires_y() {
        Some(require_column(table, "y", y, kind)?)
    } else {
        if let Some(ignored) = y {
            debug!("histogram ignores y column '{}'", ignored);
        }
        None
    };

    if let Some(color) = color {
        require_column(table, "color", Some(color), kind)?;
    }

    let mut spec = ChartSpec::new(kind, x, y);
    spec.color = color.map(String::from);
    Ok(Chart {
        spec,
        data: table.clone(),
        truncated: result.truncated,
    })
}

fn require_column<'a>(
    table: &Table,
    axis: &str,
    column: Option<&'a str>,
    kind: ChartKind,
) -> Result<&'a str, QuarryError> {
    let column = column.ok_or_else(|| {
        QuarryError::InvalidAxis(format!("{} chart needs a {} column", kind.name(), axis))
    })?;
    if !table.has_column(column) {
        return Err(QuarryError::InvalidAxis(format!(
            "{} column '{}' is not in the result",
            axis, column
        )));
    }
    Ok(column)
}

/// Proposes charts from the column kinds, highest priority first:
///
/// 1. scatter of the first two numeric columns,
/// 2. bar of the first text column against the first numeric one,
/// 3. histogram when there is exactly one numeric column.
///
/// Callers default to the first suggestion; the list is empty when nothing fits.
pub fn suggest(table: &Table) -> Vec<ChartSpec> {
    let numeric: Vec<&str> = table
        .columns()
        .filter(|(_, kind)| kind.is_numeric())
        .map(|(name, _)| name)
        .collect();
    let categorical = table
        .columns()
        .find(|(_, kind)| kind.is_categorical())
        .map(|(name, _)| name);

    let mut suggestions = Vec::new();
    if let [first, second, ..] = numeric.as_slice() {
        suggestions.push(ChartSpec::new(ChartKind::Scatter, first, Some(*second)));
    }
    if let (Some(category), Some(first)) = (categorical, numeric.first()) {
        suggestions.push(ChartSpec::new(ChartKind::Bar, category, Some(*first)));
    }
    if let [only] = numeric.as_slice() {
        suggestions.push(ChartSpec::new(ChartKind::Histogram, only, None));
    }
    suggestions
}
