use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray, TimestampMillisecondArray};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;

use crate::conf::LoaderConfig;
use crate::core::ColumnKind;

/// Picks the narrowest kind every non-missing value parses as.
///
/// Order: integer, float, boolean, datetime, falling back to text. A column
/// with no values at all is text.
pub(crate) fn infer_kind(values: &[Option<String>], config: &LoaderConfig) -> ColumnKind {
    let mut present = values.iter().flatten().map(|v| v.trim()).peekable();
    if present.peek().is_none() {
        return ColumnKind::Text;
    }
    let present: Vec<&str> = present.collect();

    if present.iter().all(|v| v.parse::<i64>().is_ok()) {
        ColumnKind::Integer
    } else if present.iter().all(|v| v.parse::<f64>().is_ok()) {
        ColumnKind::Float
    } else if present.iter().all(|v| parse_bool(v).is_some()) {
        ColumnKind::Boolean
    } else if present
        .iter()
        .all(|v| parse_datetime(v, &config.datetime_formats).is_some())
    {
        ColumnKind::Datetime
    } else {
        ColumnKind::Text
    }
}

/// Builds the Arrow array for a column already classified by [`infer_kind`].
pub(crate) fn build_array(
    kind: ColumnKind,
    values: &[Option<String>],
    config: &LoaderConfig,
) -> ArrayRef {
    let trimmed = || values.iter().map(|v| v.as_deref().map(str::trim));
    match kind {
        ColumnKind::Integer => Arc::new(
            trimmed()
                .map(|v| v.and_then(|s| s.parse::<i64>().ok()))
                .collect::<Int64Array>(),
        ),
        ColumnKind::Float => Arc::new(
            trimmed()
                .map(|v| v.and_then(|s| s.parse::<f64>().ok()))
                .collect::<Float64Array>(),
        ),
        ColumnKind::Boolean => Arc::new(
            trimmed()
                .map(|v| v.and_then(parse_bool))
                .collect::<BooleanArray>(),
        ),
        ColumnKind::Datetime => Arc::new(
            trimmed()
                .map(|v| {
                    v.and_then(|s| parse_datetime(s, &config.datetime_formats))
                        .map(|dt| dt.and_utc().timestamp_millis())
                })
                .collect::<TimestampMillisecondArray>(),
        ),
        ColumnKind::Text => Arc::new(values.iter().map(|v| v.as_deref()).collect::<StringArray>()),
    }
}

/// Classifies and builds every column of a decoded grid.
pub(crate) fn build_columns(
    headers: Vec<String>,
    columns: Vec<Vec<Option<String>>>,
    config: &LoaderConfig,
) -> Vec<(String, ArrayRef)> {
    headers
        .into_iter()
        .zip(columns)
        .map(|(name, values)| {
            let kind = infer_kind(&values, config);
            debug!("column '{}' inferred as {}", name, kind.name());
            let array = build_array(kind, &values, config);
            (name, array)
        })
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_datetime(value: &str, formats: &[String]) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    formats.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(value, format)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(value, format)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    })
}

/// Makes header names unique the way pandas does: `a`, `a.1`, `a.2`.
/// Blank headers become `Unnamed: <index>`.
pub(crate) fn dedupe_headers(raw: Vec<String>) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(raw.len());
    for (index, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {index}")
        } else {
            name
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while names.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        names.push(candidate);
    }
    names
}
