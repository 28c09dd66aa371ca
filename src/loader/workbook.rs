use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};

use crate::conf::LoaderConfig;
use crate::core::QuarryError;

use super::Grid;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Decodes the first worksheet of a workbook. The first row is the header.
pub(crate) fn read_grid(bytes: &[u8], config: &LoaderConfig) -> Result<Grid, QuarryError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| QuarryError::Parse("workbook has no worksheets".to_string()))??;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| QuarryError::Parse("worksheet is empty".to_string()))?
        .iter()
        .map(|cell| cell_text(cell).unwrap_or_default())
        .collect();

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (column, cell) in columns.iter_mut().zip(row.iter()) {
            let text = cell_text(cell).filter(|t| !config.is_null(t));
            column.push(text);
        }
    }

    Ok(Grid { headers, columns })
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|dt| dt.format(DATETIME_FORMAT).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::Float(3.0)), Some("3".to_string()));
        assert_eq!(cell_text(&Data::Float(2.5)), Some("2.5".to_string()));
        assert_eq!(cell_text(&Data::Int(-4)), Some("-4".to_string()));
        assert_eq!(cell_text(&Data::Bool(true)), Some("true".to_string()));
        assert_eq!(
            cell_text(&Data::String("Oslo".into())),
            Some("Oslo".to_string())
        );
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let result = read_grid(b"definitely not a workbook", &LoaderConfig::default());
        assert!(matches!(result, Err(QuarryError::Parse(_))));
    }
}
