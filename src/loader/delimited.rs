use csv::ReaderBuilder;

use crate::conf::LoaderConfig;
use crate::core::QuarryError;

use super::Grid;

/// Decodes CSV bytes into a header row and column-major cells.
///
/// Every record must have as many fields as the header; a ragged file is a
/// parse error, never padded.
pub(crate) fn read_grid(bytes: &[u8], config: &LoaderConfig) -> Result<Grid, QuarryError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    if headers.is_empty() {
        return Err(QuarryError::Parse("CSV file has no header row".to_string()));
    }

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (column, field) in columns.iter_mut().zip(record.iter()) {
            column.push((!config.is_null(field)).then(|| field.to_string()));
        }
    }

    Ok(Grid { headers, columns })
}
