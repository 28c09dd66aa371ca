use csv::{QuoteStyle, WriterBuilder};

use crate::core::QuarryError;

use super::Table;

impl Table {
    /// Serialises the table as UTF-8 CSV: a header row of column names, then
    /// one record per row. Nulls become empty fields; fields holding the
    /// delimiter, a quote or a line break are quoted.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, QuarryError> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .from_writer(Vec::new());

        writer.write_record(self.column_names())?;

        let columns: Vec<Vec<Option<String>>> = self
            .column_names()
            .into_iter()
            .map(|name| self.display_values(name))
            .collect::<Result<_, _>>()?;

        for row in 0..self.num_rows() {
            writer.write_record(
                columns
                    .iter()
                    .map(|values| values[row].as_deref().unwrap_or("")),
            )?;
        }

        writer
            .into_inner()
            .map_err(|e| QuarryError::IoError(e.to_string()))
    }
}
