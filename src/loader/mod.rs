mod delimited;
mod infer;
mod workbook;

use std::path::Path;

use log::info;

use crate::conf::LoaderConfig;
use crate::core::QuarryError;
use crate::table::Table;

use infer::{build_columns, dedupe_headers};

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// Header row plus column-major cells, nulls already resolved.
pub(crate) struct Grid {
    pub headers: Vec<String>,
    pub columns: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Spreadsheet,
}

impl FileFormat {
    /// Picks the decoder from the file name extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Result<Self, QuarryError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| {
                QuarryError::UnsupportedFormat(format!("'{}' has no file extension", filename))
            })?;

        if extension == "csv" {
            Ok(FileFormat::Csv)
        } else if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
            Ok(FileFormat::Spreadsheet)
        } else {
            Err(QuarryError::UnsupportedFormat(format!(
                "'.{}' is neither CSV nor a spreadsheet",
                extension
            )))
        }
    }
}

/// Turns uploaded bytes into a typed [`Table`].
#[derive(Debug, Clone, Default)]
pub struct TableLoader {
    config: LoaderConfig,
}

impl TableLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn load(&self, bytes: &[u8], filename: &str) -> Result<Table, QuarryError> {
        let format = FileFormat::from_filename(filename)?;
        let grid = match format {
            FileFormat::Csv => delimited::read_grid(bytes, &self.config)?,
            FileFormat::Spreadsheet => workbook::read_grid(bytes, &self.config)?,
        };

        let headers = dedupe_headers(grid.headers);
        let columns = build_columns(headers, grid.columns, &self.config);
        let table = Table::from_columns(columns)?;

        info!(
            "Loaded '{}' ({:?}): {} rows x {} columns",
            filename,
            format,
            table.num_rows(),
            table.num_columns()
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ColumnKind;
    use rstest::rstest;

    #[rstest]
    #[case::csv("sales.csv", FileFormat::Csv)]
    #[case::upper("SALES.CSV", FileFormat::Csv)]
    #[case::xlsx("report.xlsx", FileFormat::Spreadsheet)]
    #[case::xls("legacy.xls", FileFormat::Spreadsheet)]
    #[case::ods("calc.ods", FileFormat::Spreadsheet)]
    fn test_format_from_filename(#[case] name: &str, #[case] expected: FileFormat) {
        assert_eq!(FileFormat::from_filename(name).unwrap(), expected);
    }

    #[rstest]
    #[case::json("data.json")]
    #[case::none("README")]
    #[case::parquet("data.parquet")]
    fn test_unsupported_formats(#[case] name: &str) {
        assert!(matches!(
            FileFormat::from_filename(name),
            Err(QuarryError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_csv_infers_kinds() {
        let bytes = b"age,income,city,joined,active\n\
                      31,1200.5,Oslo,2024-01-02,true\n\
                      45,,Rome,2023-12-31,false\n";
        let table = TableLoader::default().load(bytes, "people.csv").unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(
            table.kinds(),
            &[
                ColumnKind::Integer,
                ColumnKind::Float,
                ColumnKind::Text,
                ColumnKind::Datetime,
                ColumnKind::Boolean,
            ]
        );
        assert_eq!(table.null_count("income").unwrap(), 1);
    }

    #[test]
    fn test_load_dedupes_headers() {
        let table = TableLoader::default().load(b"x,x\n1,2\n", "dup.csv").unwrap();
        assert_eq!(table.column_names(), vec!["x", "x.1"]);
    }

    #[test]
    fn test_load_header_only_csv() {
        let table = TableLoader::default().load(b"a,b\n", "empty.csv").unwrap();
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.kinds(), &[ColumnKind::Text, ColumnKind::Text]);
    }

    #[test]
    fn test_custom_null_values() {
        let loader = TableLoader::new(LoaderConfig {
            null_values: vec!["-".to_string()],
            ..LoaderConfig::default()
        });
        let table = loader.load(b"n\n1\n-\n", "dash.csv").unwrap();
        assert_eq!(table.kinds(), &[ColumnKind::Integer]);
        assert_eq!(table.null_count("n").unwrap(), 1);
    }
}
