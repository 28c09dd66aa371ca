use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum QuarryError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("Cannot parse file: {0}")]
    Parse(String),
    #[error("Query failed: {0}")]
    Query(String),
    #[error("Invalid chart axis: {0}")]
    InvalidAxis(String),
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error("No dataset loaded")]
    NoDataset,
    #[error("No query has been run")]
    NoQueryResult,
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Arrow error: {0}")]
    ArrowError(String),
}

impl From<std::io::Error> for QuarryError {
    fn from(err: std::io::Error) -> Self {
        QuarryError::IoError(err.to_string())
    }
}

impl From<arrow::error::ArrowError> for QuarryError {
    fn from(err: arrow::error::ArrowError) -> Self {
        QuarryError::ArrowError(err.to_string())
    }
}

impl From<datafusion::error::DataFusionError> for QuarryError {
    fn from(err: datafusion::error::DataFusionError) -> Self {
        QuarryError::Query(err.to_string())
    }
}

impl From<csv::Error> for QuarryError {
    fn from(err: csv::Error) -> Self {
        QuarryError::Parse(err.to_string())
    }
}

impl From<calamine::Error> for QuarryError {
    fn from(err: calamine::Error) -> Self {
        QuarryError::Parse(err.to_string())
    }
}
