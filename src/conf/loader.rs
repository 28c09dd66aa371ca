use serde::{Deserialize, Serialize};

/// Decoding rules shared by the CSV and spreadsheet readers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoaderConfig {
    /// Cell texts read as missing values.
    #[serde(default = "LoaderConfig::default_null_values")]
    pub null_values: Vec<String>,
    /// chrono patterns tried, in order, when inferring datetime columns.
    #[serde(default = "LoaderConfig::default_datetime_formats")]
    pub datetime_formats: Vec<String>,
}

impl LoaderConfig {
    fn default_null_values() -> Vec<String> {
        ["", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A", "<NA>"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn default_datetime_formats() -> Vec<String> {
        [
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M",
            "%Y-%m-%d",
            "%Y/%m/%d",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    pub fn is_null(&self, value: &str) -> bool {
        let trimmed = value.trim();
        self.null_values.iter().any(|n| n == trimmed)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            null_values: Self::default_null_values(),
            datetime_formats: Self::default_datetime_formats(),
        }
    }
}
