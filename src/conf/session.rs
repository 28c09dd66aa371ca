use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    #[serde(default = "SessionConfig::default_max_viz_rows")]
    pub max_viz_rows: usize,
    #[serde(default = "SessionConfig::default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default = "SessionConfig::default_page_size")]
    pub page_size: usize,
    #[serde(default = "SessionConfig::default_preview_rows")]
    pub preview_rows: usize,
    #[serde(default = "SessionConfig::default_histogram_bins")]
    pub histogram_bins: u32,
}

impl SessionConfig {
    fn default_max_viz_rows() -> usize {
        50_000
    }

    fn default_history_capacity() -> usize {
        5
    }

    fn default_page_size() -> usize {
        50
    }

    fn default_preview_rows() -> usize {
        100
    }

    fn default_histogram_bins() -> u32 {
        40
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_viz_rows: Self::default_max_viz_rows(),
            history_capacity: Self::default_history_capacity(),
            page_size: Self::default_page_size(),
            preview_rows: Self::default_preview_rows(),
            histogram_bins: Self::default_histogram_bins(),
        }
    }
}
