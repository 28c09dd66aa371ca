use serde::{Deserialize, Serialize};

use crate::table::Table;

pub const DEFAULT_BINS: u32 = 40;
pub const MIN_BINS: u32 = 10;
pub const MAX_BINS: u32 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Scatter,
    Line,
    Bar,
    Box,
    Histogram,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Scatter,
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Box,
        ChartKind::Histogram,
    ];

    /// Every kind but the histogram plots `y` against `x`.
    pub fn requires_y(&self) -> bool {
        !matches!(self, ChartKind::Histogram)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::Scatter => "scatter",
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Box => "box",
            ChartKind::Histogram => "histogram",
        }
    }
}

/// Renderer-independent description of a chart: kind plus column bindings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub x: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Bin count, histograms only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bins: Option<u32>,
}

impl ChartSpec {
    pub(crate) fn new(kind: ChartKind, x: &str, y: Option<&str>) -> Self {
        Self {
            kind,
            x: x.to_string(),
            y: y.map(String::from),
            color: None,
            bins: (kind == ChartKind::Histogram).then_some(DEFAULT_BINS),
        }
    }

    /// Sets the histogram bin count, clamped to 10..=100. No effect on other kinds.
    pub fn with_bins(mut self, bins: u32) -> Self {
        if self.kind == ChartKind::Histogram {
            self.bins = Some(bins.clamp(MIN_BINS, MAX_BINS));
        }
        self
    }
}

/// A validated spec together with the rows it draws.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub spec: ChartSpec,
    pub data: Table,
    /// The rows were cut by the row cap; the caller decides whether to warn.
    pub truncated: bool,
}
