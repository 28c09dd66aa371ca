mod advisor;
mod spec;

pub use advisor::{render, suggest};
pub use spec::{Chart, ChartKind, ChartSpec, DEFAULT_BINS, MAX_BINS, MIN_BINS};
