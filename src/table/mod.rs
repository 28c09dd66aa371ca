mod export;
mod format;
mod table;

pub use table::Table;
