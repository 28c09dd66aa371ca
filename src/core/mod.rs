mod args;
mod error;
mod logger;
mod schema;

pub use args::CliArgs;
pub use error::QuarryError;
pub use logger::setup_logging;
pub use schema::ColumnKind;
