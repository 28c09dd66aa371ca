mod config;
mod loader;
mod session;

pub use config::Config;
pub use loader::LoaderConfig;
pub use session::SessionConfig;
