pub mod chart;
pub mod conf;
pub mod core;
pub mod engine;
pub mod filter;
pub mod governor;
pub mod loader;
pub mod session;
pub mod stats;
pub mod table;

#[cfg(feature = "testutil")]
pub mod testutil;
