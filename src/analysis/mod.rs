pub mod distribution;
pub mod error;
pub mod hourly;
pub mod loader;
pub mod plot;
