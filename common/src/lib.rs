pub mod config;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod plot;
pub mod report;
pub mod util;
