pub mod aggregators;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod loader;
pub mod locations;
pub mod output;
pub mod report;
pub mod stats;
pub mod trips;
