//! scheduler/mod.rs
//! Crawl cadence for low-frequency sub-feeds, backed by the store's
//! timestamp and cache side tables.

pub mod policy;

pub use policy::*;
