//! store/mod.rs
//! Durable state: the counter tree with its timestamp and cache side tables,
//! loaded once at start and rewritten in full after every mutation.

pub mod persist;
pub mod state;
pub mod tree;

pub use persist::*;
pub use state::*;
pub use tree::*;
