//! snapshot/mod.rs
//! Structural view over raw snapshot values: shape classification and the
//! path builder that names every leaf counter.

pub mod path;
pub mod shape;

pub use path::*;
pub use shape::*;
