//! Types, traits and errors shared across the crate

pub mod clock;
pub mod errors;
pub mod traits;
pub mod types;
