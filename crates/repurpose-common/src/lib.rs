//! repurpose-common — Shared types, errors, and helpers used across all repurpose crates.

pub mod error;
pub mod records;
pub mod ranking;
pub mod sandbox;

// Re-export commonly used types
pub use error::{RepurposeError, Result};
pub use records::AbstractRecord;
