//! Core types and traits for the forex dashboard.
//!
//! This crate provides the foundational building blocks including:
//! - Currency codes, point-in-time rates and time series
//! - Sanitizers applied at every input and response boundary
//! - Core traits for indicators and upstream rate sources

pub mod error;
pub mod sanitize;
pub mod traits;
pub mod types;

pub use error::{FxError, FxResult};
pub use traits::*;
pub use types::*;
