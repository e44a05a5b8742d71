//! Error handling
//!
//! Defines error types and handling for the invoice store.

pub mod handlers;
pub mod types;

pub use types::*;
