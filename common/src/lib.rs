//! Common Types Library
//!
//! This crate provides the shared 3GPP configuration types used across the
//! LTE downlink physical layer.

pub mod types;

// Re-export commonly used items
pub use types::*;
