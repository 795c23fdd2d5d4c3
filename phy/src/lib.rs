//! LTE Downlink Physical Layer Library
//!
//! This crate implements the downlink reference signals (cell-specific and
//! MBSFN) according to 3GPP TS 36.211 Section 6.10, together with the
//! index arithmetic to map them into per-subframe resource grids.

pub mod refsignal_dl;
pub mod resource_grid;
pub mod sequence;

use thiserror::Error;

/// Errors returned by the physical layer primitives
#[derive(Error, Debug)]
pub enum PhyError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Allocation failed: {0}")]
    AllocationFailure(String),

    #[error("Sequence generation failed: {0}")]
    SequenceGeneration(String),
}
