//! Core infrastructure for pather.
//!
//! This crate provides:
//! - Text normalization applied before every pattern match
//! - The include/exclude selector over sequences of keyed items
//! - Ancestor and child resolvers built on the selector
//! - Error types and error codes
//! - JSON output types for CLI responses

pub mod error;
pub mod normalize;
pub mod output;
pub mod resolve;
pub mod select;
