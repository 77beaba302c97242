//! pather: find ancestor or child paths whose names match patterns.
//!
//! Patterns are regexes matched anywhere in a diacritic-folded name. Include
//! patterns must all match; any exclude pattern rejects.

// Core infrastructure - re-exported from pather-core
pub use pather_core::error;
pub use pather_core::normalize;
pub use pather_core::output;
pub use pather_core::resolve;
pub use pather_core::select;

// Front door
pub mod cli;

pub use pather_core::error::{OutputErrorCode, PathError, PathResult};
pub use pather_core::resolve::{find_ancestor, find_child};
pub use pather_core::select::{Filter, HasKey, Match, Mode};
