//! Pure domain types with minimal dependencies
//!
//! This module contains the cell, viewport and annotation types used
//! throughout the crate. Nothing here performs IO.

pub mod annotation;
pub mod cell;
pub mod geometry;
pub mod selection;

pub use annotation::*;
pub use cell::*;
pub use geometry::*;
pub use selection::*;
