//! Hexagon-grid presence/absence annotation engine
//!
//! - [`grid`] maps viewports to covering cells and cells to boundaries
//! - [`domain::AnnotationState`] holds the two disjoint annotation layers
//! - [`session::ViewportGridController`] republishes the visible grid
//! - [`sync::AnnotationSync`] runs prediction/save/load against a backend

pub mod annotations;
pub mod config;
pub mod domain;
pub mod error;
pub mod grid;
pub mod session;
pub mod sync;
pub mod taxa;

pub use error::{Error, Result};
