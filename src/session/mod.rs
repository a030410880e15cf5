//! Annotation session state
//!
//! This module contains:
//! - Session state and the reference host used by the sync layer
//! - The viewport grid controller

pub mod state;
pub mod viewport;

pub use state::{Session, SessionState};
pub use viewport::{GridState, ViewportEvent, ViewportEventKind, ViewportGridController};
