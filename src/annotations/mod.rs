//! Annotation message handling
//!
//! This module provides:
//! - Handlers applying store messages to the session
//! - Selection (click and multi-select) routing into the active layer

pub mod handlers;
