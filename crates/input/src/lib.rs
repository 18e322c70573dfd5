//! Input: maps raw key and pointer events to logical camera input.
//!
//! # Invariants
//! - Consumers see `CameraAction`s and `PointerSample`s, never raw window events.
//! - Only the primary (left) pointer button starts a drag.

pub mod action;
pub mod pointer;

pub use action::{CameraAction, ParseActionError};
pub use pointer::{PointerSample, PointerTracker};

pub fn crate_info() -> &'static str {
    "ripple-input v0.1.0"
}
