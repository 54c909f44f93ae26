//! Stage session management module
//!
//! This module contains:
//! - Session state and the operations the controls trigger
//! - Message types for control edits, key presses and decode results
//! - Message handlers and keyboard shortcuts

pub mod display;
pub mod handlers;
pub mod messages;
pub mod shortcuts;
pub mod state;
