//! Core application module
//!
//! This module contains:
//! - Application entry point and the event loop
//! - The line-oriented command surface read from stdin

pub mod app;
pub mod command;
