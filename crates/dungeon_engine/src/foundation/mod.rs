//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and color helpers
//! - Time management (frame timer, interval timers)
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
