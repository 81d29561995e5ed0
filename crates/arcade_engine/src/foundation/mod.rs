//! Foundation module - Core utilities and types
//!
//! - Frame pacing
//! - Logging setup
//! - Resource path resolution

pub mod logging;
pub mod paths;
pub mod time;
