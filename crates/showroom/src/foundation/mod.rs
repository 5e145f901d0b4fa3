//! Foundation module - Core utilities and types
//!
//! - Math types and ray/plane/box primitives
//! - Host-driven time and one-shot timers
//! - Logging setup

pub mod logging;
pub mod math;
pub mod time;
