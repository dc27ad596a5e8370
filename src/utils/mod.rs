//! Utility functions
//!
//! Common helpers that don't fit in specialized modules.

pub mod color;
