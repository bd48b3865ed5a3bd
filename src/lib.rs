//! SA-MP runtime configuration library
//!
//! This module exports the core components for testing and integration.

pub mod cli;
pub mod config;
pub mod format;
pub mod logging;
