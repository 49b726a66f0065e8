//! Shared utilities for finanz-analyst
//!
//! This crate provides common functionality used across the finanz-analyst
//! workspace: tracing subscriber setup and the logging configuration it reads.

pub mod config;
pub mod logging;

pub use config::{LogConfig, LogFormat};
pub use logging::{init_tracing, try_init_tracing};
