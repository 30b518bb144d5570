//! Core types and configuration for Bug Tracker RS.

pub mod config;

pub use config::{AppConfig, ConfigError};
