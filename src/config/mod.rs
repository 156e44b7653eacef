//! # Configuration Module
//!
//! This module provides the request configuration and remote service settings for resize operations.

pub mod config;

pub use config::{GeminiConfig, ResizeConfig};
