//! Core components, types, and utilities for health-triage.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - System prompts and canned assistant text.
//! - Common types, result handling, and the chat error taxonomy.

pub mod config;
pub mod prompts;
pub mod types;
