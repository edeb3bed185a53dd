//! Service integrations for external APIs and clients.
//!
//! This module contains the collaborators around the triage core:
//! - Database services (e.g., SurrealDB) for chat history and profiles
//! - LLM services (e.g., OpenAI) for the assistant chat
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod db;
pub mod llm;
