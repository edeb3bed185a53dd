//! User-facing workflows built on the triage core and the services.
//!
//! This module provides:
//! - The symptom checker session and the urgency assessment
//! - Chat turns against the LLM, with history context
//! - Background storage of chat history
//! - The health metrics log and appointment requests

pub mod appointment;
pub mod assessment;
pub mod chat_storage;
pub mod chat_turn;
pub mod metrics;
pub mod symptom_check;
