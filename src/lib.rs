//! Library root for `health-triage`.
//!
//! Health-triage is the backend of a health assistant:
//! - A deterministic, rule-based symptom triage classifier
//! - Static medication, lifestyle, and first-aid reference lookups
//! - A medical-assistant chat over an OpenAI-compatible endpoint
//! - Chat history and profile persistence
//! - A health metrics log and appointment requests
//!
//! The triage core ([`triage`], [`reference`]) is pure and synchronous. The chat and
//! persistence collaborators live in [`service`] behind traits, so they can be swapped or
//! mocked, and are wired together by [`runtime::Runtime`].

pub mod base;
pub mod interaction;
pub mod reference;
pub mod runtime;
pub mod service;
pub mod triage;

use base::{config::Config, types::Res};
use tracing::info;

/// Public async entry for the binary crate.
///
/// Creates the runtime context with the database and LLM clients.
pub async fn start(config: Config) -> Res<runtime::Runtime> {
    info!("Starting health-triage ...");

    runtime::Runtime::new(config).await
}
