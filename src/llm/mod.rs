//! LLM client module for interacting with language models.
//!
//! Talks to the xAI Grok chat completions API over reqwest.

mod client;

pub use client::{ChatBackend, GrokClient};
