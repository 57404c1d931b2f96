//! Error types shared across the assistant.

use std::path::PathBuf;

use thiserror::Error;

/// Startup configuration errors. Any of these halts the process before a request is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GROK_API_KEY is not set. Add it to the environment or a .env file, or pass --api-key")]
    MissingCredential,

    #[error("Unknown jurisdiction '{0}'. Run with --list-jurisdictions to see available jurisdictions")]
    UnknownJurisdiction(String),

    #[error("URL must start with http:// or https://, got '{0}'")]
    InvalidUrl(String),

    #[error("Context file not found: {}", .0.display())]
    ContextFileNotFound(PathBuf),

    #[error("Case limit must be at least 1")]
    InvalidCaseLimit,
}

/// Failure of a single call to the remote LLM API.
#[derive(Debug, Error)]
pub enum RemoteApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API authentication failed, verify your API key")]
    Unauthorized,

    #[error("API rate limit exceeded, try again later")]
    RateLimited,

    #[error("API error {0}")]
    Status(u16),

    #[error("unexpected response format: {0}")]
    Malformed(String),
}

/// Failure of one research request. Never fatal to an interactive session.
#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("Please enter a legal query")]
    EmptyQuery,

    #[error("Request budget exceeded ({limit} requests per {window_secs}s), please wait before trying again")]
    BudgetExceeded { limit: u32, window_secs: u64 },

    #[error(transparent)]
    Remote(#[from] RemoteApiError),
}
