//! Input sanitizing and the per-session request budget.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::warn;

use crate::error::ResearchError;

/// Maximum characters of user text passed on to search or the LLM.
pub const MAX_INPUT_CHARS: usize = 10_000;

/// Markup and script fragments removed from user text.
const BLOCKED_PATTERNS: &[&str] = &["<script", "javascript:", "onclick", "onerror", "eval(", "exec("];

/// Strip blocked fragments (case-sensitive) and cap the length at [`MAX_INPUT_CHARS`].
pub fn sanitize_input(text: &str) -> String {
    let mut clean = text.to_string();
    for pattern in BLOCKED_PATTERNS {
        clean = clean.replace(pattern, "");
    }
    clean.chars().take(MAX_INPUT_CHARS).collect()
}

struct BudgetState {
    count: u32,
    window_start: Option<Instant>, // None until the first request
}

/// Fixed-window request counter shared by every query in a session.
///
/// The first window opens with the first request, not at construction.
pub struct RequestBudget {
    limit: u32,
    window: Duration,
    state: Mutex<BudgetState>,
}

impl RequestBudget {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self { limit, window, state: Mutex::new(BudgetState { count: 0, window_start: None }) }
    }

    /// Count one request, failing with `BudgetExceeded` when the window is used up.
    pub fn try_acquire(&self) -> Result<(), ResearchError> {
        self.try_acquire_at(Instant::now())
    }

    fn try_acquire_at(&self, now: Instant) -> Result<(), ResearchError> {
        let mut state = self.state.lock();
        let window_start = *state.window_start.get_or_insert(now);
        state.count = state.count.saturating_add(1);

        if state.count > self.limit {
            if now.saturating_duration_since(window_start) < self.window {
                warn!("⚠️  Request budget exceeded ({} per {}s)", self.limit, self.window.as_secs());
                return Err(ResearchError::BudgetExceeded { limit: self.limit, window_secs: self.window.as_secs() });
            }
            state.count = 1;
            state.window_start = Some(now);
        }

        Ok(())
    }
}
