//! Research pipeline: input guard, context files, prompt building and dispatch.

mod assistant;
mod context;
mod guard;
mod prompt;

pub use assistant::{Assistant, ResearchResult};
