//! Output rendering for research results.

mod report;

pub use report::{render_report, save_report};
