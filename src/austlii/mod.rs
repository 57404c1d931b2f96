//! AustLII (Australasian Legal Information Institute) case search.

mod search;

pub use search::{AustLiiSearcher, CaseRecord, CaseSearch};
