//! Practice tracker.
//!
//! Eligibility is a pure function of a word's event history and a date; the
//! tracker service adds authorization, per-pair write serialization and the
//! bulk and history queries on top of an injected record store.

mod access;
mod eligibility;
mod locks;
mod service;

pub use access::WordAccess;
pub use eligibility::{admit, evaluate};
pub use service::PracticeTracker;
