//! Core traits for wordcycle collaborators.

mod clock;
mod record_store;

pub use clock::*;
pub use record_store::*;
