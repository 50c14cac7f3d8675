//! Core types for wordcycle.

mod practice;
mod word;

pub use practice::*;
pub use word::*;

/// Identifier of a user, assigned by the surrounding CRUD layer.
pub type UserId = i64;
/// Identifier of a word.
pub type WordId = i64;
/// Identifier of a language.
pub type LanguageId = i64;
/// Identifier of a practice event.
pub type EventId = i64;
