//! Core domain types shared by every layer.

pub mod document;
pub mod text;

pub use document::{Document, MAX_AUTHORS, MAX_BODY_CHARS, RawHit, RetrievalResult, SourceKind};
pub use text::{collapse_whitespace, truncate_graphemes};
