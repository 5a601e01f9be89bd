//! Packwise Domain Layer
//!
//! Value types shared by every stage of the packing-list pipeline.
//!
//! ## Key Concepts
//!
//! - **TripRequest**: validated destination and trip length, one per inbound request
//! - **KnowledgeKey**: normalized destination used to address cached source pages
//! - **AnswerResult**: synthesized answer text returned by the answer engine
//! - **PackingListResult**: the structured, quantity-adjusted list handed back to callers
//!
//! This crate performs no I/O. Collaborator traits live in the crates that
//! implement them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod answer;
pub mod knowledge;
pub mod packing;
pub mod trip;

// Re-exports for convenience
pub use answer::{AnswerResult, QueryClassification};
pub use knowledge::KnowledgeKey;
pub use packing::{PackingItem, PackingListResult};
pub use trip::{DomainError, TripRequest};
