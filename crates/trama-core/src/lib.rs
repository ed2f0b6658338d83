//! # trama-core
//!
//! Core types, traits, and abstractions for the trama concept-graph pipeline.
//!
//! This crate provides the foundational data structures and trait definitions
//! that the other trama crates depend on.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod model;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use model::{
    CanonicalConcept, ConceptCandidate, RelationKind, RelationObservation, RelationTriple,
    LLM_VOCABULARY, PATTERN_VOCABULARY,
};
pub use traits::GenerationBackend;
