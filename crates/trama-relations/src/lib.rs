//! # trama-relations
//!
//! Relation extraction for the trama pipeline. Two interchangeable
//! strategies implement the [`RelationExtractor`] trait: a dependency-pattern
//! matcher with no external calls, and an LLM-backed extractor speaking a
//! strict JSON contract. Generation backends live here as well.

pub mod extractor;
pub mod llm;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
#[cfg(feature = "ollama")]
pub mod ollama;
#[cfg(feature = "openai")]
pub mod openai;
pub mod pattern;

pub use extractor::{ChunkContext, RelationExtractor};
pub use llm::LlmExtractor;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockBackend;
#[cfg(feature = "ollama")]
pub use ollama::OllamaBackend;
#[cfg(feature = "openai")]
pub use openai::OpenAiBackend;
pub use pattern::PatternExtractor;
