//! Strategy trait for relation extraction.

use async_trait::async_trait;

use trama_core::{CanonicalConcept, RelationKind, RelationObservation, Result};
use trama_text::Lang;

/// Per-chunk input handed to a relation extractor.
#[derive(Debug, Clone)]
pub struct ChunkContext {
    /// Zero-based chunk index within the run.
    pub index: usize,
    /// Chunk text.
    pub text: String,
    /// Detected language of the chunk.
    pub lang: Lang,
    /// The run's canonical concepts.
    pub concepts: Vec<CanonicalConcept>,
}

/// A relation extraction strategy.
///
/// Implementations must isolate their own per-chunk failures where possible;
/// the pipeline treats a returned error as "zero edges for this chunk" and
/// continues.
#[async_trait]
pub trait RelationExtractor: Send + Sync {
    /// Strategy name for logs and the export document.
    fn name(&self) -> &'static str;

    /// The closed relation vocabulary this strategy emits.
    fn vocabulary(&self) -> &'static [RelationKind];

    /// Extract relation observations from one chunk.
    async fn extract(&self, chunk: &ChunkContext) -> Result<Vec<RelationObservation>>;
}
