//! Centralized default constants for the trama pipeline.
//!
//! **This module is the single source of truth** for all shared default values.
//! All crates and the CLI binary should reference these constants instead of
//! defining their own magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// CHUNKING
// =============================================================================

/// Maximum characters per chunk. Sized so one chunk fits comfortably in a
/// small LLM context window together with the prompt scaffolding.
pub const CHUNK_CHARS: usize = 1800;

/// Prefix length sampled for per-chunk language detection.
pub const LANG_SAMPLE_CHARS: usize = 800;

// =============================================================================
// CANDIDATE EXTRACTION
// =============================================================================

/// Maximum tokens in a noun-phrase candidate (excluding punctuation).
pub const MAX_PHRASE_TOKENS: usize = 5;

/// Maximum whitespace-separated words in an entity candidate.
pub const MAX_ENTITY_WORDS: usize = 6;

/// Minimum normalized length for a standalone content-token candidate.
pub const MIN_STANDALONE_LEN: usize = 4;

/// Maximum fraction of stopword tokens allowed in a noun-phrase candidate.
pub const MAX_STOPWORD_RATIO: f32 = 0.35;

/// Minimum fraction of noun/proper-noun/adjective tokens in a noun phrase.
pub const MIN_CONTENT_POS_RATIO: f32 = 0.6;

// =============================================================================
// CANONICALIZATION
// =============================================================================

/// Minimum raw frequency for a term to survive thresholding.
pub const MIN_FREQ: u32 = 2;

/// Maximum canonical concepts in the final graph.
pub const MAX_CONCEPTS: usize = 40;

/// Token-sort similarity (0-100) at or above which two terms merge.
pub const FUZZY_THRESHOLD: u32 = 92;

/// Shortlist over-provisioning factor before fuzzy merging. Fragmented
/// near-duplicates collapse during the merge, so the shortlist starts at
/// `SHORTLIST_FACTOR * max_concepts` survivors.
pub const SHORTLIST_FACTOR: usize = 2;

// =============================================================================
// RELATION EXTRACTION
// =============================================================================

/// Similarity (0-100) at or above which a subject/object span snaps to a
/// present concept when no exact match exists.
pub const SNAP_THRESHOLD: u32 = 80;

/// Maximum evidence quotes stored per merged edge.
pub const EVIDENCE_CAP: usize = 3;

/// Separator used when joining stored evidence quotes for export.
pub const EVIDENCE_SEPARATOR: &str = " | ";

/// Minimum words required in an LLM-returned evidence quote.
pub const MIN_EVIDENCE_WORDS: usize = 4;

// =============================================================================
// INFERENCE
// =============================================================================

/// Default Ollama endpoint.
pub const OLLAMA_URL: &str = "http://localhost:11434";

/// Default generation model for relation extraction.
pub const GEN_MODEL: &str = "qwen3:8b";

/// Default OpenAI-compatible endpoint.
pub const OPENAI_URL: &str = "https://api.openai.com/v1";

/// Default OpenAI-compatible generation model.
pub const OPENAI_GEN_MODEL: &str = "gpt-4o-mini";

/// Timeout for generation requests (seconds).
pub const GEN_TIMEOUT_SECS: u64 = 60;

/// Output-token budget per relation-extraction call.
pub const GEN_NUM_PREDICT: u32 = 700;

/// Sampling temperature for relation extraction. Edges must be reproducible.
pub const GEN_TEMPERATURE: f32 = 0.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_percentages() {
        assert!(FUZZY_THRESHOLD <= 100);
        assert!(SNAP_THRESHOLD <= 100);
        assert!(SNAP_THRESHOLD < FUZZY_THRESHOLD);
    }

    #[test]
    fn test_ratio_bounds() {
        assert!(MAX_STOPWORD_RATIO > 0.0 && MAX_STOPWORD_RATIO < 1.0);
        assert!(MIN_CONTENT_POS_RATIO > 0.0 && MIN_CONTENT_POS_RATIO <= 1.0);
    }

    #[test]
    fn test_chunk_sizes_sane() {
        assert!(LANG_SAMPLE_CHARS < CHUNK_CHARS);
        assert!(SHORTLIST_FACTOR >= 1);
    }
}
