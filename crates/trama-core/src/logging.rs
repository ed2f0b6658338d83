//! Structured logging schema and field name constants for trama.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized field names across
//! every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Run-fatal conditions surfaced to the caller |
//! | WARN  | Recoverable per-chunk failure, chunk contributes nothing |
//! | INFO  | Lifecycle events (stage completions, run summary) |
//! | DEBUG | Decision points, intermediate counts, config choices |
//! | TRACE | Per-item iteration (candidates, skipped observations) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID for a single pipeline run. Format: UUIDv4.
pub const RUN_ID: &str = "run_id";

/// Subsystem originating the log event.
/// Values: "text", "nlp", "relations", "graph", "pipeline"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "chunker", "canonicalizer", "ollama", "assembler"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "chunk_text", "canonicalize", "extract_relations"
pub const OPERATION: &str = "op";

// ─── Chunk fields ──────────────────────────────────────────────────────────

/// Zero-based index of the chunk being processed.
pub const CHUNK_INDEX: &str = "chunk_index";

/// Total number of chunks in the run.
pub const CHUNK_COUNT: &str = "chunk_count";

/// Detected language code for a chunk ("en" or "es").
pub const LANG: &str = "lang";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of raw candidate terms produced.
pub const CANDIDATE_COUNT: &str = "candidate_count";

/// Number of canonical concepts after merging.
pub const CONCEPT_COUNT: &str = "concept_count";

/// Number of raw relation observations before merging.
pub const OBSERVATION_COUNT: &str = "observation_count";

/// Number of merged edges in the assembled graph.
pub const EDGE_COUNT: &str = "edge_count";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model slug used for a generation call.
pub const MODEL: &str = "model";

/// Byte length of a prompt.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";
