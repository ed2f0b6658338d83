//! Data model for the concept-graph pipeline.
//!
//! The pipeline's units of work are plain value types: candidates flow into
//! the canonicalizer, canonical concepts and relation observations flow into
//! the assembler, and the assembler owns the only mutable view of the graph.

use serde::{Deserialize, Serialize};

/// A normalized candidate term with its raw frequency within a transcript.
///
/// Ephemeral: produced by candidate extraction, consumed only by the
/// canonicalizer. Has no identity beyond its normalized text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptCandidate {
    /// Normalized term text.
    pub term: String,
    /// Raw occurrence count across the whole transcript.
    pub freq: u32,
}

/// A deduplicated concept — the node unit of the final graph.
///
/// Created once at canonicalization and immutable afterward within a run.
/// Labels are unique within a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalConcept {
    /// Representative normalized term for the merged cluster.
    pub label: String,
    /// Sum of the raw frequencies of all candidates merged into this concept.
    pub frequency: u32,
    /// Short opaque handle (`C001`, ...) used only on the LLM wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wire_id: Option<String>,
}

impl CanonicalConcept {
    /// Create a concept with no wire id assigned.
    pub fn new(label: impl Into<String>, frequency: u32) -> Self {
        Self {
            label: label.into(),
            frequency,
            wire_id: None,
        }
    }
}

/// Typed relation between two concepts.
///
/// One enum covers the union of both strategy vocabularies; each extraction
/// strategy declares which slice it emits ([`LLM_VOCABULARY`] or
/// [`PATTERN_VOCABULARY`]) and a run never mixes slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    IsA,
    PartOf,
    DependsOn,
    Causes,
    UsedFor,
    RelatedTo,
    Has,
    Includes,
    LeadsTo,
    Enables,
    Uses,
    Requires,
    Improves,
    Reduces,
    Increases,
}

/// Closed vocabulary for the LLM extraction strategy.
pub const LLM_VOCABULARY: &[RelationKind] = &[
    RelationKind::IsA,
    RelationKind::PartOf,
    RelationKind::DependsOn,
    RelationKind::Causes,
    RelationKind::UsedFor,
    RelationKind::RelatedTo,
];

/// Closed vocabulary for the dependency-pattern extraction strategy.
pub const PATTERN_VOCABULARY: &[RelationKind] = &[
    RelationKind::IsA,
    RelationKind::Has,
    RelationKind::Includes,
    RelationKind::Causes,
    RelationKind::LeadsTo,
    RelationKind::Enables,
    RelationKind::Uses,
    RelationKind::Requires,
    RelationKind::DependsOn,
    RelationKind::Improves,
    RelationKind::Reduces,
    RelationKind::Increases,
];

impl RelationKind {
    /// Wire-format name (snake_case, matches the serde representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IsA => "is_a",
            Self::PartOf => "part_of",
            Self::DependsOn => "depends_on",
            Self::Causes => "causes",
            Self::UsedFor => "used_for",
            Self::RelatedTo => "related_to",
            Self::Has => "has",
            Self::Includes => "includes",
            Self::LeadsTo => "leads_to",
            Self::Enables => "enables",
            Self::Uses => "uses",
            Self::Requires => "requires",
            Self::Improves => "improves",
            Self::Reduces => "reduces",
            Self::Increases => "increases",
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RelationKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "is_a" => Ok(Self::IsA),
            "part_of" => Ok(Self::PartOf),
            "depends_on" => Ok(Self::DependsOn),
            "causes" => Ok(Self::Causes),
            "used_for" => Ok(Self::UsedFor),
            "related_to" => Ok(Self::RelatedTo),
            "has" => Ok(Self::Has),
            "includes" => Ok(Self::Includes),
            "leads_to" => Ok(Self::LeadsTo),
            "enables" => Ok(Self::Enables),
            "uses" => Ok(Self::Uses),
            "requires" => Ok(Self::Requires),
            "improves" => Ok(Self::Improves),
            "reduces" => Ok(Self::Reduces),
            "increases" => Ok(Self::Increases),
            other => Err(crate::Error::InvalidInput(format!(
                "Unknown relation kind: {other}"
            ))),
        }
    }
}

/// One sighting of a relation within a single chunk, before merging.
///
/// The `edges_raw.json` audit file is a list of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationObservation {
    /// Canonical label of the source concept.
    pub source: String,
    /// Relation type, restricted to the active strategy's vocabulary.
    pub relation: RelationKind,
    /// Canonical label of the target concept.
    pub target: String,
    /// Verbatim short quote supporting the relation, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    /// Zero-based index of the chunk the sighting came from.
    pub chunk_index: usize,
}

/// A merged, directed, typed edge of the final graph.
///
/// Keyed by `(source, relation, target)`; repeats across chunks increment
/// `weight` and append evidence up to the configured cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationTriple {
    /// Canonical label of the source concept.
    pub source: String,
    /// Relation type.
    pub relation: RelationKind,
    /// Canonical label of the target concept.
    pub target: String,
    /// Occurrence count across all chunks.
    pub weight: u32,
    /// Verbatim evidence quotes (bounded).
    pub evidence: Vec<String>,
}
