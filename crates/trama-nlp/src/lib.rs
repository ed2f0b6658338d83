//! # trama-nlp
//!
//! Linguistic front end for the trama pipeline: a pluggable analyzer
//! producing tokens, noun chunks, entity spans, and verb frames; the
//! three-source concept-candidate extractor; and the canonicalizer that
//! fuzzy-merges near-duplicate terms into the final concept set.

pub mod analyzer;
pub mod candidates;
pub mod canonical;
pub mod lexicon;
pub mod rule;
pub mod similarity;

pub use analyzer::{
    AnalyzerCache, EntitySpan, LinguisticAnalyzer, NounChunk, PosTag, SentenceAnalysis, Span,
    Token, VerbFrame,
};
pub use candidates::extract_candidates;
pub use canonical::{canonicalize, CanonicalSet, CanonicalizerConfig};
pub use rule::RuleAnalyzer;
pub use similarity::token_sort_ratio;
