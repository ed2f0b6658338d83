//! Analyzer trait and annotation value types.
//!
//! The pipeline consumes linguistic annotations through the
//! [`LinguisticAnalyzer`] trait so the rule-based analyzer shipped here can
//! be swapped for an external parsing service without touching extraction
//! code. The [`AnalyzerCache`] is the per-run owner of loaded analyzers,
//! keyed by language and handed by reference into the extraction stages.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use trama_core::Result;
use trama_text::Lang;

use crate::rule::RuleAnalyzer;

/// Coarse part-of-speech tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosTag {
    Noun,
    ProperNoun,
    Adjective,
    Verb,
    Adverb,
    Pronoun,
    Determiner,
    Adposition,
    Conjunction,
    Number,
    Punctuation,
    Other,
}

impl PosTag {
    /// Tags that count as phrase content when scoring noun chunks.
    pub fn is_content(&self) -> bool {
        matches!(self, Self::Noun | Self::ProperNoun | Self::Adjective)
    }

    /// Tags that can head a noun chunk.
    pub fn is_nominal(&self) -> bool {
        matches!(self, Self::Noun | Self::ProperNoun)
    }
}

/// A single analyzed token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Surface form as it appears in the sentence.
    pub text: String,
    /// Rule-lemmatized form (surface form when no rule applies).
    pub lemma: String,
    /// Coarse part of speech.
    pub pos: PosTag,
    /// Whether the token is a function word.
    pub is_stop: bool,
}

/// Half-open token-index range within one sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// A noun phrase detected by the chunker.
#[derive(Debug, Clone, PartialEq)]
pub struct NounChunk {
    /// Token range of the phrase.
    pub span: Span,
    /// Index of the syntactic head token within the sentence.
    pub head: usize,
}

/// A named-entity span.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpan {
    /// Token range of the entity.
    pub span: Span,
}

/// Shallow dependency frame around one verb: its nearest nominal subject
/// and object spans, when present.
#[derive(Debug, Clone, PartialEq)]
pub struct VerbFrame {
    /// Index of the verb token.
    pub verb: usize,
    /// Subject phrase span (precedes the verb).
    pub subject: Option<Span>,
    /// Object phrase span (follows the verb, possibly behind a preposition).
    pub object: Option<Span>,
}

/// Full annotation of one sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceAnalysis {
    /// The sentence text.
    pub text: String,
    /// Tokens in order.
    pub tokens: Vec<Token>,
    /// Detected noun phrases.
    pub noun_chunks: Vec<NounChunk>,
    /// Detected entity spans.
    pub entities: Vec<EntitySpan>,
    /// Per-verb subject/object frames.
    pub verb_frames: Vec<VerbFrame>,
}

impl SentenceAnalysis {
    /// Surface text of a token span, clamped to sentence bounds.
    pub fn span_text(&self, span: Span) -> String {
        let start = span.start.min(self.tokens.len());
        let end = span.end.min(self.tokens.len());
        self.tokens[start..end]
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Per-language linguistic analysis.
///
/// Implementations must be cheap to call repeatedly; loading happens at
/// construction time.
pub trait LinguisticAnalyzer: Send + Sync {
    /// The language this analyzer was loaded for.
    fn lang(&self) -> Lang;

    /// Analyze a text into per-sentence annotations.
    fn analyze(&self, text: &str) -> Result<Vec<SentenceAnalysis>>;
}

/// Explicit per-run cache of loaded analyzers, keyed by language.
///
/// Owned by the pipeline orchestrator and passed by handle into the
/// extraction stages; analyzers are constructed lazily on first use.
#[derive(Default)]
pub struct AnalyzerCache {
    analyzers: Mutex<HashMap<Lang, Arc<dyn LinguisticAnalyzer>>>,
}

impl AnalyzerCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or lazily construct) the analyzer for a language.
    pub fn get(&self, lang: Lang) -> Arc<dyn LinguisticAnalyzer> {
        let mut analyzers = self.analyzers.lock().expect("analyzer cache poisoned");
        analyzers
            .entry(lang)
            .or_insert_with(|| Arc::new(RuleAnalyzer::new(lang)) as Arc<dyn LinguisticAnalyzer>)
            .clone()
    }

    /// Number of analyzers currently loaded.
    pub fn loaded(&self) -> usize {
        self.analyzers.lock().expect("analyzer cache poisoned").len()
    }
}
