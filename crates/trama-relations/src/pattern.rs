//! Dependency-pattern relation extraction.
//!
//! No external calls: a verb-lemma lookup maps each known verb to a relation
//! type, and the analyzer's verb frames supply subject/object spans, which
//! are snapped onto the chunk's present concepts exact-first, then fuzzily.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use tracing::trace;

use trama_core::{defaults, RelationKind, RelationObservation, Result, PATTERN_VOCABULARY};
use trama_nlp::{token_sort_ratio, AnalyzerCache, SentenceAnalysis};
use trama_text::{normalize_term, Lang};

use crate::extractor::{ChunkContext, RelationExtractor};

/// English verb lemma → relation type.
static EN_RELATION_LEMMAS: Lazy<HashMap<&'static str, RelationKind>> = Lazy::new(|| {
    [
        ("be", RelationKind::IsA),
        ("have", RelationKind::Has),
        ("include", RelationKind::Includes),
        ("contain", RelationKind::Includes),
        ("cause", RelationKind::Causes),
        ("lead", RelationKind::LeadsTo),
        ("enable", RelationKind::Enables),
        ("allow", RelationKind::Enables),
        ("use", RelationKind::Uses),
        ("require", RelationKind::Requires),
        ("need", RelationKind::Requires),
        ("depend", RelationKind::DependsOn),
        ("improve", RelationKind::Improves),
        ("reduce", RelationKind::Reduces),
        ("increase", RelationKind::Increases),
    ]
    .into_iter()
    .collect()
});

/// Spanish verb lemma → relation type.
static ES_RELATION_LEMMAS: Lazy<HashMap<&'static str, RelationKind>> = Lazy::new(|| {
    [
        ("ser", RelationKind::IsA),
        ("tener", RelationKind::Has),
        ("incluir", RelationKind::Includes),
        ("contener", RelationKind::Includes),
        ("causar", RelationKind::Causes),
        ("llevar", RelationKind::LeadsTo),
        ("permitir", RelationKind::Enables),
        ("usar", RelationKind::Uses),
        ("utilizar", RelationKind::Uses),
        ("requerir", RelationKind::Requires),
        ("necesitar", RelationKind::Requires),
        ("depender", RelationKind::DependsOn),
        ("mejorar", RelationKind::Improves),
        ("reducir", RelationKind::Reduces),
        ("aumentar", RelationKind::Increases),
    ]
    .into_iter()
    .collect()
});

/// Dependency-pattern strategy. Shares the run's analyzer cache with the
/// candidate extraction stage.
pub struct PatternExtractor {
    analyzers: Arc<AnalyzerCache>,
}

impl PatternExtractor {
    pub fn new(analyzers: Arc<AnalyzerCache>) -> Self {
        Self { analyzers }
    }

    fn relation_lemmas(lang: Lang) -> &'static HashMap<&'static str, RelationKind> {
        match lang {
            Lang::En => &EN_RELATION_LEMMAS,
            Lang::Es => &ES_RELATION_LEMMAS,
        }
    }

    fn extract_from_sentence(
        &self,
        sentence: &SentenceAnalysis,
        lang: Lang,
        concepts: &[&str],
        chunk_index: usize,
        out: &mut Vec<RelationObservation>,
    ) {
        // Present concepts: label text appears verbatim in the sentence.
        let sentence_lower = sentence.text.to_lowercase();
        let present: Vec<&str> = concepts
            .iter()
            .copied()
            .filter(|label| sentence_lower.contains(*label))
            .collect();
        if present.len() < 2 {
            return;
        }

        let lemmas = Self::relation_lemmas(lang);
        for frame in &sentence.verb_frames {
            let verb = &sentence.tokens[frame.verb];
            let Some(relation) = lemmas.get(verb.lemma.as_str()).copied() else {
                continue;
            };
            let (Some(subject_span), Some(object_span)) = (frame.subject, frame.object) else {
                continue;
            };
            if subject_span.is_empty() || object_span.is_empty() {
                continue;
            }

            let subject_text = normalize_term(&sentence.span_text(subject_span));
            let object_text = normalize_term(&sentence.span_text(object_span));

            let Some(source) = snap_to_concept(&subject_text, &present) else {
                trace!(span = %subject_text, "subject did not snap to a concept");
                continue;
            };
            let Some(target) = snap_to_concept(&object_text, &present) else {
                trace!(span = %object_text, "object did not snap to a concept");
                continue;
            };
            if source == target {
                continue;
            }

            out.push(RelationObservation {
                source,
                relation,
                target,
                evidence: Some(sentence.text.trim().to_string()),
                chunk_index,
            });
        }
    }
}

/// Snap a normalized span onto the closest present concept: exact match
/// first, then best fuzzy similarity at or above the snap threshold.
pub(crate) fn snap_to_concept(norm: &str, present: &[&str]) -> Option<String> {
    if norm.is_empty() {
        return None;
    }
    if let Some(exact) = present.iter().find(|label| **label == norm) {
        return Some(exact.to_string());
    }
    present
        .iter()
        .map(|label| (token_sort_ratio(norm, label), *label))
        .max_by_key(|(score, _)| *score)
        .filter(|(score, _)| *score >= defaults::SNAP_THRESHOLD)
        .map(|(_, label)| label.to_string())
}

#[async_trait]
impl RelationExtractor for PatternExtractor {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn vocabulary(&self) -> &'static [RelationKind] {
        PATTERN_VOCABULARY
    }

    async fn extract(&self, chunk: &ChunkContext) -> Result<Vec<RelationObservation>> {
        let analyzer = self.analyzers.get(chunk.lang);
        let sentences = analyzer.analyze(&chunk.text)?;
        let labels: Vec<&str> = chunk.concepts.iter().map(|c| c.label.as_str()).collect();

        let mut observations = Vec::new();
        for sentence in &sentences {
            self.extract_from_sentence(sentence, chunk.lang, &labels, chunk.index, &mut observations);
        }
        Ok(observations)
    }
}
