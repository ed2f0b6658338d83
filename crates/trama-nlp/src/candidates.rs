//! Concept-candidate extraction.
//!
//! Three independent, overlapping sources contribute to one candidate list:
//! noun chunks, entity spans, and standalone content tokens. Each source
//! trades precision for recall; frequency thresholding and fuzzy merging
//! downstream clean up the noise.

use trama_core::defaults;
use trama_text::{looks_like_junk, normalize_term, Lang};

use crate::analyzer::{PosTag, SentenceAnalysis};
use crate::lexicon;

/// Extract candidate terms from analyzed sentences.
///
/// The returned list is not deduplicated; the canonicalizer counts and
/// merges over the concatenation of all chunks' candidates.
pub fn extract_candidates(lang: Lang, sentences: &[SentenceAnalysis]) -> Vec<String> {
    let lexicon = lexicon::for_lang(lang);
    let mut candidates = Vec::new();

    for sentence in sentences {
        // Source 1: noun-phrase spans.
        for chunk in &sentence.noun_chunks {
            let text = sentence.span_text(chunk.span);
            let norm = normalize_term(&text);
            if looks_like_junk(&norm) {
                continue;
            }
            if !sentence.tokens[chunk.head].pos.is_nominal() {
                continue;
            }

            let tokens: Vec<_> = sentence.tokens[chunk.span.start..chunk.span.end]
                .iter()
                .filter(|t| t.pos != PosTag::Punctuation)
                .collect();
            if tokens.is_empty() || tokens.len() > defaults::MAX_PHRASE_TOKENS {
                continue;
            }

            let stop_count = tokens.iter().filter(|t| t.is_stop).count();
            if stop_count as f32 / tokens.len() as f32 > defaults::MAX_STOPWORD_RATIO {
                continue;
            }

            let content_count = tokens.iter().filter(|t| t.pos.is_content()).count();
            if (content_count as f32 / tokens.len() as f32) < defaults::MIN_CONTENT_POS_RATIO {
                continue;
            }

            let first_content = tokens
                .iter()
                .find(|t| !matches!(t.pos, PosTag::Determiner | PosTag::Punctuation));
            match first_content {
                None => continue,
                Some(token) => {
                    if token.pos == PosTag::Pronoun {
                        continue;
                    }
                    if lexicon.demonstratives.contains(token.lemma.as_str()) {
                        continue;
                    }
                }
            }

            candidates.push(norm);
        }

        // Source 2: named entities.
        for entity in &sentence.entities {
            let text = sentence.span_text(entity.span);
            let norm = normalize_term(&text);
            if looks_like_junk(&norm) {
                continue;
            }
            let words = norm.split(' ').count();
            if (1..=defaults::MAX_ENTITY_WORDS).contains(&words) {
                candidates.push(norm);
            }
        }

        // Source 3: standalone content tokens. These catch single technical
        // terms missed by chunking.
        for token in &sentence.tokens {
            if !token.pos.is_nominal() || token.is_stop || token.pos == PosTag::Punctuation {
                continue;
            }
            let norm = normalize_term(&token.text);
            if norm.chars().count() >= defaults::MIN_STANDALONE_LEN && !looks_like_junk(&norm) {
                candidates.push(norm);
            }
        }
    }

    candidates
}
