//! Concept canonicalization: frequency counting, thresholding, and fuzzy
//! merging of near-duplicate terms.
//!
//! Shortlisted terms are merged longest-first so a short fragment cannot
//! claim canonical status over a more complete phrase ("row level security"
//! anchors before "level security" can).

use std::collections::HashMap;

use tracing::debug;

use trama_core::{defaults, CanonicalConcept, Error, Result};
use trama_text::{looks_like_junk, normalize_term};

use crate::similarity::token_sort_ratio;

/// Tunables for canonicalization.
#[derive(Debug, Clone)]
pub struct CanonicalizerConfig {
    /// Minimum raw frequency for a term to be kept.
    pub min_freq: u32,
    /// Maximum concepts in the final set.
    pub max_concepts: usize,
    /// Token-sort similarity (0-100) at or above which terms merge.
    pub fuzzy_threshold: u32,
}

impl Default for CanonicalizerConfig {
    fn default() -> Self {
        Self {
            min_freq: defaults::MIN_FREQ,
            max_concepts: defaults::MAX_CONCEPTS,
            fuzzy_threshold: defaults::FUZZY_THRESHOLD,
        }
    }
}

/// Result of canonicalization.
#[derive(Debug, Clone)]
pub struct CanonicalSet {
    /// Top concepts by aggregated frequency, descending.
    pub concepts: Vec<CanonicalConcept>,
    /// Kept term → canonical label.
    pub mapping: HashMap<String, String>,
    /// Canonical label → aggregated frequency (all canonicals, not only
    /// the top set).
    pub frequencies: HashMap<String, u32>,
}

impl CanonicalSet {
    /// Labels of the final concept set.
    pub fn labels(&self) -> Vec<&str> {
        self.concepts.iter().map(|c| c.label.as_str()).collect()
    }
}

/// Aggregate, threshold, and fuzzy-merge raw candidate terms into the
/// canonical concept set.
///
/// Returns [`Error::NoConcepts`] when nothing survives thresholding: a
/// graph with zero nodes is not a valid pipeline output.
pub fn canonicalize(candidates: &[String], config: &CanonicalizerConfig) -> Result<CanonicalSet> {
    // 1. Normalize and count, discarding junk.
    let mut counts: HashMap<String, u32> = HashMap::new();
    for raw in candidates {
        let norm = normalize_term(raw);
        if looks_like_junk(&norm) {
            continue;
        }
        *counts.entry(norm).or_insert(0) += 1;
    }

    // 2. Threshold and shortlist. Over-provisioning compensates for
    // fragmentation the fuzzy merge will collapse.
    let mut survivors: Vec<(String, u32)> = counts
        .into_iter()
        .filter(|(term, freq)| {
            *freq >= config.min_freq
                && (1..=defaults::MAX_PHRASE_TOKENS).contains(&term.split(' ').count())
        })
        .collect();
    survivors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    survivors.truncate(defaults::SHORTLIST_FACTOR * config.max_concepts);

    if survivors.is_empty() {
        return Err(Error::NoConcepts {
            min_freq: config.min_freq,
        });
    }

    // 3. Fuzzy merge, longest term first.
    let mut by_length = survivors.clone();
    by_length.sort_by(|a, b| {
        b.0.chars()
            .count()
            .cmp(&a.0.chars().count())
            .then_with(|| b.1.cmp(&a.1))
            .then_with(|| a.0.cmp(&b.0))
    });

    let mut canonicals: Vec<String> = Vec::new();
    let mut mapping: HashMap<String, String> = HashMap::new();
    for (term, _) in &by_length {
        let best = canonicals
            .iter()
            .map(|c| (token_sort_ratio(term, c), c))
            .max_by_key(|(score, _)| *score);
        match best {
            Some((score, canon)) if score >= config.fuzzy_threshold => {
                mapping.insert(term.clone(), canon.clone());
            }
            _ => {
                canonicals.push(term.clone());
                mapping.insert(term.clone(), term.clone());
            }
        }
    }

    // 4. Re-aggregate frequencies through the mapping.
    let mut frequencies: HashMap<String, u32> = HashMap::new();
    for (term, freq) in &survivors {
        let canon = &mapping[term];
        *frequencies.entry(canon.clone()).or_insert(0) += freq;
    }

    // 5. Top-N by aggregated frequency.
    let mut ranked: Vec<(String, u32)> = frequencies
        .iter()
        .map(|(label, freq)| (label.clone(), *freq))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(config.max_concepts);

    let concepts: Vec<CanonicalConcept> = ranked
        .into_iter()
        .map(|(label, freq)| CanonicalConcept::new(label, freq))
        .collect();

    debug!(
        kept_terms = survivors.len(),
        concept_count = concepts.len(),
        "canonicalization complete"
    );

    Ok(CanonicalSet {
        concepts,
        mapping,
        frequencies,
    })
}
