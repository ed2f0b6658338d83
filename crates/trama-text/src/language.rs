//! Per-chunk language detection for the bilingual (EN/ES) pipeline.
//!
//! The detector performs a single O(n) pass over a bounded prefix of the
//! chunk and scores Spanish against English marker words, with accented
//! letters and inverted punctuation counting toward Spanish. Anything that
//! is not confidently Spanish falls back to English.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use trama_core::defaults;

/// Languages the pipeline analyzes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lang {
    /// English (also the hard fallback).
    #[default]
    En,
    /// Spanish.
    Es,
}

impl Lang {
    /// ISO 639-1 code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of language detection.
#[derive(Debug, Clone, PartialEq)]
pub struct LangDetection {
    /// Detected language.
    pub lang: Lang,
    /// Proportion of marker evidence supporting the detected language
    /// (0.0 - 1.0). 0.5 when no evidence was found.
    pub confidence: f32,
}

/// High-frequency Spanish function words.
static ES_MARKERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "el", "la", "los", "las", "un", "una", "unos", "unas", "de", "del", "al", "que", "es",
        "son", "está", "están", "como", "por", "para", "con", "pero", "más", "muy", "también",
        "entonces", "cuando", "porque", "este", "esta", "esto", "hay", "ser", "hace", "tiene",
        "nosotros", "ustedes", "ejemplo", "entre", "sobre", "donde", "cada", "todo", "toda",
    ]
    .into_iter()
    .collect()
});

/// High-frequency English function words.
static EN_MARKERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "of", "to", "is", "are", "that", "this", "for", "with", "was", "were", "it",
        "on", "as", "be", "been", "have", "has", "from", "we", "you", "they", "what", "which",
        "when", "where", "because", "about", "between", "every", "there", "their", "would",
        "example", "so",
    ]
    .into_iter()
    .collect()
});

/// Characters that only occur in Spanish text within this pipeline's domain.
const ES_CHARS: &[char] = &['á', 'é', 'í', 'ó', 'ú', 'ñ', 'ü', '¿', '¡'];

/// Detect the language of a chunk from a bounded prefix.
///
/// Returns [`Lang::Es`] when Spanish evidence outweighs English evidence,
/// [`Lang::En`] otherwise (including on no evidence at all).
pub fn detect_lang(text: &str) -> Lang {
    detect_lang_detailed(text).lang
}

/// Detect the language and report confidence.
pub fn detect_lang_detailed(text: &str) -> LangDetection {
    let sample = prefix_on_char_boundary(text, defaults::LANG_SAMPLE_CHARS);
    let lowered = sample.to_lowercase();

    let mut es_score = 0usize;
    let mut en_score = 0usize;

    for word in lowered.split(|c: char| !c.is_alphanumeric()) {
        if word.is_empty() {
            continue;
        }
        if ES_MARKERS.contains(word) {
            es_score += 1;
        }
        if EN_MARKERS.contains(word) {
            en_score += 1;
        }
    }

    // Accented letters and inverted punctuation are strong Spanish evidence.
    es_score += lowered.chars().filter(|c| ES_CHARS.contains(c)).count() * 2;

    let total = es_score + en_score;
    if total == 0 {
        return LangDetection {
            lang: Lang::En,
            confidence: 0.5,
        };
    }

    if es_score > en_score {
        LangDetection {
            lang: Lang::Es,
            confidence: es_score as f32 / total as f32,
        }
    } else {
        LangDetection {
            lang: Lang::En,
            confidence: en_score as f32 / total as f32,
        }
    }
}

/// Truncate to at most `max_chars` characters without splitting a char.
fn prefix_on_char_boundary(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_english() {
        let text = "The pipeline is a sequence of stages that transform the input.";
        assert_eq!(detect_lang(text), Lang::En);
    }

    #[test]
    fn test_detects_spanish() {
        let text = "El aprendizaje automático es una rama de la inteligencia artificial.";
        assert_eq!(detect_lang(text), Lang::Es);
    }

    #[test]
    fn test_inverted_punctuation_counts_as_spanish() {
        assert_eq!(detect_lang("¿Qué significa esto exactamente?"), Lang::Es);
    }

    #[test]
    fn test_fallback_on_empty_and_unknown() {
        assert_eq!(detect_lang(""), Lang::En);
        assert_eq!(detect_lang("zzz qqq xxx"), Lang::En);
        assert_eq!(detect_lang("第二句"), Lang::En);
    }

    #[test]
    fn test_confidence_bounds() {
        let detection = detect_lang_detailed("la casa de la montaña es grande");
        assert_eq!(detection.lang, Lang::Es);
        assert!(detection.confidence > 0.5);
        assert!(detection.confidence <= 1.0);
    }

    #[test]
    fn test_samples_prefix_only() {
        // Spanish prefix followed by a long English tail beyond the sample
        // window still detects Spanish.
        let prefix = "el la los las que es son está para con porque entonces ".repeat(20);
        let tail = "the and of to is are that this for with ".repeat(200);
        let text = format!("{prefix}{tail}");
        assert_eq!(detect_lang(&text), Lang::Es);
    }

    #[test]
    fn test_lang_as_str() {
        assert_eq!(Lang::En.as_str(), "en");
        assert_eq!(Lang::Es.to_string(), "es");
    }

    #[test]
    fn test_prefix_char_boundary_safe() {
        let text = "ñ".repeat(1000);
        let sample = prefix_on_char_boundary(&text, 800);
        assert_eq!(sample.chars().count(), 800);
    }
}
