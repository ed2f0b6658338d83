//! Candidate-term normalization, junk classification, and transcript cleaning.
//!
//! Everything here is a pure function over string slices. Normalization is
//! idempotent: applying [`normalize_term`] to its own output returns the
//! same string.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Leading articles/determiners stripped during normalization (EN + ES).
static ARTICLES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // English
        "a", "an", "the", // Spanish
        "un", "una", "unos", "unas", "el", "la", "los", "las",
    ]
    .into_iter()
    .collect()
});

/// Generic terms too common to be meaningful concepts (EN + ES).
static STOP_TERMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // English
        "thing", "things", "stuff", "something", "anything", "everything", "someone", "anyone",
        "people", "person", "way", "ways", "time", "times", "lot", "lots", "kind", "sort", "type",
        "example", "examples", "case", "cases", "point", "idea", "part", "parts", "bit", "side",
        "place", "fact", "question", "answer", "today", "tomorrow",
        // Spanish
        "cosa", "cosas", "algo", "alguien", "gente", "persona", "personas", "manera", "maneras",
        "forma", "formas", "tiempo", "tipo", "tipos", "ejemplo", "ejemplos", "caso", "casos",
        "parte", "partes", "lado", "lugar", "hecho", "pregunta", "respuesta", "vez", "veces",
        "hoy", "mañana",
    ]
    .into_iter()
    .collect()
});

/// Conversational filler phrases that survive normalization but carry no
/// concept (EN + ES).
static FILLER_PHRASES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // English
        "you know",
        "i mean",
        "kind of",
        "sort of",
        "more or less",
        "of course",
        "for example",
        "right now",
        "at all",
        // Spanish
        "o sea",
        "es decir",
        "a ver",
        "por ejemplo",
        "más o menos",
        "por supuesto",
        "ahora mismo",
        "sin embargo",
        "por lo tanto",
    ]
    .into_iter()
    .collect()
});

/// Embedded timestamp tokens: `[hh:mm:ss]`, `[mm:ss]`, or the bare forms.
static TIMESTAMP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\d{1,2}:\d{2}(?::\d{2})?\]|\b\d{1,2}:\d{2}(?::\d{2})?\b").unwrap());

/// `Speaker Label:` prefixes at line starts. Labels are alphanumeric with
/// spaces/dashes/underscores, at most 30 characters, followed by a colon
/// and whitespace.
static SPEAKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[A-Za-z0-9][A-Za-z0-9 _\-]{0,29}:\s+").unwrap());

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize a candidate term.
///
/// Lowercases, collapses internal whitespace, strips leading/trailing
/// non-alphanumeric characters (Unicode-aware, so accented letters and `ñ`
/// survive), strips surrounding quote/backtick characters, and removes
/// leading EN/ES articles/determiners.
pub fn normalize_term(text: &str) -> String {
    let lowered = text.to_lowercase();
    let collapsed = WHITESPACE_RE.replace_all(lowered.trim(), " ");

    let trimmed = collapsed.trim_matches(|c: char| !c.is_alphanumeric());
    if trimmed.is_empty() {
        return String::new();
    }

    // Strip leading articles until the first word is a content word. A loop
    // keeps normalization idempotent on inputs like "the the topic".
    let mut words: Vec<&str> = trimmed.split(' ').collect();
    while let Some(first) = words.first() {
        if ARTICLES.contains(first) {
            words.remove(0);
        } else {
            break;
        }
    }

    words.join(" ")
}

/// Classify a candidate term as junk.
///
/// A term is junk when, after normalization, it is empty, shorter than 3
/// characters, a known stop term or filler phrase, purely numeric, or a
/// single short token.
pub fn looks_like_junk(text: &str) -> bool {
    let norm = normalize_term(text);
    if norm.is_empty() {
        return true;
    }
    if norm.chars().count() < 3 {
        return true;
    }
    if STOP_TERMS.contains(norm.as_str()) || FILLER_PHRASES.contains(norm.as_str()) {
        return true;
    }
    if norm
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || c == '.' || c == ',')
    {
        return true;
    }
    let mut tokens = norm.split(' ');
    let first = tokens.next().unwrap_or("");
    if tokens.next().is_none() && first.chars().count() <= 3 {
        return true;
    }
    false
}

/// Clean a raw transcript: strip timestamps and speaker labels, collapse
/// whitespace runs, trim the ends.
pub fn clean_transcript(raw: &str) -> String {
    let no_speakers = SPEAKER_RE.replace_all(raw, "");
    let no_timestamps = TIMESTAMP_RE.replace_all(&no_speakers, " ");
    WHITESPACE_RE
        .replace_all(no_timestamps.trim(), " ")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_collapses() {
        assert_eq!(normalize_term("  Machine   Learning  "), "machine learning");
    }

    #[test]
    fn test_normalize_strips_leading_article_en() {
        assert_eq!(normalize_term("the neural network"), "neural network");
        assert_eq!(normalize_term("an example set"), "example set");
    }

    #[test]
    fn test_normalize_strips_leading_article_es() {
        assert_eq!(normalize_term("la red neuronal"), "red neuronal");
        assert_eq!(normalize_term("los datos abiertos"), "datos abiertos");
        assert_eq!(normalize_term("unas funciones puras"), "funciones puras");
    }

    #[test]
    fn test_normalize_strips_quotes_and_punctuation() {
        assert_eq!(normalize_term("\"gradient descent\""), "gradient descent");
        assert_eq!(normalize_term("`tokio runtime`,"), "tokio runtime");
        assert_eq!(normalize_term("¿aprendizaje automático?"), "aprendizaje automático");
    }

    #[test]
    fn test_normalize_preserves_accents() {
        assert_eq!(normalize_term("Año Nuevo"), "año nuevo");
        assert_eq!(normalize_term("categoría única"), "categoría única");
    }

    #[test]
    fn test_normalize_idempotent() {
        for input in [
            "The  Quick Brown Fox",
            "la \"economía circular\"",
            "the the topic",
            "¡¿un sistema distribuido?!",
            "",
            "   ",
            "42",
        ] {
            let once = normalize_term(input);
            assert_eq!(normalize_term(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_normalize_article_only_becomes_empty() {
        assert_eq!(normalize_term("the"), "");
        assert_eq!(normalize_term("las"), "");
    }

    #[test]
    fn test_junk_the_thing_and_ok() {
        assert!(looks_like_junk("the thing"));
        assert!(looks_like_junk("ok"));
    }

    #[test]
    fn test_junk_empty_and_short() {
        assert!(looks_like_junk(""));
        assert!(looks_like_junk("  "));
        assert!(looks_like_junk("ab"));
    }

    #[test]
    fn test_junk_numeric() {
        assert!(looks_like_junk("1234"));
        assert!(looks_like_junk("3.14"));
        assert!(looks_like_junk("1, 2, 3"));
    }

    #[test]
    fn test_junk_single_short_token() {
        assert!(looks_like_junk("dog"));
        assert!(looks_like_junk("la y"));
    }

    #[test]
    fn test_junk_filler_phrases() {
        assert!(looks_like_junk("you know"));
        assert!(looks_like_junk("o sea"));
        assert!(looks_like_junk("Por ejemplo"));
    }

    #[test]
    fn test_not_junk_real_concepts() {
        assert!(!looks_like_junk("machine learning"));
        assert!(!looks_like_junk("aprendizaje automático"));
        assert!(!looks_like_junk("data"));
        assert!(!looks_like_junk("graph"));
    }

    #[test]
    fn test_clean_transcript_strips_bracketed_timestamps() {
        let raw = "[00:01:23] hello world [12:04] again";
        assert_eq!(clean_transcript(raw), "hello world again");
    }

    #[test]
    fn test_clean_transcript_strips_bare_timestamps() {
        let raw = "at 01:23 we begin and at 1:02:03 we end";
        assert_eq!(clean_transcript(raw), "at we begin and at we end");
    }

    #[test]
    fn test_clean_transcript_strips_speaker_labels() {
        let raw = "Dr Smith: welcome everyone\nStudent 2: thanks a lot";
        assert_eq!(clean_transcript(raw), "welcome everyone thanks a lot");
    }

    #[test]
    fn test_clean_transcript_keeps_long_labels() {
        // 31-character label exceeds the speaker-prefix limit
        let raw = "abcdefghijklmnopqrstuvwxyzabcde: not a speaker";
        assert!(clean_transcript(raw).contains("abcdefghijklmnopqrstuvwxyzabcde:"));
    }

    #[test]
    fn test_clean_transcript_collapses_whitespace() {
        let raw = "  spaced\t\tout\n\ntext  ";
        assert_eq!(clean_transcript(raw), "spaced out text");
    }

    #[test]
    fn test_clean_transcript_empty() {
        assert_eq!(clean_transcript(""), "");
        assert_eq!(clean_transcript("Speaker 1: [00:00] "), "");
    }
}
