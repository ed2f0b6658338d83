//! Sentence-aligned chunking for downstream linguistic analysis and LLM
//! context windows.
//!
//! Sentences are split on terminal punctuation followed by whitespace, then
//! greedily packed into chunks bounded by a character budget. A single
//! sentence longer than the budget is still emitted as its own oversized
//! chunk rather than dropped.

use once_cell::sync::Lazy;
use regex::Regex;

/// Sentence-terminal punctuation (EN/ES/CJK) followed by whitespace or end
/// of input.
static SENTENCE_END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?¿¡。]+(?:\s+|$)").unwrap());

/// Common abbreviations that end with a period but do not end a sentence.
static ABBREV_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:dr|dra|mr|mrs|ms|prof|sr|sra|jr|inc|ltd|co|etc|vs|e\.g|i\.e|p\.ej)\.$")
        .unwrap()
});

/// Split text into trimmed, non-empty sentences.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut last_end = 0;

    for mat in SENTENCE_END_RE.find_iter(text) {
        let end = mat.end();
        let candidate = &text[last_end..end];

        if ABBREV_RE.is_match(candidate.trim_end()) {
            continue;
        }

        // Preceded by a digit: likely a decimal, not a boundary.
        let before_punct = mat.start();
        if before_punct > 0
            && text[..before_punct]
                .chars()
                .last()
                .is_some_and(|c| c.is_ascii_digit())
        {
            continue;
        }

        let sentence = candidate.trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_string());
        }
        last_end = end;
    }

    let tail = text[last_end..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}

/// Pack sentences greedily into chunks of at most `max_chars` characters.
///
/// Chunks are non-empty, ordered, and cover the whole input. When adding the
/// next sentence would overflow the budget, the buffer is flushed and a new
/// buffer starts with that sentence.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let sentences = split_sentences(text);
    let mut chunks = Vec::new();
    let mut buffer = String::new();

    for sentence in sentences {
        if buffer.is_empty() {
            buffer = sentence;
            continue;
        }
        if buffer.len() + 1 + sentence.len() > max_chars {
            chunks.push(std::mem::take(&mut buffer));
            buffer = sentence;
        } else {
            buffer.push(' ');
            buffer.push_str(&sentence);
        }
    }

    if !buffer.is_empty() {
        chunks.push(buffer);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic_sentences() {
        let sentences = split_sentences("First point. Second point! Third point?");
        assert_eq!(
            sentences,
            vec!["First point.", "Second point!", "Third point?"]
        );
    }

    #[test]
    fn test_split_spanish_and_cjk_terminators() {
        let sentences = split_sentences("Primera frase. 第二句。 Tercera frase.");
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[1], "第二句。");
    }

    #[test]
    fn test_split_keeps_decimals_together() {
        let sentences = split_sentences("Pi is 3.14 roughly. Next sentence.");
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].contains("3.14"));
    }

    #[test]
    fn test_split_skips_abbreviations() {
        let sentences = split_sentences("Dr. Smith spoke first. Then questions.");
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].starts_with("Dr. Smith"));
    }

    #[test]
    fn test_split_unterminated_tail() {
        let sentences = split_sentences("Complete sentence. trailing fragment");
        assert_eq!(sentences, vec!["Complete sentence.", "trailing fragment"]);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn test_chunk_packs_greedily() {
        let text = "aaaa. bbbb. cccc. dddd.";
        // Each sentence is 5 chars; two fit per 11-char chunk with the joiner.
        let chunks = chunk_text(text, 11);
        assert_eq!(chunks, vec!["aaaa. bbbb.", "cccc. dddd."]);
    }

    #[test]
    fn test_chunk_respects_budget() {
        let text = "one sentence here. another sentence here. a third sentence here.";
        let chunks = chunk_text(text, 40);
        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            assert!(chunk.len() <= 40, "chunk exceeded budget: {chunk:?}");
        }
    }

    #[test]
    fn test_chunk_oversized_sentence_still_emitted() {
        let long = "x".repeat(120);
        let text = format!("short one. {long}. short two.");
        let chunks = chunk_text(&text, 30);
        assert!(chunks.iter().any(|c| c.len() > 30));
        assert_eq!(chunks.len(), 3);
    }

    #[test]
    fn test_chunk_coverage_preserves_sentences() {
        let text = "Alpha beta. Gamma delta. Epsilon zeta! Eta theta?";
        let original = split_sentences(text);
        let chunks = chunk_text(text, 25);

        let rejoined: Vec<String> = chunks
            .iter()
            .flat_map(|c| split_sentences(c))
            .collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn test_chunk_empty_input() {
        assert!(chunk_text("", 100).is_empty());
    }

    #[test]
    fn test_chunks_nonempty_and_ordered() {
        let text = "a one. b two. c three. d four. e five.";
        let chunks = chunk_text(text, 14);
        assert!(chunks.iter().all(|c| !c.is_empty()));
        let joined = chunks.join(" ");
        assert_eq!(joined, text);
    }
}
