//! Rule-based linguistic analyzer.
//!
//! A lexicon-and-suffix tagger with a shallow phrase grammar. It trades
//! parse quality for zero model weight: downstream frequency thresholding
//! and fuzzy merging absorb the tagging noise, which is the same bargain
//! the candidate extractor already makes with its three overlapping
//! sources.

use once_cell::sync::Lazy;
use regex::Regex;

use trama_core::Result;
use trama_text::{looks_like_junk, split_sentences, Lang};

use crate::analyzer::{
    EntitySpan, LinguisticAnalyzer, NounChunk, PosTag, SentenceAnalysis, Span, Token, VerbFrame,
};
use crate::lexicon::{self, Lexicon};

/// Word, number, or single punctuation mark.
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{L}[\p{L}\p{N}'\-]*|\p{N}+(?:[.,]\p{N}+)*|[^\s\p{L}\p{N}]").unwrap());

/// Rule-based analyzer for one language.
pub struct RuleAnalyzer {
    lang: Lang,
    lexicon: &'static Lexicon,
}

impl RuleAnalyzer {
    /// Create an analyzer for the given language. Table loading is shared
    /// process-wide; construction is cheap.
    pub fn new(lang: Lang) -> Self {
        Self {
            lang,
            lexicon: lexicon::for_lang(lang),
        }
    }

    fn tag(&self, surface: &str, index: usize) -> Token {
        let lower = surface.to_lowercase();
        let lex = self.lexicon;

        let pos = if surface.chars().all(|c| !c.is_alphanumeric()) {
            PosTag::Punctuation
        } else if surface.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            PosTag::Number
        } else if lex.determiners.contains(lower.as_str()) {
            PosTag::Determiner
        } else if lex.pronouns.contains(lower.as_str()) {
            PosTag::Pronoun
        } else if lex.adpositions.contains(lower.as_str()) {
            PosTag::Adposition
        } else if lex.conjunctions.contains(lower.as_str()) {
            PosTag::Conjunction
        } else if lex.adverbs.contains(lower.as_str())
            || (lower.len() > lex.adverb_suffix.len() + 2 && lower.ends_with(lex.adverb_suffix))
        {
            PosTag::Adverb
        } else if lex.verb_lemma(&lower).is_some() {
            PosTag::Verb
        } else if index > 0 && surface.chars().next().is_some_and(|c| c.is_uppercase()) {
            PosTag::ProperNoun
        } else if lex
            .adjective_suffixes
            .iter()
            .any(|s| lower.len() > s.len() + 2 && lower.ends_with(s))
        {
            PosTag::Adjective
        } else {
            // Generous noun default: recall over precision, cleaned up by
            // frequency thresholding downstream.
            PosTag::Noun
        };

        let lemma = match pos {
            PosTag::Verb => lex.verb_lemma(&lower).unwrap_or(&lower).to_string(),
            _ => lower.clone(),
        };

        Token {
            text: surface.to_string(),
            lemma,
            pos,
            is_stop: lex.stopwords.contains(lower.as_str()),
        }
    }

    fn find_noun_chunks(&self, tokens: &[Token]) -> Vec<NounChunk> {
        let mut chunks = Vec::new();
        let mut run_start: Option<usize> = None;

        let in_run = |pos: PosTag| {
            matches!(
                pos,
                PosTag::Determiner
                    | PosTag::Adjective
                    | PosTag::Noun
                    | PosTag::ProperNoun
                    | PosTag::Number
            )
        };

        for i in 0..=tokens.len() {
            let continues = i < tokens.len() && in_run(tokens[i].pos);
            match (run_start, continues) {
                (None, true) => run_start = Some(i),
                (Some(start), false) => {
                    if let Some(chunk) = self.close_run(tokens, start, i) {
                        chunks.push(chunk);
                    }
                    run_start = None;
                }
                _ => {}
            }
        }

        chunks
    }

    /// Validate a candidate run and pick its head noun. Runs with no
    /// nominal token are discarded.
    fn close_run(&self, tokens: &[Token], start: usize, end: usize) -> Option<NounChunk> {
        let nominals: Vec<usize> = (start..end)
            .filter(|&i| tokens[i].pos.is_nominal())
            .collect();
        let head = match self.lang {
            // English compounds are head-final; Spanish phrases are
            // head-initial with trailing modifiers.
            Lang::En => *nominals.last()?,
            Lang::Es => *nominals.first()?,
        };
        Some(NounChunk {
            span: Span::new(start, end),
            head,
        })
    }

    fn find_entities(&self, tokens: &[Token]) -> Vec<EntitySpan> {
        let capitalized = |t: &Token| {
            !matches!(t.pos, PosTag::Punctuation | PosTag::Number)
                && t.text.chars().next().is_some_and(|c| c.is_uppercase())
        };

        let mut entities = Vec::new();
        let mut run_start: Option<usize> = None;

        for i in 0..=tokens.len() {
            let continues = i < tokens.len() && capitalized(&tokens[i]);
            match (run_start, continues) {
                (None, true) => run_start = Some(i),
                (Some(start), false) => {
                    let len = i - start;
                    // A lone sentence-initial capital is just orthography.
                    let sentence_initial_singleton = start == 0 && len == 1;
                    if !sentence_initial_singleton && (1..=6).contains(&len) {
                        entities.push(EntitySpan {
                            span: Span::new(start, i),
                        });
                    }
                    run_start = None;
                }
                _ => {}
            }
        }

        entities
    }

    /// Attach each verb to its nearest preceding chunk (subject) and the
    /// nearest following chunk whose text is not junk (object — covers the
    /// direct object, a predicate attribute, and the object of a following
    /// preposition, skipping semantically empty attributes like "a type").
    fn find_verb_frames(
        &self,
        tokens: &[Token],
        chunks: &[NounChunk],
        analysis_text: &dyn Fn(Span) -> String,
    ) -> Vec<VerbFrame> {
        let mut frames = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            if token.pos != PosTag::Verb {
                continue;
            }

            let subject = chunks
                .iter()
                .filter(|c| c.span.end <= i)
                .max_by_key(|c| c.span.end)
                .map(|c| c.span);

            let object = chunks
                .iter()
                .filter(|c| c.span.start > i)
                .find(|c| !looks_like_junk(&analysis_text(c.span)))
                .map(|c| c.span);

            frames.push(VerbFrame {
                verb: i,
                subject,
                object,
            });
        }

        frames
    }

    fn analyze_sentence(&self, sentence: &str) -> Option<SentenceAnalysis> {
        let surfaces: Vec<&str> = TOKEN_RE.find_iter(sentence).map(|m| m.as_str()).collect();
        if surfaces.is_empty() {
            return None;
        }

        let tokens: Vec<Token> = surfaces
            .iter()
            .enumerate()
            .map(|(i, s)| self.tag(s, i))
            .collect();

        let noun_chunks = self.find_noun_chunks(&tokens);
        let entities = self.find_entities(&tokens);

        let token_texts: Vec<String> = tokens.iter().map(|t| t.text.clone()).collect();
        let span_text = |span: Span| {
            let start = span.start.min(token_texts.len());
            let end = span.end.min(token_texts.len());
            token_texts[start..end].join(" ")
        };
        let verb_frames = self.find_verb_frames(&tokens, &noun_chunks, &span_text);

        Some(SentenceAnalysis {
            text: sentence.to_string(),
            tokens,
            noun_chunks,
            entities,
            verb_frames,
        })
    }
}

impl LinguisticAnalyzer for RuleAnalyzer {
    fn lang(&self) -> Lang {
        self.lang
    }

    fn analyze(&self, text: &str) -> Result<Vec<SentenceAnalysis>> {
        Ok(split_sentences(text)
            .iter()
            .filter_map(|s| self.analyze_sentence(s))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze_one(lang: Lang, text: &str) -> SentenceAnalysis {
        let analyzer = RuleAnalyzer::new(lang);
        let mut sentences = analyzer.analyze(text).unwrap();
        assert_eq!(sentences.len(), 1, "expected one sentence in {text:?}");
        sentences.remove(0)
    }

    #[test]
    fn test_tagging_basic_english() {
        let analysis = analyze_one(Lang::En, "The model requires large datasets.");
        let pos: Vec<PosTag> = analysis.tokens.iter().map(|t| t.pos).collect();
        assert_eq!(pos[0], PosTag::Determiner);
        assert_eq!(pos[1], PosTag::Noun);
        assert_eq!(pos[2], PosTag::Verb);
        assert_eq!(analysis.tokens[2].lemma, "require");
        assert_eq!(*pos.last().unwrap(), PosTag::Punctuation);
    }

    #[test]
    fn test_tagging_spanish_verb() {
        let analysis = analyze_one(Lang::Es, "El modelo requiere datos abiertos.");
        assert_eq!(analysis.tokens[2].pos, PosTag::Verb);
        assert_eq!(analysis.tokens[2].lemma, "requerir");
    }

    #[test]
    fn test_noun_chunks_english() {
        let analysis = analyze_one(Lang::En, "Machine learning is a type of artificial intelligence.");
        let texts: Vec<String> = analysis
            .noun_chunks
            .iter()
            .map(|c| analysis.span_text(c.span))
            .collect();
        assert!(texts.contains(&"Machine learning".to_string()));
        assert!(texts.contains(&"artificial intelligence".to_string()));
    }

    #[test]
    fn test_noun_chunk_head_is_nominal() {
        let analysis = analyze_one(Lang::En, "The deep neural network converges.");
        for chunk in &analysis.noun_chunks {
            assert!(analysis.tokens[chunk.head].pos.is_nominal());
        }
    }

    #[test]
    fn test_verb_frame_skips_junk_attribute() {
        let analysis = analyze_one(Lang::En, "Machine learning is a type of artificial intelligence.");
        let frame = analysis
            .verb_frames
            .iter()
            .find(|f| analysis.tokens[f.verb].lemma == "be")
            .expect("frame for 'is'");

        let subject = analysis.span_text(frame.subject.expect("subject"));
        let object = analysis.span_text(frame.object.expect("object"));
        assert_eq!(subject, "Machine learning");
        assert_eq!(object, "artificial intelligence");
    }

    #[test]
    fn test_verb_frame_without_object() {
        let analysis = analyze_one(Lang::En, "The network converges.");
        // "converges" is not in the verb lexicon, so no frame; "The network"
        // alone must not fabricate one.
        for frame in &analysis.verb_frames {
            assert!(frame.object.is_none());
        }
    }

    #[test]
    fn test_entities_skip_sentence_initial_singleton() {
        let analysis = analyze_one(Lang::En, "Machine learning uses Python daily.");
        let entity_texts: Vec<String> = analysis
            .entities
            .iter()
            .map(|e| analysis.span_text(e.span))
            .collect();
        assert_eq!(entity_texts, vec!["Python".to_string()]);
    }

    #[test]
    fn test_entities_multiword() {
        let analysis = analyze_one(Lang::En, "We deployed Apache Kafka yesterday.");
        let entity_texts: Vec<String> = analysis
            .entities
            .iter()
            .map(|e| analysis.span_text(e.span))
            .collect();
        assert_eq!(entity_texts, vec!["Apache Kafka".to_string()]);
    }

    #[test]
    fn test_analyze_splits_sentences() {
        let analyzer = RuleAnalyzer::new(Lang::En);
        let sentences = analyzer
            .analyze("First sentence here. Second sentence here.")
            .unwrap();
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn test_analyze_empty_text() {
        let analyzer = RuleAnalyzer::new(Lang::En);
        assert!(analyzer.analyze("").unwrap().is_empty());
    }

    #[test]
    fn test_stopword_marking() {
        let analysis = analyze_one(Lang::En, "The system works with the data.");
        assert!(analysis.tokens[0].is_stop);
        assert!(!analysis.tokens[1].is_stop);
    }
}
