//! Per-language lexical tables for the rule-based analyzer.
//!
//! Function-word sets drive POS tagging and stopword marking; the verb-form
//! table maps conjugated surface forms to lemmas so the relation lexicon can
//! be keyed by lemma alone.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

use trama_text::Lang;

/// Lexical tables for one language.
pub struct Lexicon {
    pub determiners: HashSet<&'static str>,
    pub pronouns: HashSet<&'static str>,
    pub demonstratives: HashSet<&'static str>,
    pub adpositions: HashSet<&'static str>,
    pub conjunctions: HashSet<&'static str>,
    pub adverbs: HashSet<&'static str>,
    /// Conjugated surface form → lemma.
    pub verb_forms: HashMap<&'static str, &'static str>,
    /// Known verb lemmas (for suffix-stripping fallback).
    pub verb_lemmas: HashSet<&'static str>,
    /// Suffixes that mark adjectives with high confidence.
    pub adjective_suffixes: &'static [&'static str],
    /// Adverb-forming suffix (`ly` / `mente`).
    pub adverb_suffix: &'static str,
    /// Full stopword set (function words plus common fillers).
    pub stopwords: HashSet<&'static str>,
}

impl Lexicon {
    /// Look up the lemma for a verb surface form, trying the form table
    /// first and then third-person/participle suffix stripping.
    pub fn verb_lemma(&self, word: &str) -> Option<&'static str> {
        if let Some(lemma) = self.verb_forms.get(word).copied() {
            return Some(lemma);
        }
        for suffix in ["s", "d", "ed"] {
            if let Some(stem) = word.strip_suffix(suffix) {
                if let Some(lemma) = self.verb_lemmas.get(stem).copied() {
                    return Some(lemma);
                }
            }
        }
        self.verb_lemmas.get(word).copied()
    }
}

static EN_LEXICON: Lazy<Lexicon> = Lazy::new(|| {
    let determiners: HashSet<&str> = [
        "a", "an", "the", "this", "that", "these", "those", "my", "your", "his", "her", "its",
        "our", "their", "some", "any", "each", "every", "all", "both", "no", "another", "such",
    ]
    .into_iter()
    .collect();
    let pronouns: HashSet<&str> = [
        "i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them", "myself",
        "yourself", "itself", "who", "whom", "whose", "what", "which", "this", "that", "these",
        "those", "something", "anything", "everything", "nothing", "someone", "anyone", "everyone",
    ]
    .into_iter()
    .collect();
    let demonstratives: HashSet<&str> = ["this", "that", "these", "those"].into_iter().collect();
    let adpositions: HashSet<&str> = [
        "of", "in", "on", "at", "by", "for", "with", "from", "to", "about", "into", "over",
        "under", "between", "through", "during", "after", "before", "against", "without",
    ]
    .into_iter()
    .collect();
    let conjunctions: HashSet<&str> = [
        "and", "or", "but", "because", "if", "while", "although", "though", "so", "than", "as",
        "when", "where", "unless", "since",
    ]
    .into_iter()
    .collect();
    let adverbs: HashSet<&str> = [
        "very", "really", "quite", "also", "always", "never", "often", "actually", "basically",
        "just", "still", "already", "too", "not", "here", "there", "now", "then", "well",
    ]
    .into_iter()
    .collect();
    let verb_forms: HashMap<&str, &str> = [
        ("is", "be"),
        ("are", "be"),
        ("was", "be"),
        ("were", "be"),
        ("been", "be"),
        ("being", "be"),
        ("am", "be"),
        ("has", "have"),
        ("had", "have"),
        ("having", "have"),
        ("does", "do"),
        ("did", "do"),
        ("done", "do"),
        ("leads", "lead"),
        ("led", "lead"),
        ("can", "can"),
        ("could", "can"),
        ("will", "will"),
        ("would", "will"),
        ("should", "should"),
        ("may", "may"),
        ("might", "may"),
        ("must", "must"),
        ("makes", "make"),
        ("made", "make"),
        ("gets", "get"),
        ("got", "get"),
        ("goes", "go"),
        ("went", "go"),
        ("says", "say"),
        ("said", "say"),
        ("knows", "know"),
        ("knew", "know"),
        ("thinks", "think"),
        ("thought", "think"),
    ]
    .into_iter()
    .collect();
    let verb_lemmas: HashSet<&str> = [
        "be", "have", "do", "cause", "lead", "depend", "use", "require", "include", "enable",
        "improve", "reduce", "increase", "involve", "mean", "make", "need", "help", "allow",
        "contain", "produce", "create", "affect", "learn", "teach", "work", "show", "explain",
        "say", "know", "think", "want", "get", "go", "see", "call", "start", "talk",
    ]
    .into_iter()
    .collect();

    let mut stopwords: HashSet<&str> = HashSet::new();
    stopwords.extend(&determiners);
    stopwords.extend(&pronouns);
    stopwords.extend(&adpositions);
    stopwords.extend(&conjunctions);
    stopwords.extend(&adverbs);
    stopwords.extend([
        "is", "are", "was", "were", "be", "been", "am", "has", "have", "had", "do", "does", "did",
        "can", "could", "will", "would", "should", "may", "might", "must", "more", "most", "other",
        "only", "same", "like", "yes", "okay", "ok",
    ]);

    Lexicon {
        determiners,
        pronouns,
        demonstratives,
        adpositions,
        conjunctions,
        adverbs,
        verb_forms,
        verb_lemmas,
        adjective_suffixes: &["ive", "ous", "ful", "less", "ible", "able"],
        adverb_suffix: "ly",
        stopwords,
    }
});

static ES_LEXICON: Lazy<Lexicon> = Lazy::new(|| {
    let determiners: HashSet<&str> = [
        "el", "la", "los", "las", "un", "una", "unos", "unas", "este", "esta", "estos", "estas",
        "ese", "esa", "esos", "esas", "aquel", "aquella", "mi", "tu", "su", "sus", "nuestro",
        "nuestra", "cada", "todo", "toda", "todos", "todas", "algún", "alguna", "ningún",
    ]
    .into_iter()
    .collect();
    let pronouns: HashSet<&str> = [
        "yo", "tú", "él", "ella", "ello", "nosotros", "nosotras", "ustedes", "ellos", "ellas",
        "usted", "me", "te", "se", "le", "les", "lo", "nos", "esto", "eso", "aquello", "quien",
        "quienes", "que", "algo", "alguien", "nada", "nadie",
    ]
    .into_iter()
    .collect();
    let demonstratives: HashSet<&str> = [
        "este", "esta", "estos", "estas", "ese", "esa", "esos", "esas", "aquel", "aquella",
        "aquellos", "aquellas", "esto", "eso", "aquello",
    ]
    .into_iter()
    .collect();
    let adpositions: HashSet<&str> = [
        "de", "en", "a", "por", "para", "con", "sin", "sobre", "entre", "hasta", "desde",
        "durante", "contra", "según", "ante", "bajo", "tras", "del", "al",
    ]
    .into_iter()
    .collect();
    let conjunctions: HashSet<&str> = [
        "y", "e", "o", "u", "pero", "porque", "si", "mientras", "aunque", "como", "cuando",
        "donde", "pues", "sino", "ni",
    ]
    .into_iter()
    .collect();
    let adverbs: HashSet<&str> = [
        "muy", "realmente", "también", "siempre", "nunca", "además", "bastante", "ya", "aquí",
        "allí", "ahora", "entonces", "bien", "mal", "no", "sí", "más", "menos", "solo",
    ]
    .into_iter()
    .collect();
    let verb_forms: HashMap<&str, &str> = [
        ("es", "ser"),
        ("son", "ser"),
        ("era", "ser"),
        ("eran", "ser"),
        ("fue", "ser"),
        ("fueron", "ser"),
        ("sea", "ser"),
        ("está", "estar"),
        ("están", "estar"),
        ("estaba", "estar"),
        ("hay", "haber"),
        ("ha", "haber"),
        ("han", "haber"),
        ("había", "haber"),
        ("tiene", "tener"),
        ("tienen", "tener"),
        ("tenía", "tener"),
        ("causa", "causar"),
        ("causan", "causar"),
        ("causó", "causar"),
        ("usa", "usar"),
        ("usan", "usar"),
        ("usó", "usar"),
        ("utiliza", "utilizar"),
        ("utilizan", "utilizar"),
        ("requiere", "requerir"),
        ("requieren", "requerir"),
        ("depende", "depender"),
        ("dependen", "depender"),
        ("incluye", "incluir"),
        ("incluyen", "incluir"),
        ("permite", "permitir"),
        ("permiten", "permitir"),
        ("lleva", "llevar"),
        ("llevan", "llevar"),
        ("mejora", "mejorar"),
        ("mejoran", "mejorar"),
        ("reduce", "reducir"),
        ("reducen", "reducir"),
        ("aumenta", "aumentar"),
        ("aumentan", "aumentar"),
        ("produce", "producir"),
        ("producen", "producir"),
        ("genera", "generar"),
        ("generan", "generar"),
        ("necesita", "necesitar"),
        ("necesitan", "necesitar"),
        ("contiene", "contener"),
        ("contienen", "contener"),
        ("puede", "poder"),
        ("pueden", "poder"),
        ("debe", "deber"),
        ("deben", "deber"),
        ("hace", "hacer"),
        ("hacen", "hacer"),
    ]
    .into_iter()
    .collect();
    let verb_lemmas: HashSet<&str> = [
        "ser", "estar", "haber", "tener", "causar", "usar", "utilizar", "requerir", "depender",
        "incluir", "permitir", "llevar", "mejorar", "reducir", "aumentar", "producir", "generar",
        "necesitar", "contener", "poder", "deber", "hacer",
    ]
    .into_iter()
    .collect();

    let mut stopwords: HashSet<&str> = HashSet::new();
    stopwords.extend(&determiners);
    stopwords.extend(&pronouns);
    stopwords.extend(&adpositions);
    stopwords.extend(&conjunctions);
    stopwords.extend(&adverbs);
    stopwords.extend([
        "es", "son", "era", "eran", "fue", "ser", "está", "están", "hay", "ha", "han", "puede",
        "pueden", "debe", "deben", "hace", "hacen", "otro", "otra", "mismo", "misma", "vale",
    ]);

    Lexicon {
        determiners,
        pronouns,
        demonstratives,
        adpositions,
        conjunctions,
        adverbs,
        verb_forms,
        verb_lemmas,
        adjective_suffixes: &["ivo", "iva", "oso", "osa", "ble"],
        adverb_suffix: "mente",
        stopwords,
    }
});

/// The lexical tables for a language.
pub fn for_lang(lang: Lang) -> &'static Lexicon {
    match lang {
        Lang::En => &EN_LEXICON,
        Lang::Es => &ES_LEXICON,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_en_verb_lemma_irregular() {
        let lex = for_lang(Lang::En);
        assert_eq!(lex.verb_lemma("is"), Some("be"));
        assert_eq!(lex.verb_lemma("led"), Some("lead"));
        assert_eq!(lex.verb_lemma("been"), Some("be"));
    }

    #[test]
    fn test_en_verb_lemma_suffix_stripping() {
        let lex = for_lang(Lang::En);
        assert_eq!(lex.verb_lemma("requires"), Some("require"));
        assert_eq!(lex.verb_lemma("causes"), Some("cause"));
        assert_eq!(lex.verb_lemma("depended"), Some("depend"));
        assert_eq!(lex.verb_lemma("used"), Some("use"));
    }

    #[test]
    fn test_en_verb_lemma_unknown() {
        let lex = for_lang(Lang::En);
        assert_eq!(lex.verb_lemma("ontology"), None);
        assert_eq!(lex.verb_lemma("networks"), None);
    }

    #[test]
    fn test_es_verb_lemma() {
        let lex = for_lang(Lang::Es);
        assert_eq!(lex.verb_lemma("es"), Some("ser"));
        assert_eq!(lex.verb_lemma("requieren"), Some("requerir"));
        assert_eq!(lex.verb_lemma("causa"), Some("causar"));
    }

    #[test]
    fn test_stopwords_cover_function_words() {
        let en = for_lang(Lang::En);
        for word in ["the", "of", "and", "is", "they"] {
            assert!(en.stopwords.contains(word), "missing {word}");
        }
        let es = for_lang(Lang::Es);
        for word in ["el", "de", "y", "es", "que"] {
            assert!(es.stopwords.contains(word), "missing {word}");
        }
    }

    #[test]
    fn test_demonstratives_subset_of_determiners_en() {
        let en = for_lang(Lang::En);
        for word in &en.demonstratives {
            assert!(en.determiners.contains(word));
        }
    }
}
