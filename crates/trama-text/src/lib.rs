//! # trama-text
//!
//! Text front end for the trama pipeline: transcript cleaning, candidate-term
//! normalization, junk classification, sentence-aligned chunking, and
//! per-chunk language detection.

pub mod chunk;
pub mod language;
pub mod normalize;

pub use chunk::{chunk_text, split_sentences};
pub use language::{detect_lang, Lang, LangDetection};
pub use normalize::{clean_transcript, looks_like_junk, normalize_term};
