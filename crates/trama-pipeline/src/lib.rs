//! # trama-pipeline
//!
//! The run orchestrator. A [`Pipeline`] owns the per-run analyzer cache and
//! drives the sequential stages: clean → chunk → candidate extraction →
//! canonicalization → relation extraction → graph assembly. Per-chunk
//! failures are isolated (the chunk contributes nothing); input,
//! configuration, and empty-concept-set failures are fatal.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};
use uuid::Uuid;

use trama_core::{defaults, Error, GenerationBackend, RelationObservation, Result};
use trama_graph::{ConceptGraph, GraphAssembler};
use trama_nlp::{canonicalize, extract_candidates, AnalyzerCache, CanonicalizerConfig};
use trama_relations::{ChunkContext, LlmExtractor, PatternExtractor, RelationExtractor};
use trama_text::{chunk_text, clean_transcript, detect_lang};

/// Relation extraction strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Dependency-pattern matching; no external calls.
    Pattern,
    /// LLM-backed extraction.
    Llm,
}

impl std::str::FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pattern" => Ok(Self::Pattern),
            "llm" => Ok(Self::Llm),
            other => Err(Error::Config(format!(
                "Unknown strategy '{other}' (expected 'pattern' or 'llm')"
            ))),
        }
    }
}

/// Pipeline tunables.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Minimum raw frequency for a candidate term to survive.
    pub min_freq: u32,
    /// Maximum canonical concepts.
    pub max_concepts: usize,
    /// Fuzzy-merge similarity threshold (0-100).
    pub fuzzy_threshold: u32,
    /// Chunk character budget.
    pub chunk_chars: usize,
    /// Optional cap on exported edges (heaviest kept).
    pub max_edges: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_freq: defaults::MIN_FREQ,
            max_concepts: defaults::MAX_CONCEPTS,
            fuzzy_threshold: defaults::FUZZY_THRESHOLD,
            chunk_chars: defaults::CHUNK_CHARS,
            max_edges: None,
        }
    }
}

/// Counters for one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub chunks: usize,
    pub candidates: usize,
    pub concepts: usize,
    pub observations: usize,
    pub edges: usize,
    pub duration_ms: u64,
}

/// Everything a run produces.
#[derive(Debug)]
pub struct PipelineOutput {
    /// The assembled graph.
    pub graph: ConceptGraph,
    /// Unmerged per-chunk observations (the `edges_raw.json` content).
    pub observations: Vec<RelationObservation>,
    /// Run counters.
    pub stats: PipelineStats,
    /// Strategy name that produced the edges.
    pub strategy: &'static str,
}

/// The run orchestrator.
pub struct Pipeline {
    config: PipelineConfig,
    analyzers: Arc<AnalyzerCache>,
    extractor: Box<dyn RelationExtractor>,
}

impl Pipeline {
    /// Build a pipeline using the dependency-pattern strategy.
    pub fn pattern(config: PipelineConfig) -> Self {
        let analyzers = Arc::new(AnalyzerCache::new());
        let extractor = Box::new(PatternExtractor::new(analyzers.clone()));
        Self {
            config,
            analyzers,
            extractor,
        }
    }

    /// Build a pipeline using the LLM strategy over the given backend.
    pub fn llm(config: PipelineConfig, backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            config,
            analyzers: Arc::new(AnalyzerCache::new()),
            extractor: Box::new(LlmExtractor::new(backend)),
        }
    }

    /// Run the whole pipeline over a raw transcript.
    pub async fn run(&self, raw: &str) -> Result<PipelineOutput> {
        let run_id = Uuid::new_v4();
        let start = Instant::now();

        let cleaned = clean_transcript(raw);
        if cleaned.is_empty() {
            return Err(Error::InvalidInput(
                "transcript is empty after cleaning".to_string(),
            ));
        }

        let chunks = chunk_text(&cleaned, self.config.chunk_chars);
        let langs: Vec<_> = chunks.iter().map(|c| detect_lang(c)).collect();
        info!(
            run_id = %run_id,
            chunk_count = chunks.len(),
            strategy = self.extractor.name(),
            "pipeline run started"
        );

        // Candidate extraction, per chunk. An analyzer failure costs only
        // the failing chunk's candidates.
        let mut candidates = Vec::new();
        for (index, (chunk, lang)) in chunks.iter().zip(&langs).enumerate() {
            let analyzer = self.analyzers.get(*lang);
            match analyzer.analyze(chunk) {
                Ok(sentences) => {
                    candidates.extend(extract_candidates(*lang, &sentences));
                }
                Err(error) => {
                    warn!(
                        chunk_index = index,
                        error = %error,
                        "analysis failed, chunk contributes no candidates"
                    );
                }
            }
        }
        let candidate_count = candidates.len();

        // Whole-document canonicalization. An empty concept set is fatal.
        let canonical = canonicalize(
            &candidates,
            &CanonicalizerConfig {
                min_freq: self.config.min_freq,
                max_concepts: self.config.max_concepts,
                fuzzy_threshold: self.config.fuzzy_threshold,
            },
        )?;
        info!(
            run_id = %run_id,
            candidate_count,
            concept_count = canonical.concepts.len(),
            "canonicalization complete"
        );

        // Relation extraction, per chunk. A failing chunk contributes zero
        // edges and never aborts the run.
        let mut observations: Vec<RelationObservation> = Vec::new();
        for (index, (chunk, lang)) in chunks.iter().zip(&langs).enumerate() {
            let context = ChunkContext {
                index,
                text: chunk.clone(),
                lang: *lang,
                concepts: canonical.concepts.clone(),
            };
            match self.extractor.extract(&context).await {
                Ok(found) => observations.extend(found),
                Err(error) => {
                    warn!(
                        chunk_index = index,
                        error = %error,
                        "relation extraction failed, chunk contributes no edges"
                    );
                }
            }
        }

        // The single synchronization point: merge everything.
        let mut assembler = GraphAssembler::new(canonical.concepts.clone());
        for observation in &observations {
            assembler.record(observation.clone());
        }
        let graph = assembler.finish(self.config.max_edges);

        let stats = PipelineStats {
            chunks: chunks.len(),
            candidates: candidate_count,
            concepts: canonical.concepts.len(),
            observations: observations.len(),
            edges: graph.edge_count(),
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            run_id = %run_id,
            chunk_count = stats.chunks,
            concept_count = stats.concepts,
            observation_count = stats.observations,
            edge_count = stats.edges,
            duration_ms = stats.duration_ms,
            "pipeline run complete"
        );

        Ok(PipelineOutput {
            graph,
            observations,
            stats,
            strategy: self.extractor.name(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("pattern".parse::<Strategy>().unwrap(), Strategy::Pattern);
        assert_eq!("llm".parse::<Strategy>().unwrap(), Strategy::Llm);
        assert!("magic".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_config_defaults_come_from_core() {
        let config = PipelineConfig::default();
        assert_eq!(config.min_freq, defaults::MIN_FREQ);
        assert_eq!(config.chunk_chars, defaults::CHUNK_CHARS);
        assert!(config.max_edges.is_none());
    }

    #[tokio::test]
    async fn test_empty_transcript_is_fatal() {
        let pipeline = Pipeline::pattern(PipelineConfig::default());
        let err = pipeline.run("  [00:12]  ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
