//! LLM-backed relation extraction.
//!
//! Each chunk's present concepts get short opaque wire ids, the model is
//! prompted (in the chunk's language) for a single JSON object of edges over
//! those ids, and the raw text is parsed defensively: fence stripping, then
//! a direct parse, then the first `{...}` block. A malformed response earns
//! exactly one repair round-trip; after that the chunk contributes zero
//! edges. Nothing here aborts the surrounding run.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use trama_core::{
    defaults, GenerationBackend, RelationKind, RelationObservation, Result, LLM_VOCABULARY,
};
use trama_text::Lang;

use crate::extractor::{ChunkContext, RelationExtractor};

/// LLM strategy over any [`GenerationBackend`].
pub struct LlmExtractor {
    backend: Arc<dyn GenerationBackend>,
}

/// Raw edge as returned by the model, before validation.
#[derive(Debug, Deserialize)]
struct RawEdge {
    source: String,
    relation: String,
    target: String,
    #[serde(default)]
    evidence: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EdgeEnvelope {
    edges: Vec<RawEdge>,
}

impl LlmExtractor {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    fn system_prompt(lang: Lang) -> &'static str {
        match lang {
            Lang::En => {
                "You are a relation extraction engine. You respond with a single JSON \
                 object and nothing else: no prose, no markdown, no code fences."
            }
            Lang::Es => {
                "Eres un motor de extracción de relaciones. Respondes con un único \
                 objeto JSON y nada más: sin prosa, sin markdown, sin bloques de código."
            }
        }
    }

    fn user_prompt(chunk: &ChunkContext, ids: &[(String, String)]) -> String {
        let concept_list = serde_json::to_string(
            &ids.iter()
                .map(|(id, label)| serde_json::json!({ "id": id, "label": label }))
                .collect::<Vec<_>>(),
        )
        .unwrap_or_else(|_| "[]".to_string());
        let vocabulary = LLM_VOCABULARY
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        match chunk.lang {
            Lang::En => format!(
                "Extract directed relations between the listed concepts from the text.\n\
                 \n\
                 TEXT:\n{text}\n\
                 \n\
                 CONCEPTS:\n{concepts}\n\
                 \n\
                 Rules:\n\
                 - Use ONLY the concept ids above; never invent ids.\n\
                 - relation must be one of: {vocabulary}.\n\
                 - source and target must differ.\n\
                 - evidence is a short verbatim quote from the text (at least 4 words).\n\
                 - Return ONLY this JSON shape:\n\
                 {{\"edges\": [{{\"source\": \"C001\", \"relation\": \"is_a\", \"target\": \"C002\", \"evidence\": \"...\"}}]}}",
                text = chunk.text,
                concepts = concept_list,
            ),
            Lang::Es => format!(
                "Extrae relaciones dirigidas entre los conceptos listados a partir del texto.\n\
                 \n\
                 TEXTO:\n{text}\n\
                 \n\
                 CONCEPTOS:\n{concepts}\n\
                 \n\
                 Reglas:\n\
                 - Usa SOLO los ids de concepto listados; nunca inventes ids.\n\
                 - relation debe ser uno de: {vocabulary}.\n\
                 - source y target deben ser distintos.\n\
                 - evidence es una cita textual corta del texto (al menos 4 palabras).\n\
                 - Devuelve SOLO esta forma JSON:\n\
                 {{\"edges\": [{{\"source\": \"C001\", \"relation\": \"is_a\", \"target\": \"C002\", \"evidence\": \"...\"}}]}}",
                text = chunk.text,
                concepts = concept_list,
            ),
        }
    }

    /// Strip markdown code fences, try a direct parse, then fall back to
    /// the first `{...}` block in the response.
    fn parse_envelope(raw: &str) -> Option<EdgeEnvelope> {
        let cleaned = raw
            .trim()
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim();

        if let Ok(envelope) = serde_json::from_str::<EdgeEnvelope>(cleaned) {
            return Some(envelope);
        }

        let start = cleaned.find('{')?;
        let end = cleaned.rfind('}')?;
        if end <= start {
            return None;
        }
        serde_json::from_str::<EdgeEnvelope>(&cleaned[start..=end]).ok()
    }

    /// Validate raw edges and map wire ids back to canonical labels.
    fn validate_edges(
        edges: Vec<RawEdge>,
        labels_by_id: &HashMap<String, String>,
        chunk_index: usize,
    ) -> Vec<RelationObservation> {
        let mut observations = Vec::new();
        for edge in edges {
            let Ok(relation) = RelationKind::from_str(&edge.relation) else {
                debug!(relation = %edge.relation, "dropping edge with unknown relation");
                continue;
            };
            if !LLM_VOCABULARY.contains(&relation) {
                debug!(relation = %relation, "dropping edge outside the LLM vocabulary");
                continue;
            }
            if edge.source == edge.target {
                continue;
            }
            let (Some(source), Some(target)) = (
                labels_by_id.get(&edge.source),
                labels_by_id.get(&edge.target),
            ) else {
                debug!(
                    source = %edge.source,
                    target = %edge.target,
                    "dropping edge with unassigned concept id"
                );
                continue;
            };
            let Some(evidence) = edge.evidence else {
                continue;
            };
            if evidence.split_whitespace().count() < defaults::MIN_EVIDENCE_WORDS {
                continue;
            }

            observations.push(RelationObservation {
                source: source.clone(),
                relation,
                target: target.clone(),
                evidence: Some(evidence),
                chunk_index,
            });
        }
        observations
    }
}

#[async_trait]
impl RelationExtractor for LlmExtractor {
    fn name(&self) -> &'static str {
        "llm"
    }

    fn vocabulary(&self) -> &'static [RelationKind] {
        LLM_VOCABULARY
    }

    async fn extract(&self, chunk: &ChunkContext) -> Result<Vec<RelationObservation>> {
        // Concepts present in this chunk get wire ids; fewer than two means
        // there is nothing to relate.
        let chunk_lower = chunk.text.to_lowercase();
        let ids: Vec<(String, String)> = chunk
            .concepts
            .iter()
            .filter(|c| chunk_lower.contains(&c.label))
            .enumerate()
            .map(|(i, c)| (format!("C{:03}", i + 1), c.label.clone()))
            .collect();
        if ids.len() < 2 {
            return Ok(Vec::new());
        }
        let labels_by_id: HashMap<String, String> = ids.iter().cloned().collect();

        let system = Self::system_prompt(chunk.lang);
        let prompt = Self::user_prompt(chunk, &ids);
        debug!(
            chunk_index = chunk.index,
            concept_count = ids.len(),
            prompt_len = prompt.len(),
            model = self.backend.model_name(),
            "requesting relation extraction"
        );

        let raw = self.backend.generate_json(system, &prompt).await?;

        if let Some(envelope) = Self::parse_envelope(&raw) {
            return Ok(Self::validate_edges(
                envelope.edges,
                &labels_by_id,
                chunk.index,
            ));
        }

        // One repair round-trip, then give up on this chunk.
        warn!(
            chunk_index = chunk.index,
            response_len = raw.len(),
            "malformed extraction JSON, attempting repair"
        );
        let repair_prompt = format!(
            "Fix this to valid JSON matching {{\"edges\": [...]}}. \
             Return ONLY the corrected JSON.\n\n{raw}"
        );
        let repaired = self.backend.generate_json(system, &repair_prompt).await?;

        match Self::parse_envelope(&repaired) {
            Some(envelope) => Ok(Self::validate_edges(
                envelope.edges,
                &labels_by_id,
                chunk.index,
            )),
            None => {
                warn!(
                    chunk_index = chunk.index,
                    "repair round-trip also malformed, chunk contributes no edges"
                );
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBackend;
    use trama_core::CanonicalConcept;

    fn chunk(text: &str, labels: &[&str]) -> ChunkContext {
        ChunkContext {
            index: 0,
            text: text.to_string(),
            lang: Lang::En,
            concepts: labels
                .iter()
                .map(|l| CanonicalConcept::new(*l, 1))
                .collect(),
        }
    }

    fn ml_chunk() -> ChunkContext {
        chunk(
            "machine learning is a kind of artificial intelligence",
            &["machine learning", "artificial intelligence"],
        )
    }

    const GOOD_RESPONSE: &str = r#"{"edges": [{"source": "C001", "relation": "is_a", "target": "C002", "evidence": "machine learning is a kind of artificial intelligence"}]}"#;

    #[tokio::test]
    async fn test_valid_response_maps_ids_to_labels() {
        let backend = Arc::new(MockBackend::new().with_response(GOOD_RESPONSE));
        let observations = LlmExtractor::new(backend)
            .extract(&ml_chunk())
            .await
            .unwrap();
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].source, "machine learning");
        assert_eq!(observations[0].relation, RelationKind::IsA);
        assert_eq!(observations[0].target, "artificial intelligence");
    }

    #[tokio::test]
    async fn test_fenced_response_parses() {
        let fenced = format!("```json\n{GOOD_RESPONSE}\n```");
        let backend = Arc::new(MockBackend::new().with_response(fenced));
        let observations = LlmExtractor::new(backend)
            .extract(&ml_chunk())
            .await
            .unwrap();
        assert_eq!(observations.len(), 1);
    }

    #[tokio::test]
    async fn test_prose_wrapped_response_parses() {
        let wrapped = format!("Here are the edges you asked for: {GOOD_RESPONSE} Hope it helps!");
        let backend = Arc::new(MockBackend::new().with_response(wrapped));
        let observations = LlmExtractor::new(backend)
            .extract(&ml_chunk())
            .await
            .unwrap();
        assert_eq!(observations.len(), 1);
    }

    #[tokio::test]
    async fn test_repair_round_trip() {
        let backend = Arc::new(
            MockBackend::new()
                .with_response("edges: totally not json")
                .with_response(GOOD_RESPONSE),
        );
        let extractor = LlmExtractor::new(backend.clone());
        let observations = extractor.extract(&ml_chunk()).await.unwrap();
        assert_eq!(observations.len(), 1);
        // Exactly two calls: the original and one repair.
        assert_eq!(backend.calls().len(), 2);
        assert!(backend.calls()[1].prompt.contains("Fix this to valid JSON"));
    }

    #[tokio::test]
    async fn test_repair_failure_degrades_to_zero_edges() {
        let backend = Arc::new(
            MockBackend::new()
                .with_response("still not json")
                .with_response("and neither is this"),
        );
        let backend2 = backend.clone();
        let observations = LlmExtractor::new(backend)
            .extract(&ml_chunk())
            .await
            .unwrap();
        assert!(observations.is_empty());
        assert_eq!(backend2.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_invented_ids_dropped() {
        let response = r#"{"edges": [
            {"source": "C001", "relation": "is_a", "target": "C099", "evidence": "machine learning is a kind"},
            {"source": "C001", "relation": "is_a", "target": "C002", "evidence": "machine learning is a kind"}
        ]}"#;
        let backend = Arc::new(MockBackend::new().with_response(response));
        let observations = LlmExtractor::new(backend)
            .extract(&ml_chunk())
            .await
            .unwrap();
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].target, "artificial intelligence");
    }

    #[tokio::test]
    async fn test_unknown_relation_and_self_loop_dropped() {
        let response = r#"{"edges": [
            {"source": "C001", "relation": "synonym_of", "target": "C002", "evidence": "four words of evidence"},
            {"source": "C001", "relation": "is_a", "target": "C001", "evidence": "four words of evidence"},
            {"source": "C001", "relation": "requires", "target": "C002", "evidence": "four words of evidence"}
        ]}"#;
        // "requires" parses as a RelationKind but sits outside the LLM
        // vocabulary, so all three edges must be dropped.
        let backend = Arc::new(MockBackend::new().with_response(response));
        let observations = LlmExtractor::new(backend)
            .extract(&ml_chunk())
            .await
            .unwrap();
        assert!(observations.is_empty());
    }

    #[tokio::test]
    async fn test_short_evidence_dropped() {
        let response = r#"{"edges": [{"source": "C001", "relation": "is_a", "target": "C002", "evidence": "too short"}]}"#;
        let backend = Arc::new(MockBackend::new().with_response(response));
        let observations = LlmExtractor::new(backend)
            .extract(&ml_chunk())
            .await
            .unwrap();
        assert!(observations.is_empty());
    }

    #[tokio::test]
    async fn test_fewer_than_two_present_concepts_skips_call() {
        let backend = Arc::new(MockBackend::new().with_response(GOOD_RESPONSE));
        let sparse = chunk("machine learning only appears here", &["machine learning", "databases"]);
        let observations = LlmExtractor::new(backend.clone())
            .extract(&sparse)
            .await
            .unwrap();
        assert!(observations.is_empty());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_backend_error_propagates_for_pipeline_isolation() {
        let backend = Arc::new(MockBackend::new().with_failure("model unavailable"));
        let result = LlmExtractor::new(backend).extract(&ml_chunk()).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_envelope_direct() {
        assert!(LlmExtractor::parse_envelope(GOOD_RESPONSE).is_some());
    }

    #[test]
    fn test_parse_envelope_rejects_garbage() {
        assert!(LlmExtractor::parse_envelope("no braces at all").is_none());
        assert!(LlmExtractor::parse_envelope("{\"edges\": \"not a list\"}").is_none());
        assert!(LlmExtractor::parse_envelope("").is_none());
    }

    #[test]
    fn test_spanish_prompt_language() {
        let mut es_chunk = ml_chunk();
        es_chunk.lang = Lang::Es;
        let ids = vec![
            ("C001".to_string(), "machine learning".to_string()),
            ("C002".to_string(), "artificial intelligence".to_string()),
        ];
        let prompt = LlmExtractor::user_prompt(&es_chunk, &ids);
        assert!(prompt.contains("TEXTO:"));
        assert!(prompt.contains("related_to"));
    }
}
