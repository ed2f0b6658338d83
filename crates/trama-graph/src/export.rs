//! Graph serialization: the node/edge JSON document and GraphML.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trama_core::{defaults, RelationKind};

use crate::assemble::ConceptGraph;

/// A node in the export document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDoc {
    /// Canonical label (doubles as the node id).
    pub id: String,
    /// Aggregate frequency.
    pub frequency: u32,
}

/// An edge in the export document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDoc {
    pub source: String,
    pub target: String,
    pub relation: RelationKind,
    pub weight: u32,
    /// Evidence quotes joined with the export separator.
    pub evidence: String,
}

/// The `concept_graph.json` document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    /// UTC timestamp of the export.
    pub generated_at: DateTime<Utc>,
    /// Extraction strategy that produced the edges ("pattern" or "llm").
    pub strategy: String,
    pub nodes: Vec<NodeDoc>,
    pub edges: Vec<EdgeDoc>,
}

/// Build the JSON export document.
pub fn to_json_document(graph: &ConceptGraph, strategy: &str) -> GraphDocument {
    let nodes = graph
        .nodes()
        .map(|concept| NodeDoc {
            id: concept.label.clone(),
            frequency: concept.frequency,
        })
        .collect();

    let edges = graph
        .edges()
        .map(|triple| EdgeDoc {
            source: triple.source.clone(),
            target: triple.target.clone(),
            relation: triple.relation,
            weight: triple.weight,
            evidence: triple.evidence.join(defaults::EVIDENCE_SEPARATOR),
        })
        .collect();

    GraphDocument {
        generated_at: Utc::now(),
        strategy: strategy.to_string(),
        nodes,
        edges,
    }
}

/// Serialize the graph as attributed GraphML.
pub fn to_graphml(graph: &ConceptGraph) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">\n");
    out.push_str(
        "  <key id=\"frequency\" for=\"node\" attr.name=\"frequency\" attr.type=\"int\"/>\n",
    );
    out.push_str(
        "  <key id=\"relation\" for=\"edge\" attr.name=\"relation\" attr.type=\"string\"/>\n",
    );
    out.push_str("  <key id=\"weight\" for=\"edge\" attr.name=\"weight\" attr.type=\"int\"/>\n");
    out.push_str(
        "  <key id=\"evidence\" for=\"edge\" attr.name=\"evidence\" attr.type=\"string\"/>\n",
    );
    out.push_str("  <graph id=\"concepts\" edgedefault=\"directed\">\n");

    for concept in graph.nodes() {
        out.push_str(&format!(
            "    <node id=\"{}\">\n      <data key=\"frequency\">{}</data>\n    </node>\n",
            xml_escape(&concept.label),
            concept.frequency
        ));
    }

    for triple in graph.edges() {
        out.push_str(&format!(
            "    <edge source=\"{}\" target=\"{}\">\n      <data key=\"relation\">{}</data>\n      <data key=\"weight\">{}</data>\n      <data key=\"evidence\">{}</data>\n    </edge>\n",
            xml_escape(&triple.source),
            xml_escape(&triple.target),
            triple.relation,
            triple.weight,
            xml_escape(&triple.evidence.join(defaults::EVIDENCE_SEPARATOR)),
        ));
    }

    out.push_str("  </graph>\n</graphml>\n");
    out
}

fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::GraphAssembler;
    use trama_core::{CanonicalConcept, RelationObservation};

    fn sample_graph() -> ConceptGraph {
        let concepts = vec![
            CanonicalConcept::new("machine learning", 5),
            CanonicalConcept::new("artificial intelligence", 4),
        ];
        let mut assembler = GraphAssembler::new(concepts);
        assembler.record(RelationObservation {
            source: "machine learning".to_string(),
            relation: RelationKind::IsA,
            target: "artificial intelligence".to_string(),
            evidence: Some("machine learning is a type of artificial intelligence".to_string()),
            chunk_index: 0,
        });
        assembler.finish(None)
    }

    #[test]
    fn test_json_document_shape() {
        let doc = to_json_document(&sample_graph(), "pattern");
        assert_eq!(doc.strategy, "pattern");
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.edges.len(), 1);
        assert_eq!(doc.nodes[0].id, "machine learning");
        assert_eq!(doc.edges[0].relation, RelationKind::IsA);
        assert_eq!(doc.edges[0].weight, 1);
    }

    #[test]
    fn test_json_document_serializes_snake_case_relation() {
        let doc = to_json_document(&sample_graph(), "pattern");
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"relation\":\"is_a\""));
        assert!(json.contains("\"generated_at\""));
    }

    #[test]
    fn test_graphml_structure() {
        let xml = to_graphml(&sample_graph());
        assert!(xml.starts_with("<?xml version=\"1.0\""));
        assert!(xml.contains("<graph id=\"concepts\" edgedefault=\"directed\">"));
        assert!(xml.contains("<node id=\"machine learning\">"));
        assert!(xml.contains("<data key=\"frequency\">5</data>"));
        assert!(xml.contains("<data key=\"relation\">is_a</data>"));
        assert!(xml.contains("</graphml>"));
    }

    #[test]
    fn test_graphml_escapes_special_characters() {
        let concepts = vec![
            CanonicalConcept::new("at&t research", 2),
            CanonicalConcept::new("\"quoted\" term", 2),
        ];
        let graph = GraphAssembler::new(concepts).finish(None);
        let xml = to_graphml(&graph);
        assert!(xml.contains("at&amp;t research"));
        assert!(xml.contains("&quot;quoted&quot; term"));
        assert!(!xml.contains("\"\"quoted\""));
    }

    #[test]
    fn test_evidence_joined_with_separator() {
        let concepts = vec![
            CanonicalConcept::new("a concept", 1),
            CanonicalConcept::new("b concept", 1),
        ];
        let mut assembler = GraphAssembler::new(concepts);
        for quote in ["first quote text", "second quote text"] {
            assembler.record(RelationObservation {
                source: "a concept".to_string(),
                relation: RelationKind::Causes,
                target: "b concept".to_string(),
                evidence: Some(quote.to_string()),
                chunk_index: 0,
            });
        }
        let doc = to_json_document(&assembler.finish(None), "llm");
        assert_eq!(
            doc.edges[0].evidence,
            "first quote text | second quote text"
        );
    }

    #[test]
    fn test_empty_graph_exports() {
        let graph = GraphAssembler::new(vec![CanonicalConcept::new("solo", 1)]).finish(None);
        let doc = to_json_document(&graph, "pattern");
        assert_eq!(doc.nodes.len(), 1);
        assert!(doc.edges.is_empty());
        let xml = to_graphml(&graph);
        assert!(xml.contains("<node id=\"solo\">"));
    }
}
