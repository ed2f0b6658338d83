//! Merge relation observations into the final weighted concept graph.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, trace};

use trama_core::{defaults, CanonicalConcept, RelationKind, RelationObservation, RelationTriple};

/// The assembled, immutable concept graph.
///
/// Nodes are canonical concepts carrying their aggregate frequency; edges
/// are merged relation triples. Multiple edges between the same ordered
/// node pair are allowed when they differ in relation type.
#[derive(Debug)]
pub struct ConceptGraph {
    graph: DiGraph<CanonicalConcept, RelationTriple>,
    index: HashMap<String, NodeIndex>,
}

impl ConceptGraph {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nodes in insertion (frequency-ranked) order.
    pub fn nodes(&self) -> impl Iterator<Item = &CanonicalConcept> {
        self.graph.node_weights()
    }

    /// Edges in weight-ranked order.
    pub fn edges(&self) -> impl Iterator<Item = &RelationTriple> {
        self.graph.edge_weights()
    }

    /// Look up a concept by label.
    pub fn concept(&self, label: &str) -> Option<&CanonicalConcept> {
        self.index.get(label).map(|ix| &self.graph[*ix])
    }

    /// Access the underlying petgraph structure (for algorithms and
    /// visualization tooling).
    pub fn inner(&self) -> &DiGraph<CanonicalConcept, RelationTriple> {
        &self.graph
    }
}

struct EdgeAccum {
    weight: u32,
    evidence: Vec<String>,
}

/// Merges observations across chunks. The counter-based merge is
/// commutative: observations may arrive in any order.
pub struct GraphAssembler {
    concepts: Vec<CanonicalConcept>,
    known: HashMap<String, usize>,
    edges: HashMap<(String, RelationKind, String), EdgeAccum>,
    skipped: u64,
}

impl GraphAssembler {
    /// Create an assembler over the run's canonical concept set.
    pub fn new(concepts: Vec<CanonicalConcept>) -> Self {
        let known = concepts
            .iter()
            .enumerate()
            .map(|(i, c)| (c.label.clone(), i))
            .collect();
        Self {
            concepts,
            known,
            edges: HashMap::new(),
            skipped: 0,
        }
    }

    /// Record one observation: unknown endpoints and self-loops are skipped,
    /// repeats increment the weight and append evidence up to the cap.
    pub fn record(&mut self, observation: RelationObservation) {
        if observation.source == observation.target {
            trace!(label = %observation.source, "skipping self-loop");
            self.skipped += 1;
            return;
        }
        if !self.known.contains_key(&observation.source)
            || !self.known.contains_key(&observation.target)
        {
            trace!(
                source = %observation.source,
                target = %observation.target,
                "skipping observation with unknown endpoint"
            );
            self.skipped += 1;
            return;
        }

        let key = (
            observation.source,
            observation.relation,
            observation.target,
        );
        let accum = self.edges.entry(key).or_insert(EdgeAccum {
            weight: 0,
            evidence: Vec::new(),
        });
        accum.weight += 1;
        if let Some(evidence) = observation.evidence {
            if accum.evidence.len() < defaults::EVIDENCE_CAP && !accum.evidence.contains(&evidence)
            {
                accum.evidence.push(evidence);
            }
        }
    }

    /// Number of observations rejected so far.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Build the immutable graph. When `max_edges` is set, only the
    /// heaviest edges are kept (ties broken by key for determinism).
    pub fn finish(self, max_edges: Option<usize>) -> ConceptGraph {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for concept in self.concepts {
            let label = concept.label.clone();
            let ix = graph.add_node(concept);
            index.insert(label, ix);
        }

        let mut ranked: Vec<((String, RelationKind, String), EdgeAccum)> =
            self.edges.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.weight
                .cmp(&a.1.weight)
                .then_with(|| a.0.cmp(&b.0))
        });
        if let Some(cap) = max_edges {
            ranked.truncate(cap);
        }

        let edge_count = ranked.len();
        for ((source, relation, target), accum) in ranked {
            let triple = RelationTriple {
                source: source.clone(),
                relation,
                target: target.clone(),
                weight: accum.weight,
                evidence: accum.evidence,
            };
            graph.add_edge(index[&source], index[&target], triple);
        }

        debug!(
            node_count = graph.node_count(),
            edge_count,
            skipped = self.skipped,
            "graph assembly complete"
        );

        ConceptGraph { graph, index }
    }
}
