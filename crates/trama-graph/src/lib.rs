//! # trama-graph
//!
//! Graph assembly and serialization. The [`GraphAssembler`] owns the only
//! mutable view of the concept graph: relation observations are merged into
//! weighted, evidenced, typed edges keyed by `(source, relation, target)`,
//! and the finished [`ConceptGraph`] is an immutable value handed to the
//! serializers.

pub mod assemble;
pub mod export;

pub use assemble::{ConceptGraph, GraphAssembler};
pub use export::{to_graphml, to_json_document, EdgeDoc, GraphDocument, NodeDoc};
