//! In-memory knowledge graph oracle.
//!
//! Backed by an undirected `petgraph` graph with a `DashMap` key index for
//! O(1) concept lookups. Loadable from a JSON graph file, or built
//! programmatically (the test suites do this heavily).

use std::collections::HashSet;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::RwLock;

use dashmap::DashMap;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::error::OracleError;

use super::{Oracle, RelationKind, SYNONYM_RELATION};

/// Node payload: the concept key plus the properties queries care about.
#[derive(Debug, Clone)]
struct ConceptNode {
    key: String,
    linkword: bool,
    definition: Option<String>,
}

/// One concept entry in a graph file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptSpec {
    pub key: String,
    #[serde(default)]
    pub linkword: bool,
    #[serde(default)]
    pub definition: Option<String>,
}

/// One edge entry in a graph file. `rel` is a free-form label: the
/// composition relations use "made-of"/"part-of", synonym links use
/// "synonym", and anything else doubles as a property name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub from: String,
    pub to: String,
    pub rel: String,
}

/// The JSON shape of a graph file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphFile {
    pub concepts: Vec<ConceptSpec>,
    pub edges: Vec<EdgeSpec>,
}

/// In-memory knowledge graph implementing [`Oracle`].
pub struct MemoryOracle {
    /// Undirected graph: nodes are concepts, edge weights are relation labels.
    graph: RwLock<UnGraph<ConceptNode, String>>,
    /// Concept key → NodeIndex for O(1) lookups.
    index: DashMap<String, NodeIndex>,
}

impl MemoryOracle {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            graph: RwLock::new(UnGraph::new_undirected()),
            index: DashMap::new(),
        }
    }

    /// Load a graph from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, OracleError> {
        let text = std::fs::read_to_string(path).map_err(|source| OracleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: GraphFile = serde_json::from_str(&text).map_err(|source| OracleError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_graph(file))
    }

    /// Build from an already-parsed graph file.
    pub fn from_graph(file: GraphFile) -> Self {
        let oracle = Self::new();
        for concept in file.concepts {
            oracle.insert_concept_full(
                &concept.key,
                concept.linkword,
                concept.definition.as_deref(),
            );
        }
        for edge in file.edges {
            oracle.insert_edge(&edge.from, &edge.to, &edge.rel);
        }
        tracing::info!(
            concepts = oracle.concept_count(),
            "loaded in-memory knowledge graph"
        );
        oracle
    }

    /// Ensure a node exists for the key, returning its index.
    fn ensure_node(&self, key: &str) -> NodeIndex {
        if let Some(idx) = self.index.get(key) {
            return *idx.value();
        }
        let mut graph = self.graph.write().expect("graph lock poisoned");
        // Double-check after acquiring the write lock.
        if let Some(idx) = self.index.get(key) {
            return *idx.value();
        }
        let idx = graph.add_node(ConceptNode {
            key: key.to_string(),
            linkword: false,
            definition: None,
        });
        self.index.insert(key.to_string(), idx);
        idx
    }

    /// Insert a bare concept node.
    pub fn insert_concept(&self, key: &str) {
        self.ensure_node(key);
    }

    /// Insert a concept with its linkword flag and definition.
    pub fn insert_concept_full(&self, key: &str, linkword: bool, definition: Option<&str>) {
        let idx = self.ensure_node(key);
        let mut graph = self.graph.write().expect("graph lock poisoned");
        if let Some(node) = graph.node_weight_mut(idx) {
            node.linkword = linkword;
            node.definition = definition.map(str::to_string);
        }
    }

    /// Insert a concept with a definition.
    pub fn insert_defined(&self, key: &str, definition: &str) {
        self.insert_concept_full(key, false, Some(definition));
    }

    /// Insert a linkword concept.
    pub fn insert_linkword(&self, key: &str) {
        self.insert_concept_full(key, true, None);
    }

    /// Insert an edge, creating endpoints as needed.
    pub fn insert_edge(&self, from: &str, to: &str, rel: &str) {
        let a = self.ensure_node(from);
        let b = self.ensure_node(to);
        let mut graph = self.graph.write().expect("graph lock poisoned");
        graph.add_edge(a, b, rel.to_string());
    }

    /// Number of concept nodes.
    pub fn concept_count(&self) -> usize {
        self.index.len()
    }

    fn node_of(&self, key: &str) -> Option<NodeIndex> {
        self.index.get(key).map(|idx| *idx.value())
    }
}

impl Default for MemoryOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl Oracle for MemoryOracle {
    fn exists(&self, key: &str) -> Result<bool, OracleError> {
        Ok(self.index.contains_key(key))
    }

    fn degree(&self, key: &str) -> Result<u64, OracleError> {
        let Some(idx) = self.node_of(key) else {
            return Ok(0);
        };
        let graph = self.graph.read().expect("graph lock poisoned");
        Ok(graph.edges(idx).count() as u64)
    }

    fn is_linkword(&self, key: &str) -> Result<bool, OracleError> {
        let Some(idx) = self.node_of(key) else {
            return Ok(false);
        };
        let graph = self.graph.read().expect("graph lock poisoned");
        Ok(graph.node_weight(idx).is_some_and(|n| n.linkword))
    }

    fn connected(&self, a: &str, b: &str, relation: RelationKind) -> Result<bool, OracleError> {
        let (Some(ai), Some(bi)) = (self.node_of(a), self.node_of(b)) else {
            return Ok(false);
        };
        let graph = self.graph.read().expect("graph lock poisoned");
        Ok(graph
            .edges_connecting(ai, bi)
            .any(|e| e.weight() == relation.label()))
    }

    fn shortest_path_len(&self, a: &str, b: &str) -> Result<Option<u32>, OracleError> {
        let (Some(ai), Some(bi)) = (self.node_of(a), self.node_of(b)) else {
            return Ok(None);
        };
        if ai == bi {
            return Ok(Some(0));
        }

        // Plain BFS over the undirected graph; hop count is the path length.
        let graph = self.graph.read().expect("graph lock poisoned");
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut queue: VecDeque<(NodeIndex, u32)> = VecDeque::new();
        visited.insert(ai);
        queue.push_back((ai, 0));
        while let Some((node, depth)) = queue.pop_front() {
            for neighbor in graph.neighbors(node) {
                if neighbor == bi {
                    return Ok(Some(depth + 1));
                }
                if visited.insert(neighbor) {
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }
        Ok(None)
    }

    fn related_by_property(
        &self,
        key: &str,
        property: &str,
    ) -> Result<Vec<String>, OracleError> {
        let Some(idx) = self.node_of(key) else {
            return Ok(Vec::new());
        };
        let graph = self.graph.read().expect("graph lock poisoned");
        let mut results = Vec::new();
        for edge in graph.edges(idx) {
            if edge.weight() == property {
                let other = if edge.source() == idx {
                    edge.target()
                } else {
                    edge.source()
                };
                if let Some(node) = graph.node_weight(other) {
                    results.push(node.key.clone());
                }
            }
        }
        Ok(results)
    }

    fn definitions(&self, key: &str) -> Result<Option<String>, OracleError> {
        let Some(idx) = self.node_of(key) else {
            return Ok(None);
        };
        let graph = self.graph.read().expect("graph lock poisoned");
        let mut parts: Vec<&str> = Vec::new();
        if let Some(def) = graph.node_weight(idx).and_then(|n| n.definition.as_deref()) {
            parts.push(def);
        }
        for edge in graph.edges(idx) {
            if edge.weight() == SYNONYM_RELATION {
                let other = if edge.source() == idx {
                    edge.target()
                } else {
                    edge.source()
                };
                if let Some(def) = graph.node_weight(other).and_then(|n| n.definition.as_deref())
                {
                    parts.push(def);
                }
            }
        }
        if parts.is_empty() {
            Ok(None)
        } else {
            Ok(Some(parts.join(" ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_graph() -> MemoryOracle {
        // rock -- mineral -- iron -- magnet
        let kb = MemoryOracle::new();
        kb.insert_edge("rock", "mineral", "related");
        kb.insert_edge("mineral", "iron", "related");
        kb.insert_edge("iron", "magnet", "related");
        kb
    }

    #[test]
    fn existence_and_degree() {
        let kb = chain_graph();
        assert!(kb.exists("mineral").unwrap());
        assert!(!kb.exists("granite").unwrap());
        assert_eq!(kb.degree("mineral").unwrap(), 2);
        assert_eq!(kb.degree("magnet").unwrap(), 1);
        assert_eq!(kb.degree("granite").unwrap(), 0);
    }

    #[test]
    fn shortest_paths() {
        let kb = chain_graph();
        assert_eq!(kb.shortest_path_len("rock", "mineral").unwrap(), Some(1));
        assert_eq!(kb.shortest_path_len("rock", "magnet").unwrap(), Some(3));
        assert_eq!(kb.shortest_path_len("magnet", "rock").unwrap(), Some(3));
        assert_eq!(kb.shortest_path_len("rock", "rock").unwrap(), Some(0));
        kb.insert_concept("island");
        assert_eq!(kb.shortest_path_len("rock", "island").unwrap(), None);
    }

    #[test]
    fn relation_kinds_are_direction_blind() {
        let kb = MemoryOracle::new();
        kb.insert_edge("rust", "iron_oxide", RelationKind::MadeOf.label());
        assert!(kb.connected("rust", "iron_oxide", RelationKind::MadeOf).unwrap());
        assert!(kb.connected("iron_oxide", "rust", RelationKind::MadeOf).unwrap());
        assert!(!kb.connected("rust", "iron_oxide", RelationKind::PartOf).unwrap());
    }

    #[test]
    fn property_lookup() {
        let kb = MemoryOracle::new();
        kb.insert_edge("barnacle", "whale", "attach");
        kb.insert_edge("barnacle", "rock", "attach");
        kb.insert_edge("barnacle", "crab", "resemble");
        let mut related = kb.related_by_property("barnacle", "attach").unwrap();
        related.sort();
        assert_eq!(related, vec!["rock", "whale"]);
    }

    #[test]
    fn definitions_include_synonyms() {
        let kb = MemoryOracle::new();
        kb.insert_defined("water", "a clear liquid that boils at 100 degrees");
        kb.insert_defined("h2o", "the chemical name for water");
        kb.insert_edge("water", "h2o", SYNONYM_RELATION);
        let def = kb.definitions("water").unwrap().unwrap();
        assert!(def.contains("clear liquid"));
        assert!(def.contains("chemical name"));
        assert_eq!(kb.definitions("lava").unwrap(), None);
    }

    #[test]
    fn linkword_flag() {
        let kb = MemoryOracle::new();
        kb.insert_linkword("attach");
        kb.insert_concept("rock");
        assert!(kb.is_linkword("attach").unwrap());
        assert!(!kb.is_linkword("rock").unwrap());
        assert!(!kb.is_linkword("missing").unwrap());
    }

    #[test]
    fn graph_file_round_trip() {
        let file = GraphFile {
            concepts: vec![
                ConceptSpec {
                    key: "rust".into(),
                    linkword: false,
                    definition: Some("a red oxide coating".into()),
                },
                ConceptSpec {
                    key: "iron_oxide".into(),
                    linkword: false,
                    definition: None,
                },
            ],
            edges: vec![EdgeSpec {
                from: "rust".into(),
                to: "iron_oxide".into(),
                rel: "made-of".into(),
            }],
        };
        let kb = MemoryOracle::from_graph(file);
        assert!(kb.exists("rust").unwrap());
        assert!(kb.connected("rust", "iron_oxide", RelationKind::MadeOf).unwrap());
        assert_eq!(
            kb.definitions("rust").unwrap().as_deref(),
            Some("a red oxide coating")
        );
    }

}
