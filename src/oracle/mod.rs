//! Knowledge-graph oracle: the read-only query surface the solver runs on.
//!
//! The solver never stores or invents knowledge; every concept it talks about
//! is defined by what an [`Oracle`] answers. Three implementations ship:
//!
//! - [`MemoryOracle`]: in-memory graph loaded from a JSON file, used by the
//!   CLI's `--graph` mode and by the test suite
//! - [`HttpOracle`]: blocking REST client against a remote concept service
//! - [`CachedOracle`]: request-scoped memoization wrapper for one solve

pub mod cache;
pub mod http;
pub mod memory;

pub use cache::CachedOracle;
pub use http::HttpOracle;
pub use memory::{ConceptSpec, EdgeSpec, GraphFile, MemoryOracle};

use std::fmt;

use crate::error::OracleError;

/// The composition relations the scoring engine queries directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    MadeOf,
    PartOf,
}

impl RelationKind {
    /// The edge label carried in graph files and wire requests.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MadeOf => "made-of",
            Self::PartOf => "part-of",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Edge label connecting a concept to its synonyms.
pub const SYNONYM_RELATION: &str = "synonym";

/// Read-only knowledge-graph queries.
///
/// Concept keys are lowercase, with multi-word concepts joined by
/// underscores. All methods are blocking; a failure is fatal to the run
/// (the solver propagates it, it never retries). Implementations must be
/// safe for concurrent reads so independent questions can be solved in
/// parallel.
pub trait Oracle {
    /// Whether a concept node exists.
    fn exists(&self, key: &str) -> Result<bool, OracleError>;

    /// Number of edges incident to the concept. Specific concepts have low
    /// degree; generic ones are hubs.
    fn degree(&self, key: &str) -> Result<u64, OracleError>;

    /// Whether the concept is flagged as a relation word usable for
    /// property-based matching.
    fn is_linkword(&self, key: &str) -> Result<bool, OracleError>;

    /// Whether two concepts are directly connected by the given relation,
    /// in either direction.
    fn connected(&self, a: &str, b: &str, relation: RelationKind) -> Result<bool, OracleError>;

    /// Length in hops of the shortest undirected path between two concepts,
    /// or `None` if no path exists.
    fn shortest_path_len(&self, a: &str, b: &str) -> Result<Option<u32>, OracleError>;

    /// Keys of concepts connected to `key` by an edge labelled `property`.
    fn related_by_property(&self, key: &str, property: &str)
    -> Result<Vec<String>, OracleError>;

    /// The concept's definition text, concatenated with the definitions of
    /// its synonyms. `None` when neither carries one.
    fn definitions(&self, key: &str) -> Result<Option<String>, OracleError>;
}
