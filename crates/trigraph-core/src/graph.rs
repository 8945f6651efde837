//! # Graph Store
//!
//! The content-addressed directed graph at the bottom of the engine.
//!
//! Nodes are stored in a single arena keyed by digest; each node record owns
//! its value together with its incoming and outgoing adjacency sets, so
//! there is no parallel side-table to keep in sync. Edges are stored as
//! (head, tail) digest pairs under a digest derived from the pair, which
//! makes edge insertion naturally idempotent: a given ordered pair of nodes
//! has at most one directed edge between them.
//!
//! All collections are `BTreeMap`/`BTreeSet` for deterministic enumeration.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::addresser::{digest_keys, digest_value};
use crate::{Digest, InsertMode, Insertion, ScalarValue, TrigraphError};

// =============================================================================
// NODE ARENA
// =============================================================================

/// A node record: the stored value plus both adjacency sets.
///
/// Invariant: for every edge e = (h, t) in the store, e is in `outgoing` of
/// h's record and in `incoming` of t's record, and in no other record.
#[derive(Debug, Clone, PartialEq)]
struct NodeRecord {
    value: ScalarValue,
    incoming: BTreeSet<Digest>,
    outgoing: BTreeSet<Digest>,
}

impl NodeRecord {
    fn new(value: ScalarValue) -> Self {
        Self {
            value,
            incoming: BTreeSet::new(),
            outgoing: BTreeSet::new(),
        }
    }
}

// =============================================================================
// GRAPH STORE
// =============================================================================

/// A content-addressed directed graph.
///
/// Nodes and edges are immutable once created and are never deleted; the
/// store only grows. Mutation is single-threaded and synchronous: every
/// operation runs to completion on the caller's thread, and no partially
/// applied state is ever observable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphStore {
    /// Node arena: digest -> (value, incoming, outgoing).
    nodes: BTreeMap<Digest, NodeRecord>,
    /// Edge map: digest -> (head digest, tail digest).
    edges: BTreeMap<Digest, (Digest, Digest)>,
}

impl GraphStore {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // MUTATION
    // =========================================================================

    /// Add a node holding the given value.
    ///
    /// The node's digest is derived from the value, so re-adding identical
    /// content never duplicates storage: under [`InsertMode::Idempotent`] a
    /// duplicate returns `Insertion::Existing`, under
    /// [`InsertMode::StrictUnique`] it is reported as
    /// [`TrigraphError::DuplicateNode`].
    pub fn add_node(
        &mut self,
        value: impl Into<ScalarValue>,
        mode: InsertMode,
    ) -> Result<Insertion, TrigraphError> {
        let value = value.into();
        let key = digest_value(&value);
        if self.nodes.contains_key(&key) {
            return match mode {
                InsertMode::Idempotent => Ok(Insertion::Existing(key)),
                InsertMode::StrictUnique => Err(TrigraphError::DuplicateNode(key)),
            };
        }
        self.nodes.insert(key, NodeRecord::new(value));
        Ok(Insertion::Created(key))
    }

    /// Add a directed edge going from `head` to `tail`.
    ///
    /// Both endpoints must already exist; otherwise the edge is not created
    /// and [`TrigraphError::UnknownEndpoint`] names the missing digest. The
    /// edge digest is derived from the endpoint pair, and both adjacency
    /// sets are updated before this returns.
    pub fn add_edge(
        &mut self,
        head: Digest,
        tail: Digest,
        mode: InsertMode,
    ) -> Result<Insertion, TrigraphError> {
        if !self.nodes.contains_key(&head) {
            return Err(TrigraphError::UnknownEndpoint(head));
        }
        if !self.nodes.contains_key(&tail) {
            return Err(TrigraphError::UnknownEndpoint(tail));
        }
        let key = digest_keys(&[head, tail]);
        if self.edges.contains_key(&key) {
            return match mode {
                InsertMode::Idempotent => Ok(Insertion::Existing(key)),
                InsertMode::StrictUnique => Err(TrigraphError::DuplicateEdge(key)),
            };
        }
        self.edges.insert(key, (head, tail));
        if let Some(record) = self.nodes.get_mut(&head) {
            record.outgoing.insert(key);
        }
        if let Some(record) = self.nodes.get_mut(&tail) {
            record.incoming.insert(key);
        }
        Ok(Insertion::Created(key))
    }

    /// Add two directed edges between `a` and `b`, one in each direction.
    ///
    /// Each direction follows the idempotence rule independently.
    pub fn add_bi_edge(&mut self, a: Digest, b: Digest) -> Result<(), TrigraphError> {
        self.add_edge(a, b, InsertMode::Idempotent)?;
        self.add_edge(b, a, InsertMode::Idempotent)?;
        Ok(())
    }

    // =========================================================================
    // LOOKUPS
    // =========================================================================

    /// The stored value for a node digest.
    #[must_use]
    pub fn node_value(&self, node: Digest) -> Option<&ScalarValue> {
        self.nodes.get(&node).map(|record| &record.value)
    }

    /// The digest a value is stored under, if the value is present.
    ///
    /// Recomputes the digest and checks membership.
    #[must_use]
    pub fn digest_of(&self, value: &ScalarValue) -> Option<Digest> {
        let key = digest_value(value);
        self.nodes.contains_key(&key).then_some(key)
    }

    /// Whether a node digest is in the graph.
    #[must_use]
    pub fn contains_node(&self, node: Digest) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Whether a value is stored in the graph.
    #[must_use]
    pub fn contains_value(&self, value: &ScalarValue) -> bool {
        self.digest_of(value).is_some()
    }

    /// The (head, tail) endpoints of an edge digest.
    #[must_use]
    pub fn edge_endpoints(&self, edge: Digest) -> Option<(Digest, Digest)> {
        self.edges.get(&edge).copied()
    }

    /// The head node of an edge digest.
    #[must_use]
    pub fn edge_head(&self, edge: Digest) -> Option<Digest> {
        self.edge_endpoints(edge).map(|(head, _)| head)
    }

    /// The tail node of an edge digest.
    #[must_use]
    pub fn edge_tail(&self, edge: Digest) -> Option<Digest> {
        self.edge_endpoints(edge).map(|(_, tail)| tail)
    }

    /// Whether an edge digest is in the graph.
    #[must_use]
    pub fn contains_edge_id(&self, edge: Digest) -> bool {
        self.edges.contains_key(&edge)
    }

    /// The digest of the edge from `head` to `tail`, if present.
    #[must_use]
    pub fn edge_between(&self, head: Digest, tail: Digest) -> Option<Digest> {
        let key = digest_keys(&[head, tail]);
        self.edges.contains_key(&key).then_some(key)
    }

    /// Whether a directed edge from `head` to `tail` is in the graph.
    #[must_use]
    pub fn contains_edge(&self, head: Digest, tail: Digest) -> bool {
        self.edge_between(head, tail).is_some()
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // =========================================================================
    // ENUMERATION
    // =========================================================================

    /// Iterate all (digest, value) node pairs.
    pub fn iter_nodes(&self) -> impl Iterator<Item = (Digest, &ScalarValue)> {
        self.nodes.iter().map(|(key, record)| (*key, &record.value))
    }

    /// Iterate all (digest, (head, tail)) edge entries.
    pub fn iter_edges(&self) -> impl Iterator<Item = (Digest, (Digest, Digest))> + '_ {
        self.edges.iter().map(|(key, endpoints)| (*key, *endpoints))
    }

    /// Iterate all node digests.
    pub fn node_digests(&self) -> impl Iterator<Item = Digest> + '_ {
        self.nodes.keys().copied()
    }

    /// Iterate all edge digests.
    pub fn edge_digests(&self) -> impl Iterator<Item = Digest> + '_ {
        self.edges.keys().copied()
    }

    // =========================================================================
    // ADJACENCY
    // =========================================================================

    /// Iterate the outgoing edge digests of a node.
    ///
    /// Unknown digests degrade gracefully to an empty sequence instead of an
    /// error. Every call produces a fresh, independent iterator.
    pub fn out_edges(&self, node: Digest) -> impl Iterator<Item = Digest> + '_ {
        self.nodes
            .get(&node)
            .into_iter()
            .flat_map(|record| record.outgoing.iter().copied())
    }

    /// Iterate the incoming edge digests of a node.
    pub fn inc_edges(&self, node: Digest) -> impl Iterator<Item = Digest> + '_ {
        self.nodes
            .get(&node)
            .into_iter()
            .flat_map(|record| record.incoming.iter().copied())
    }

    /// All edge digests touching a node, incoming and outgoing combined.
    #[must_use]
    pub fn all_edges(&self, node: Digest) -> BTreeSet<Digest> {
        self.inc_edges(node).chain(self.out_edges(node)).collect()
    }

    /// Number of outgoing edges of a node.
    #[must_use]
    pub fn out_degree(&self, node: Digest) -> usize {
        self.nodes
            .get(&node)
            .map_or(0, |record| record.outgoing.len())
    }

    /// Number of incoming edges of a node.
    #[must_use]
    pub fn inc_degree(&self, node: Digest) -> usize {
        self.nodes
            .get(&node)
            .map_or(0, |record| record.incoming.len())
    }

    /// Total degree of a node.
    #[must_use]
    pub fn all_degree(&self, node: Digest) -> usize {
        self.inc_degree(node) + self.out_degree(node)
    }

    /// One-hop traversal along outgoing edges: the digests of the nodes this
    /// node points at.
    ///
    /// Finite, bounded by the current edge count; a fresh call produces a
    /// fresh sequence with no shared cursor state.
    pub fn next_nodes(&self, node: Digest) -> impl Iterator<Item = Digest> + '_ {
        self.out_edges(node)
            .filter_map(move |edge| self.edge_tail(edge))
    }

    /// One-hop traversal along incoming edges: the digests of the nodes
    /// pointing at this node.
    pub fn prev_nodes(&self, node: Digest) -> impl Iterator<Item = Digest> + '_ {
        self.inc_edges(node)
            .filter_map(move |edge| self.edge_head(edge))
    }

    // =========================================================================
    // BULK TRANSFER
    // =========================================================================

    /// Export the node and edge collections into a transfer representation.
    ///
    /// The dump carries no adjacency data; [`GraphStore::from_dump`]
    /// regenerates it.
    #[must_use]
    pub fn to_dump(&self) -> GraphDump {
        GraphDump {
            nodes: self
                .nodes
                .iter()
                .map(|(key, record)| (*key, record.value.clone()))
                .collect(),
            edges: self.edges.clone(),
        }
    }

    /// Rebuild a store from a transfer representation, recomputing every
    /// adjacency entry from the edge set.
    ///
    /// Edges referencing digests absent from the node map are dropped, so a
    /// rebuilt store never contains dangling edges.
    #[must_use]
    pub fn from_dump(dump: GraphDump) -> Self {
        let mut nodes: BTreeMap<Digest, NodeRecord> = dump
            .nodes
            .into_iter()
            .map(|(key, value)| (key, NodeRecord::new(value)))
            .collect();

        let mut edges = BTreeMap::new();
        for (key, (head, tail)) in dump.edges {
            if !nodes.contains_key(&head) || !nodes.contains_key(&tail) {
                continue;
            }
            edges.insert(key, (head, tail));
            if let Some(record) = nodes.get_mut(&head) {
                record.outgoing.insert(key);
            }
            if let Some(record) = nodes.get_mut(&tail) {
                record.incoming.insert(key);
            }
        }

        Self { nodes, edges }
    }
}

// =============================================================================
// TRANSFER REPRESENTATION
// =============================================================================

/// Structural transfer representation of a graph: the node map and the edge
/// map, digests preserved bit-for-bit.
///
/// This is the only shape serializers and persistent-store adapters need to
/// produce or consume; byte-level wire formats live in [`crate::formats`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDump {
    /// Node digest -> stored value.
    pub nodes: BTreeMap<Digest, ScalarValue>,
    /// Edge digest -> (head digest, tail digest).
    pub edges: BTreeMap<Digest, (Digest, Digest)>,
}

// =============================================================================
// TESTS
// =============================================================================
