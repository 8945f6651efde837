//! # Triple Store
//!
//! The triple-indexed semantic layer on top of [`GraphStore`].
//!
//! A (subject, predicate, object) assertion is represented physically as
//! three nodes, two edges (subject→predicate, predicate→object) and two
//! auxiliary index entries: `key(subject, predicate) → {object digests}` and
//! `key(predicate, object) → {subject digests}`. The auxiliary maps answer
//! both query directions with a direct bucket lookup instead of scanning
//! all edges, and are always a complete, consistent derivation of the edge
//! set.
//!
//! Triples are append-only; there is no update or retraction.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::addresser::{digest_keys, digest_value};
use crate::graph::{GraphDump, GraphStore};
use crate::matcher::ValueMatch;
use crate::{Digest, InsertMode, ScalarValue, TrigraphError};

// =============================================================================
// TRIPLE STORE
// =============================================================================

/// A graph store extended with subject/predicate/object indexing.
///
/// Owns the underlying [`GraphStore`] and the two auxiliary maps; holds no
/// duplicate copy of node or edge data — everything else goes through
/// digests delegated to the graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripleStore {
    graph: GraphStore,
    /// key(subject, predicate) -> set of object digests.
    subject_predicate: BTreeMap<Digest, BTreeSet<Digest>>,
    /// key(predicate, object) -> set of subject digests.
    predicate_object: BTreeMap<Digest, BTreeSet<Digest>>,
}

impl TripleStore {
    /// Create a new empty triple store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying graph.
    #[must_use]
    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    /// Mutable access to the underlying graph, for callers that mix plain
    /// nodes and edges with triple assertions.
    pub fn graph_mut(&mut self) -> &mut GraphStore {
        &mut self.graph
    }

    // =========================================================================
    // ASSERTION
    // =========================================================================

    /// Assert a (subject, predicate, object) triple.
    ///
    /// Ensures all three values exist as nodes, creates both edges, and
    /// appends to both auxiliary sets. Re-asserting an identical triple is
    /// idempotent at every level. Returns the assertion id, derived from the
    /// three node digests.
    pub fn assert_triple(
        &mut self,
        subject: impl Into<ScalarValue>,
        predicate: impl Into<ScalarValue>,
        object: impl Into<ScalarValue>,
    ) -> Result<Digest, TrigraphError> {
        let sd = self
            .graph
            .add_node(subject, InsertMode::Idempotent)?
            .digest();
        let pd = self
            .graph
            .add_node(predicate, InsertMode::Idempotent)?
            .digest();
        let od = self.graph.add_node(object, InsertMode::Idempotent)?.digest();

        self.graph.add_edge(sd, pd, InsertMode::Idempotent)?;
        self.graph.add_edge(pd, od, InsertMode::Idempotent)?;

        self.subject_predicate
            .entry(digest_keys(&[sd, pd]))
            .or_default()
            .insert(od);
        self.predicate_object
            .entry(digest_keys(&[pd, od]))
            .or_default()
            .insert(sd);

        Ok(digest_keys(&[sd, pd, od]))
    }

    // =========================================================================
    // ADJACENCY QUERIES
    // =========================================================================

    /// Every subject ever related to this predicate, via the predicate
    /// node's incoming adjacency.
    ///
    /// Returns `None` when the predicate node is unknown, `Some` of an empty
    /// sequence when the predicate exists but nothing points at it.
    pub fn query_subjects<'a>(
        &'a self,
        predicate: impl Into<ScalarValue>,
        filter: Option<&'a ValueMatch>,
    ) -> Option<impl Iterator<Item = &'a ScalarValue> + 'a> {
        let pd = self.graph.digest_of(&predicate.into())?;
        Some(
            self.graph
                .inc_edges(pd)
                .filter_map(move |edge| self.graph.edge_head(edge))
                .filter_map(move |head| self.graph.node_value(head))
                .filter(move |value| ValueMatch::accepts(filter, *value)),
        )
    }

    /// Every object ever related to this predicate, via the predicate
    /// node's outgoing adjacency. Symmetric to [`TripleStore::query_subjects`].
    pub fn query_objects<'a>(
        &'a self,
        predicate: impl Into<ScalarValue>,
        filter: Option<&'a ValueMatch>,
    ) -> Option<impl Iterator<Item = &'a ScalarValue> + 'a> {
        let pd = self.graph.digest_of(&predicate.into())?;
        Some(
            self.graph
                .out_edges(pd)
                .filter_map(move |edge| self.graph.edge_tail(edge))
                .filter_map(move |tail| self.graph.node_value(tail))
                .filter(move |value| ValueMatch::accepts(filter, *value)),
        )
    }

    // =========================================================================
    // BUCKET QUERIES
    // =========================================================================

    /// The objects asserted for (subject, predicate): a direct bucket lookup
    /// in the subject+predicate map. This is the performance-critical path
    /// that avoids scanning all triples.
    pub fn query_subject_predicate<'a>(
        &'a self,
        subject: impl Into<ScalarValue>,
        predicate: impl Into<ScalarValue>,
    ) -> impl Iterator<Item = &'a ScalarValue> + 'a {
        let key = digest_keys(&[
            digest_value(&subject.into()),
            digest_value(&predicate.into()),
        ]);
        self.subject_predicate
            .get(&key)
            .into_iter()
            .flat_map(|bucket| bucket.iter())
            .filter_map(move |object| self.graph.node_value(*object))
    }

    /// The subjects asserted for (predicate, object): a direct bucket lookup
    /// in the predicate+object map.
    pub fn query_predicate_object<'a>(
        &'a self,
        predicate: impl Into<ScalarValue>,
        object: impl Into<ScalarValue>,
    ) -> impl Iterator<Item = &'a ScalarValue> + 'a {
        let key = digest_keys(&[
            digest_value(&predicate.into()),
            digest_value(&object.into()),
        ]);
        self.predicate_object
            .get(&key)
            .into_iter()
            .flat_map(|bucket| bucket.iter())
            .filter_map(move |subject| self.graph.node_value(*subject))
    }

    // =========================================================================
    // PATTERN QUERIES
    // =========================================================================

    /// Query with optional wildcards; `None` is a wildcard term.
    ///
    /// The predicate must be concrete: no index is keyed purely by
    /// predicate, so a wildcard predicate is a contract violation. An
    /// all-wildcard pattern is likewise rejected. Matching is exact.
    pub fn query_triple(
        &self,
        subject: Option<&ScalarValue>,
        predicate: Option<&ScalarValue>,
        object: Option<&ScalarValue>,
    ) -> Result<Vec<(ScalarValue, ScalarValue, ScalarValue)>, TrigraphError> {
        if subject.is_none() && predicate.is_none() && object.is_none() {
            return Err(TrigraphError::UnboundPattern);
        }
        let Some(predicate) = predicate else {
            return Err(TrigraphError::WildcardPredicate);
        };
        let pd = digest_value(predicate);

        let mut result = Vec::new();
        match (subject, object) {
            // Fully concrete: probe the subject+predicate bucket and keep
            // the triple only if the object is a member.
            (Some(s), Some(o)) => {
                let key = digest_keys(&[digest_value(s), pd]);
                let od = digest_value(o);
                if self
                    .subject_predicate
                    .get(&key)
                    .is_some_and(|bucket| bucket.contains(&od))
                {
                    result.push((s.clone(), predicate.clone(), o.clone()));
                }
            }
            // Object wildcard: expand the subject+predicate bucket.
            (Some(s), None) => {
                let key = digest_keys(&[digest_value(s), pd]);
                if let Some(bucket) = self.subject_predicate.get(&key) {
                    for od in bucket {
                        if let Some(value) = self.graph.node_value(*od) {
                            result.push((s.clone(), predicate.clone(), value.clone()));
                        }
                    }
                }
            }
            // Subject wildcard: expand the predicate+object bucket.
            (None, Some(o)) => {
                let key = digest_keys(&[pd, digest_value(o)]);
                if let Some(bucket) = self.predicate_object.get(&key) {
                    for sd in bucket {
                        if let Some(value) = self.graph.node_value(*sd) {
                            result.push((value.clone(), predicate.clone(), o.clone()));
                        }
                    }
                }
            }
            // Only the predicate is concrete: enumerate its subjects from
            // incoming adjacency and expand each through its own bucket, so
            // the result holds exactly the asserted triples.
            (None, None) => {
                for edge in self.graph.inc_edges(pd) {
                    let Some(sd) = self.graph.edge_head(edge) else {
                        continue;
                    };
                    let Some(subject_value) = self.graph.node_value(sd) else {
                        continue;
                    };
                    let key = digest_keys(&[sd, pd]);
                    if let Some(bucket) = self.subject_predicate.get(&key) {
                        for od in bucket {
                            if let Some(object_value) = self.graph.node_value(*od) {
                                result.push((
                                    subject_value.clone(),
                                    predicate.clone(),
                                    object_value.clone(),
                                ));
                            }
                        }
                    }
                }
            }
        }

        Ok(result)
    }

    // =========================================================================
    // BULK TRANSFER
    // =========================================================================

    /// Export the graph and both auxiliary maps into a transfer
    /// representation.
    #[must_use]
    pub fn to_dump(&self) -> TripleDump {
        TripleDump {
            graph: self.graph.to_dump(),
            subject_predicate: self.subject_predicate.clone(),
            predicate_object: self.predicate_object.clone(),
        }
    }

    /// Rebuild a triple store from a transfer representation. Graph
    /// adjacency is regenerated from the edge set; the auxiliary maps are
    /// taken as given (they carry assertion information the edges alone do
    /// not determine).
    #[must_use]
    pub fn from_dump(dump: TripleDump) -> Self {
        Self {
            graph: GraphStore::from_dump(dump.graph),
            subject_predicate: dump.subject_predicate,
            predicate_object: dump.predicate_object,
        }
    }
}

// =============================================================================
// TRANSFER REPRESENTATION
// =============================================================================

/// Transfer representation of a triple store: the graph dump extended with
/// the two auxiliary maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripleDump {
    /// The underlying graph.
    pub graph: GraphDump,
    /// key(subject, predicate) -> set of object digests.
    pub subject_predicate: BTreeMap<Digest, BTreeSet<Digest>>,
    /// key(predicate, object) -> set of subject digests.
    pub predicate_object: BTreeMap<Digest, BTreeSet<Digest>>,
}

// =============================================================================
// TESTS
// =============================================================================
