//! # Document Convention Layer
//!
//! Table/document semantics mapped onto the triple layer with path-shaped
//! node names: an application owns `/{app}/tables/` and `/{app}/meta/`
//! roots, each table owns `docs/` and `meta/` children, and each document
//! is a node under its table's `docs/` path whose fields are plain triples
//! (document path, field name, field value).
//!
//! The layer consumes the engine strictly through its public surface:
//! node/edge insertion, triple assertion and the bucket queries. It never
//! reaches into adjacency internals.

use std::collections::{BTreeMap, BTreeSet};

use crate::addresser::{digest_keys, digest_value};
use crate::triple::TripleStore;
use crate::{Digest, InsertMode, ScalarValue, TrigraphError};

/// Field map of a document; multi-valued fields fan out into one triple
/// per value.
pub type DocFields = BTreeMap<String, Vec<ScalarValue>>;

/// A document store for one application.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    triples: TripleStore,
    app: String,
    tables_path: String,
    tables_id: Digest,
    /// Chain key -> the field-triple ids of one document, in field order.
    chains: BTreeMap<Digest, Vec<Digest>>,
}

impl DocumentStore {
    /// Create the store for an application, with its root nodes and edges.
    pub fn new(app: impl Into<String>) -> Result<Self, TrigraphError> {
        let app = app.into();
        let root_path = format!("/{app}/");
        let tables_path = format!("/{app}/tables/");
        let meta_path = format!("/{app}/meta/");

        let mut triples = TripleStore::new();
        let graph = triples.graph_mut();
        let root_id = graph
            .add_node(root_path, InsertMode::Idempotent)?
            .digest();
        let tables_id = graph
            .add_node(tables_path.clone(), InsertMode::Idempotent)?
            .digest();
        let meta_id = graph
            .add_node(meta_path, InsertMode::Idempotent)?
            .digest();
        graph.add_edge(root_id, tables_id, InsertMode::Idempotent)?;
        graph.add_edge(root_id, meta_id, InsertMode::Idempotent)?;

        Ok(Self {
            triples,
            app,
            tables_path,
            tables_id,
            chains: BTreeMap::new(),
        })
    }

    /// The application name this store was created for.
    #[must_use]
    pub fn app(&self) -> &str {
        &self.app
    }

    /// The underlying triple store.
    #[must_use]
    pub fn triples(&self) -> &TripleStore {
        &self.triples
    }

    fn docs_path(&self, table: &str) -> String {
        format!("{}{}/docs/", self.tables_path, table)
    }

    // =========================================================================
    // TABLES
    // =========================================================================

    /// Create a new table. The name must be unique for the application;
    /// a duplicate surfaces as [`TrigraphError::DuplicateNode`].
    pub fn create_table(&mut self, table: &str) -> Result<Digest, TrigraphError> {
        let table_path = format!("{}{}/", self.tables_path, table);
        let graph = self.triples.graph_mut();
        let table_id = graph
            .add_node(table_path.clone(), InsertMode::StrictUnique)?
            .digest();
        graph.add_edge(self.tables_id, table_id, InsertMode::Idempotent)?;

        let docs_id = graph
            .add_node(format!("{table_path}docs/"), InsertMode::Idempotent)?
            .digest();
        graph.add_edge(table_id, docs_id, InsertMode::Idempotent)?;
        let meta_id = graph
            .add_node(format!("{table_path}meta/"), InsertMode::Idempotent)?
            .digest();
        graph.add_edge(table_id, meta_id, InsertMode::Idempotent)?;

        Ok(table_id)
    }

    /// The table paths registered in this application.
    #[must_use]
    pub fn list_tables(&self) -> Vec<ScalarValue> {
        let graph = self.triples.graph();
        graph
            .next_nodes(self.tables_id)
            .filter_map(|id| graph.node_value(id).cloned())
            .collect()
    }

    /// The document paths stored in a table.
    #[must_use]
    pub fn list_docs(&self, table: &str) -> Vec<ScalarValue> {
        let graph = self.triples.graph();
        let docs_id = digest_value(&ScalarValue::text(self.docs_path(table)));
        graph
            .next_nodes(docs_id)
            .filter_map(|id| graph.node_value(id).cloned())
            .collect()
    }

    // =========================================================================
    // DOCUMENTS
    // =========================================================================

    /// Insert a new document into a table.
    ///
    /// The UID must be unique in the table; a duplicate surfaces as
    /// [`TrigraphError::DuplicateNode`]. Inserting into a table that was
    /// never created is [`TrigraphError::UnknownEndpoint`]. Returns the
    /// chain key derived from the document's field-triple ids.
    pub fn create_doc(
        &mut self,
        table: &str,
        uid: &str,
        fields: &DocFields,
    ) -> Result<Digest, TrigraphError> {
        let docs_path = self.docs_path(table);
        let doc_path = format!("{docs_path}{uid}/");
        let doc_id = self
            .triples
            .graph_mut()
            .add_node(doc_path.clone(), InsertMode::StrictUnique)?
            .digest();
        let docs_id = digest_value(&ScalarValue::text(docs_path));
        self.triples
            .graph_mut()
            .add_edge(docs_id, doc_id, InsertMode::Idempotent)?;

        let mut chain = Vec::new();
        for (field, values) in fields {
            for value in values {
                chain.push(self.triples.assert_triple(
                    doc_path.as_str(),
                    field.as_str(),
                    value,
                )?);
            }
        }

        let key = digest_keys(&chain);
        self.chains.insert(key, chain);
        Ok(key)
    }

    /// The field-triple ids recorded for a document's chain key.
    #[must_use]
    pub fn doc_chain(&self, key: Digest) -> Option<&[Digest]> {
        self.chains.get(&key).map(Vec::as_slice)
    }

    /// Fetch a document from a table, optionally projected to a set of
    /// field names. An unknown document comes back empty.
    #[must_use]
    pub fn get_doc(
        &self,
        table: &str,
        uid: &str,
        fields: Option<&BTreeSet<String>>,
    ) -> DocFields {
        self.get_doc_by_path(&format!("{}{uid}/", self.docs_path(table)), fields)
    }

    /// Fetch a document by its full path.
    #[must_use]
    pub fn get_doc_by_path(
        &self,
        doc_path: &str,
        fields: Option<&BTreeSet<String>>,
    ) -> DocFields {
        let graph = self.triples.graph();
        let doc_value = ScalarValue::text(doc_path);
        let Some(doc_id) = graph.digest_of(&doc_value) else {
            return DocFields::new();
        };

        let mut doc = DocFields::new();
        for field_id in graph.next_nodes(doc_id) {
            let Some(field_value) = graph.node_value(field_id) else {
                continue;
            };
            let Some(field_name) = field_value.as_text() else {
                continue;
            };
            if fields.is_some_and(|wanted| !wanted.contains(field_name)) {
                continue;
            }
            let values: Vec<ScalarValue> = self
                .triples
                .query_subject_predicate(&doc_value, field_value)
                .cloned()
                .collect();
            doc.insert(field_name.to_string(), values);
        }
        doc
    }

    /// Find all documents in a table matching every (field, value) entry of
    /// the query, optionally projected.
    #[must_use]
    pub fn query_docs(
        &self,
        table: &str,
        query: &BTreeMap<String, ScalarValue>,
        fields: Option<&BTreeSet<String>>,
    ) -> Vec<DocFields> {
        let table_prefix = self.docs_path(table);
        let mut docs = Vec::new();
        for (field, value) in query {
            let field_value = ScalarValue::text(field.clone());
            for subject in self.triples.query_predicate_object(&field_value, value) {
                let Some(doc_path) = subject.as_text() else {
                    continue;
                };
                // Hits from other tables share the field node; drop them.
                if !doc_path.starts_with(&table_prefix) {
                    continue;
                }
                docs.push(self.get_doc_by_path(doc_path, fields));
            }
        }
        docs
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(entries: &[(&str, ScalarValue)]) -> DocFields {
        let mut out = DocFields::new();
        for (field, value) in entries {
            out.entry((*field).to_string())
                .or_default()
                .push(value.clone());
        }
        out
    }

    #[test]
    fn tables_are_unique_per_app() {
        let mut store = DocumentStore::new("Geography").expect("new");
        store.create_table("countries").expect("create");

        let err = store.create_table("countries").expect_err("duplicate");
        assert!(matches!(err, TrigraphError::DuplicateNode(_)));

        let tables = store.list_tables();
        assert_eq!(tables, vec![ScalarValue::text("/Geography/tables/countries/")]);
    }

    #[test]
    fn doc_roundtrip_with_projection() {
        let mut store = DocumentStore::new("Geography").expect("new");
        store.create_table("countries").expect("create");
        store
            .create_doc(
                "countries",
                "RO",
                &fields(&[
                    ("capital", ScalarValue::text("Bucharest")),
                    ("region", ScalarValue::text("Europe")),
                    ("area_size", ScalarValue::Int(238_391)),
                ]),
            )
            .expect("create doc");

        let doc = store.get_doc("countries", "RO", None);
        assert_eq!(doc.len(), 3);
        assert_eq!(
            doc.get("capital"),
            Some(&vec![ScalarValue::text("Bucharest")])
        );

        let wanted: BTreeSet<String> = ["capital".to_string()].into();
        let projected = store.get_doc("countries", "RO", Some(&wanted));
        assert_eq!(projected.len(), 1);
        assert!(projected.contains_key("capital"));
    }

    #[test]
    fn chain_records_one_triple_per_field_value() {
        let mut store = DocumentStore::new("Geography").expect("new");
        store.create_table("countries").expect("create");

        let key = store
            .create_doc(
                "countries",
                "RO",
                &fields(&[
                    ("capital", ScalarValue::text("Bucharest")),
                    ("region", ScalarValue::text("Europe")),
                ]),
            )
            .expect("create doc");

        let chain = store.doc_chain(key).expect("chain");
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn duplicate_doc_uid_is_reported() {
        let mut store = DocumentStore::new("Geography").expect("new");
        store.create_table("countries").expect("create");
        store
            .create_doc("countries", "RO", &fields(&[("region", ScalarValue::text("Europe"))]))
            .expect("create doc");

        let err = store
            .create_doc("countries", "RO", &fields(&[("region", ScalarValue::text("Europe"))]))
            .expect_err("duplicate");
        assert!(matches!(err, TrigraphError::DuplicateNode(_)));
    }

    #[test]
    fn doc_in_missing_table_is_reported() {
        let mut store = DocumentStore::new("Geography").expect("new");
        let err = store
            .create_doc("nowhere", "x", &DocFields::new())
            .expect_err("missing table");
        assert!(matches!(err, TrigraphError::UnknownEndpoint(_)));
    }

    #[test]
    fn multi_valued_fields_fan_out() {
        let mut store = DocumentStore::new("Geography").expect("new");
        store.create_table("countries").expect("create");

        let mut doc = DocFields::new();
        doc.insert(
            "languages".to_string(),
            vec![ScalarValue::text("ron"), ScalarValue::text("hun")],
        );
        store.create_doc("countries", "RO", &doc).expect("create doc");

        let loaded = store.get_doc("countries", "RO", None);
        let languages = loaded.get("languages").expect("languages");
        assert_eq!(languages.len(), 2);
        assert!(languages.contains(&ScalarValue::text("ron")));
        assert!(languages.contains(&ScalarValue::text("hun")));
    }

    #[test]
    fn query_docs_filters_by_table() {
        let mut store = DocumentStore::new("Geography").expect("new");
        store.create_table("countries").expect("create");
        store.create_table("cities").expect("create");
        store
            .create_doc(
                "countries",
                "RO",
                &fields(&[("region", ScalarValue::text("Europe"))]),
            )
            .expect("doc");
        store
            .create_doc(
                "cities",
                "BUH",
                &fields(&[("region", ScalarValue::text("Europe"))]),
            )
            .expect("doc");

        let query: BTreeMap<String, ScalarValue> =
            [("region".to_string(), ScalarValue::text("Europe"))].into();
        let hits = store.query_docs("countries", &query, None);
        assert_eq!(hits.len(), 1);
        assert_eq!(
            hits[0].get("region"),
            Some(&vec![ScalarValue::text("Europe")])
        );

        assert_eq!(store.list_docs("countries").len(), 1);
        assert_eq!(store.list_docs("cities").len(), 1);
    }
}
