//! # Scenario Tests
//!
//! End-to-end exercises of the engine: kinship triples, country lookups
//! with match filters, generated shapes, the document layer, and the
//! persistence paths through codecs and key-value stores.

use std::collections::{BTreeMap, BTreeSet};

use trigraph_core::{
    DocFields, DocumentStore, GraphStore, InsertMode, KvStore, MemoryStore, RedbStore,
    ScalarValue, TripleStore, TrigraphError, ValueMatch, dump_from_bytes, dump_from_cbor,
    dump_to_bytes, dump_to_cbor, graph_from_csv, graph_to_csv, persist_dump, polygon_graph,
    restore_dump, star_graph, store_checksum,
};

/// Twenty-six countries, one per letter: (cca2, official name).
const COUNTRIES: [(&str, &str); 26] = [
    ("AR", "Argentina"),
    ("BR", "Brazil"),
    ("CA", "Canada"),
    ("DK", "Denmark"),
    ("EE", "Estonia"),
    ("FI", "Finland"),
    ("GR", "Greece"),
    ("HU", "Hungary"),
    ("IS", "Iceland"),
    ("JP", "Japan"),
    ("KE", "Kenya"),
    ("LV", "Latvia"),
    ("MX", "Mexico"),
    ("NO", "Norway"),
    ("OM", "Oman"),
    ("PE", "Peru"),
    ("QA", "Qatar"),
    ("RO", "Romania"),
    ("SE", "Sweden"),
    ("TH", "Thailand"),
    ("UG", "Uganda"),
    ("UA", "Ukraine"),
    ("UY", "Uruguay"),
    ("VN", "Vietnam"),
    ("YE", "Yemen"),
    ("ZM", "Zambia"),
];

fn country_store() -> TripleStore {
    let mut store = TripleStore::new();
    for (cca2, name) in COUNTRIES {
        store
            .assert_triple(cca2, "official_name", name)
            .expect("assert");
    }
    store
}

fn text_set<'a>(values: impl IntoIterator<Item = &'a str>) -> BTreeSet<ScalarValue> {
    values.into_iter().map(ScalarValue::from).collect()
}

// =============================================================================
// TRIPLE SCENARIOS
// =============================================================================

#[test]
fn kinship_queries() {
    let mut g = TripleStore::new();

    g.assert_triple("mom", "loves", "dad").expect("assert");
    g.assert_triple("dad", "loves", "mom").expect("assert");
    g.assert_triple("mom", "loves", "girl").expect("assert");
    g.assert_triple("dad", "loves", "boy").expect("assert");
    g.assert_triple("mom", "loves", "lazy cat").expect("assert");

    g.assert_triple("girl", "needs", "mom").expect("assert");
    g.assert_triple("girl", "needs", "dad").expect("assert");
    g.assert_triple("boy", "needs", "mom").expect("assert");
    g.assert_triple("boy", "needs", "dad").expect("assert");
    g.assert_triple("lazy cat", "needs", "mom").expect("assert");

    // Who needs something / who is needed.
    let needy: BTreeSet<ScalarValue> = g
        .query_subjects("needs", None)
        .expect("known predicate")
        .cloned()
        .collect();
    assert_eq!(needy, text_set(["boy", "girl", "lazy cat"]));
    let needed: BTreeSet<ScalarValue> = g
        .query_objects("needs", None)
        .expect("known predicate")
        .cloned()
        .collect();
    assert_eq!(needed, text_set(["dad", "mom"]));

    // Who loves someone / who is loved.
    let lovers: BTreeSet<ScalarValue> = g
        .query_subjects("loves", None)
        .expect("known predicate")
        .cloned()
        .collect();
    assert_eq!(lovers, text_set(["dad", "mom"]));
    let loved: BTreeSet<ScalarValue> = g
        .query_objects("loves", None)
        .expect("known predicate")
        .cloned()
        .collect();
    assert_eq!(loved, text_set(["boy", "dad", "girl", "lazy cat", "mom"]));

    // Who needs mom; girl needs what == boy needs what.
    let needs_mom: BTreeSet<ScalarValue> =
        g.query_predicate_object("needs", "mom").cloned().collect();
    assert_eq!(needs_mom, text_set(["boy", "girl", "lazy cat"]));
    let girl_needs: BTreeSet<ScalarValue> =
        g.query_subject_predicate("girl", "needs").cloned().collect();
    let boy_needs: BTreeSet<ScalarValue> =
        g.query_subject_predicate("boy", "needs").cloned().collect();
    assert_eq!(girl_needs, boy_needs);

    // Wildcard patterns.
    let loves = ScalarValue::text("loves");
    let mom = ScalarValue::text("mom");
    let hits = g
        .query_triple(None, Some(&loves), Some(&mom))
        .expect("query");
    let subjects: BTreeSet<ScalarValue> = hits.into_iter().map(|(s, _, _)| s).collect();
    assert_eq!(subjects, text_set(["dad"]));

    let hits = g
        .query_triple(Some(&mom), Some(&loves), None)
        .expect("query");
    let objects: BTreeSet<ScalarValue> = hits.into_iter().map(|(_, _, o)| o).collect();
    assert_eq!(objects, text_set(["dad", "girl", "lazy cat"]));

    // The all-wildcard pattern is malformed.
    assert!(matches!(
        g.query_triple(None, None, None),
        Err(TrigraphError::UnboundPattern)
    ));
}

#[test]
fn country_filters() {
    let store = country_store();

    // All 26 names come back.
    let names: BTreeSet<ScalarValue> = store
        .query_objects("official_name", None)
        .expect("known predicate")
        .cloned()
        .collect();
    assert_eq!(names.len(), COUNTRIES.len());

    // Prefix: exactly the countries starting with "U".
    let filter = ValueMatch::Prefix("U".to_string());
    let u_names: BTreeSet<ScalarValue> = store
        .query_objects("official_name", Some(&filter))
        .expect("known predicate")
        .cloned()
        .collect();
    assert_eq!(u_names, text_set(["Uganda", "Ukraine", "Uruguay"]));

    // Suffix: names ending in "a".
    let filter = ValueMatch::Suffix("a".to_string());
    let a_names: BTreeSet<ScalarValue> = store
        .query_objects("official_name", Some(&filter))
        .expect("known predicate")
        .cloned()
        .collect();
    let expected: BTreeSet<ScalarValue> = COUNTRIES
        .iter()
        .filter(|(_, name)| name.ends_with('a'))
        .map(|(_, name)| ScalarValue::text(*name))
        .collect();
    assert_eq!(a_names, expected);
    assert!(a_names.contains(&ScalarValue::text("Argentina")));

    // Contains and exact.
    let filter = ValueMatch::Contains("land".to_string());
    let land_names: BTreeSet<ScalarValue> = store
        .query_objects("official_name", Some(&filter))
        .expect("known predicate")
        .cloned()
        .collect();
    assert_eq!(land_names, text_set(["Finland", "Iceland", "Thailand"]));

    let filter = ValueMatch::Exact("Romania".to_string());
    let exact: Vec<ScalarValue> = store
        .query_objects("official_name", Some(&filter))
        .expect("known predicate")
        .cloned()
        .collect();
    assert_eq!(exact, vec![ScalarValue::text("Romania")]);

    // The subject side answers "which code names Romania".
    let codes: BTreeSet<ScalarValue> = store
        .query_predicate_object("official_name", "Romania")
        .cloned()
        .collect();
    assert_eq!(codes, text_set(["RO"]));
}

// =============================================================================
// SHAPES
// =============================================================================

#[test]
fn generated_shapes_have_consistent_adjacency() {
    let star = star_graph(8).expect("star");
    let hub = star.digest_of(&ScalarValue::Int(0)).expect("hub");
    assert_eq!(star.out_degree(hub), 8);
    assert_eq!(star.next_nodes(hub).count(), 8);
    for spoke in star.next_nodes(hub).collect::<Vec<_>>() {
        assert_eq!(star.inc_degree(spoke), 1);
        assert_eq!(star.prev_nodes(spoke).collect::<Vec<_>>(), vec![hub]);
    }

    let triangle = polygon_graph(3).expect("triangle");
    assert_eq!(triangle.node_count(), 3);
    assert_eq!(triangle.edge_count(), 3);
    for node in triangle.node_digests().collect::<Vec<_>>() {
        assert_eq!(triangle.out_degree(node), 1);
        assert_eq!(triangle.inc_degree(node), 1);
    }
}

#[test]
fn shapes_survive_csv_roundtrip() {
    let graph = star_graph(5).expect("star");
    let (nodes_csv, edges_csv) = graph_to_csv(&graph);
    let restored = graph_from_csv(&nodes_csv, &edges_csv).expect("import");
    assert_eq!(restored, graph);
}

// =============================================================================
// DOCUMENT LAYER
// =============================================================================

fn country_doc(name: &str, region: &str, area: i64) -> DocFields {
    let mut doc = DocFields::new();
    doc.insert(
        "official_name".to_string(),
        vec![ScalarValue::text(name)],
    );
    doc.insert("region".to_string(), vec![ScalarValue::text(region)]);
    doc.insert("area_size".to_string(), vec![ScalarValue::Int(area)]);
    doc
}

#[test]
fn document_layer_over_triples() {
    let mut store = DocumentStore::new("Geography").expect("new");
    store.create_table("countries").expect("create table");

    store
        .create_doc("countries", "RO", &country_doc("Romania", "Europe", 238_391))
        .expect("doc");
    store
        .create_doc("countries", "HU", &country_doc("Hungary", "Europe", 93_028))
        .expect("doc");
    store
        .create_doc("countries", "KE", &country_doc("Kenya", "Africa", 580_367))
        .expect("doc");

    assert_eq!(store.list_docs("countries").len(), 3);

    // Fetch with projection.
    let wanted: BTreeSet<String> = ["official_name".to_string()].into();
    let doc = store.get_doc("countries", "RO", Some(&wanted));
    assert_eq!(
        doc.get("official_name"),
        Some(&vec![ScalarValue::text("Romania")])
    );
    assert!(!doc.contains_key("region"));

    // Query by field value.
    let query: BTreeMap<String, ScalarValue> =
        [("region".to_string(), ScalarValue::text("Europe"))].into();
    let hits = store.query_docs("countries", &query, None);
    assert_eq!(hits.len(), 2);

    // The underlying triple layer sees the same data.
    let regions: BTreeSet<ScalarValue> = store
        .triples()
        .query_objects("region", None)
        .expect("known predicate")
        .cloned()
        .collect();
    assert_eq!(regions, text_set(["Europe", "Africa"]));
}

// =============================================================================
// PERSISTENCE PATHS
// =============================================================================

#[test]
fn binary_and_cbor_roundtrips_agree() {
    let store = country_store();
    let dump = store.to_dump();

    let from_binary = dump_from_bytes(&dump_to_bytes(&dump).expect("bin")).expect("bin back");
    let from_cbor = dump_from_cbor(&dump_to_cbor(&dump).expect("cbor")).expect("cbor back");

    assert_eq!(from_binary, dump);
    assert_eq!(from_cbor, dump);

    // Restored stores answer queries identically.
    let restored = TripleStore::from_dump(from_binary);
    let filter = ValueMatch::Prefix("U".to_string());
    let u_names: BTreeSet<ScalarValue> = restored
        .query_objects("official_name", Some(&filter))
        .expect("known predicate")
        .cloned()
        .collect();
    assert_eq!(u_names, text_set(["Uganda", "Ukraine", "Uruguay"]));
}

#[test]
fn kv_stores_are_interchangeable() {
    let store = country_store();
    let dump = store.to_dump();
    let checksum = store_checksum(&store).expect("checksum");

    // Through the in-memory adapter.
    let mut memory = MemoryStore::new();
    persist_dump(&mut memory, &dump).expect("persist");
    let from_memory = restore_dump(&memory).expect("restore");
    assert_eq!(from_memory, dump);

    // Through the redb adapter, across a reopen.
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("countries.redb");
    {
        let mut redb = RedbStore::open(&path).expect("open");
        persist_dump(&mut redb, &dump).expect("persist");
    }
    let redb = RedbStore::open(&path).expect("reopen");
    assert_eq!(redb.len().expect("len"), memory.len().expect("len"));
    let from_redb = restore_dump(&redb).expect("restore");
    assert_eq!(from_redb, dump);

    // Content fingerprint survives every path.
    let restored = TripleStore::from_dump(from_redb);
    assert_eq!(store_checksum(&restored).expect("checksum"), checksum);
}

#[test]
fn mixed_graph_and_triple_content_roundtrips() {
    let mut store = TripleStore::new();
    store.assert_triple("RO", "capital", "Bucharest").expect("assert");
    store
        .assert_triple("RO", "latitude", 45.94_f64)
        .expect("assert");
    store
        .assert_triple("RO", "cioc", ScalarValue::Null)
        .expect("assert");

    // Plain graph content alongside the triples.
    let a = store
        .graph_mut()
        .add_node(ScalarValue::bytes(vec![1, 2, 3]), InsertMode::Idempotent)
        .expect("add")
        .digest();
    let b = store
        .graph_mut()
        .add_node(7i64, InsertMode::Idempotent)
        .expect("add")
        .digest();
    store.graph_mut().add_bi_edge(a, b).expect("bi edge");

    let dump = store.to_dump();
    let restored = TripleStore::from_dump(dump.clone());
    assert_eq!(restored, store);
    assert!(restored.graph().contains_edge(a, b));
    assert!(restored.graph().contains_edge(b, a));

    let bytes = dump_to_bytes(&dump).expect("serialize");
    assert_eq!(dump_from_bytes(&bytes).expect("deserialize"), dump);
}

// =============================================================================
// GRAPH SCENARIOS
// =============================================================================

#[test]
fn manual_triangle() {
    let mut graph = GraphStore::new();
    let a = graph
        .add_node("a", InsertMode::Idempotent)
        .expect("add")
        .digest();
    let b = graph
        .add_node("b", InsertMode::Idempotent)
        .expect("add")
        .digest();
    let c = graph
        .add_node("c", InsertMode::Idempotent)
        .expect("add")
        .digest();
    graph.add_edge(a, b, InsertMode::Idempotent).expect("a->b");
    graph.add_edge(b, c, InsertMode::Idempotent).expect("b->c");
    graph.add_edge(c, a, InsertMode::Idempotent).expect("c->a");

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 3);
    assert_eq!(graph.out_degree(a), 1);
    assert_eq!(graph.inc_degree(a), 1);

    // The same content creates the same triangle: digests are stable.
    let again = polygon_graph(3).expect("triangle");
    assert_eq!(again.digest_of(&ScalarValue::text("a")), Some(a));
}
