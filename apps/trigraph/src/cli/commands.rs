//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands. All
//! file I/O for the core's codecs lives here.

use std::path::{Path, PathBuf};

use trigraph_core::{
    GraphStore, ScalarValue, TripleDump, TripleStore, TrigraphError, ValueMatch, complete_graph,
    dump_checksum, dump_from_bytes, dump_from_cbor, dump_to_bytes, dump_to_cbor, graph_from_csv,
    graph_to_csv, ladder_graph, line_graph, persist_dump, polygon_graph, restore_dump,
    star_graph, storage::RedbStore,
};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for import (500 MB).
///
/// This prevents memory exhaustion from malicious or accidental large
/// files, before any of the file is read.
const MAX_IMPORT_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), TrigraphError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| TrigraphError::Io(format!("cannot read file metadata: {e}")))?;

    if metadata.len() > max_size {
        return Err(TrigraphError::Io(format!(
            "file size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

// =============================================================================
// DATABASE ACCESS
// =============================================================================

fn load_dump(db_path: &Path) -> Result<TripleDump, TrigraphError> {
    let store = RedbStore::open(db_path)?;
    restore_dump(&store)
}

fn load_store(db_path: &Path) -> Result<TripleStore, TrigraphError> {
    Ok(TripleStore::from_dump(load_dump(db_path)?))
}

fn save_dump(db_path: &Path, dump: &TripleDump) -> Result<(), TrigraphError> {
    let mut store = RedbStore::open(db_path)?;
    persist_dump(&mut store, dump)
}

// =============================================================================
// VALUE RENDERING
// =============================================================================

fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write as _;
    bytes.iter().fold(String::new(), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    })
}

fn display_scalar(value: &ScalarValue) -> String {
    match value {
        ScalarValue::Null => "null".to_string(),
        ScalarValue::Text(s) => s.clone(),
        ScalarValue::Bytes(b) => format!("0x{}", hex(b)),
        ScalarValue::Int(n) => format!("{n}"),
        ScalarValue::Float(x) => format!("{x:?}"),
    }
}

fn scalar_to_json(value: &ScalarValue) -> serde_json::Value {
    match value {
        ScalarValue::Null => serde_json::Value::Null,
        ScalarValue::Text(s) => serde_json::Value::String(s.clone()),
        ScalarValue::Bytes(b) => serde_json::Value::String(format!("0x{}", hex(b))),
        ScalarValue::Int(n) => serde_json::Value::from(*n),
        ScalarValue::Float(x) => serde_json::Number::from_f64(*x)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
    }
}

/// Build the optional value filter from the `--match` / `--where` pair.
fn build_filter(match_part: Option<&str>, where_mode: &str) -> Option<ValueMatch> {
    let part = match_part?.to_string();
    Some(match where_mode {
        "prefix" | "<" => ValueMatch::Prefix(part),
        "suffix" | ">" => ValueMatch::Suffix(part),
        "exact" | "=" => ValueMatch::Exact(part),
        _ => ValueMatch::Contains(part),
    })
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show database status.
pub fn cmd_status(db_path: &Path, json_mode: bool) -> Result<(), TrigraphError> {
    let store = load_store(db_path)?;
    let graph = store.graph();

    if json_mode {
        let output = serde_json::json!({
            "database": db_path.to_string_lossy(),
            "node_count": graph.node_count(),
            "edge_count": graph.edge_count(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Trigraph Database Status");
    println!("========================");
    println!("Database: {}", db_path.display());
    println!();
    println!("Nodes: {}", graph.node_count());
    println!("Edges: {}", graph.edge_count());

    Ok(())
}

// =============================================================================
// ASSERT COMMAND
// =============================================================================

/// Assert a (subject, predicate, object) triple and persist it.
pub fn cmd_assert(
    db_path: &Path,
    subject: &str,
    predicate: &str,
    object: &str,
) -> Result<(), TrigraphError> {
    let mut store = load_store(db_path)?;
    let id = store.assert_triple(subject, predicate, object)?;
    save_dump(db_path, &store.to_dump())?;

    tracing::info!("asserted triple {}", id);
    println!("{subject} -> {predicate} -> {object}");
    println!("assertion id: {id}");
    Ok(())
}

// =============================================================================
// QUERY COMMAND
// =============================================================================

/// Query the triple layer.
pub fn cmd_query(
    db_path: &Path,
    json_mode: bool,
    predicate: &str,
    subject: Option<&str>,
    object: Option<&str>,
    match_part: Option<&str>,
    where_mode: &str,
) -> Result<(), TrigraphError> {
    let store = load_store(db_path)?;
    let filter = build_filter(match_part, where_mode);

    let mut hits: Vec<(String, ScalarValue)> = Vec::new();
    match (subject, object) {
        // Fully concrete: does the triple exist?
        (Some(s), Some(o)) => {
            let found = store.query_triple(
                Some(&ScalarValue::text(s)),
                Some(&ScalarValue::text(predicate)),
                Some(&ScalarValue::text(o)),
            )?;
            for (_, _, value) in found {
                hits.push(("triple".to_string(), value));
            }
        }
        // Concrete subject: the objects related to it.
        (Some(s), None) => {
            hits.extend(
                store
                    .query_subject_predicate(s, predicate)
                    .filter(|value| ValueMatch::accepts(filter.as_ref(), *value))
                    .cloned()
                    .map(|value| ("object".to_string(), value)),
            );
        }
        // Concrete object: the subjects relating to it.
        (None, Some(o)) => {
            hits.extend(
                store
                    .query_predicate_object(predicate, o)
                    .filter(|value| ValueMatch::accepts(filter.as_ref(), *value))
                    .cloned()
                    .map(|value| ("subject".to_string(), value)),
            );
        }
        // Predicate only: everything related to it, both directions.
        (None, None) => {
            if let Some(subjects) = store.query_subjects(predicate, filter.as_ref()) {
                hits.extend(subjects.cloned().map(|value| ("subject".to_string(), value)));
            }
            if let Some(objects) = store.query_objects(predicate, filter.as_ref()) {
                hits.extend(objects.cloned().map(|value| ("object".to_string(), value)));
            }
        }
    }

    if json_mode {
        let output: Vec<serde_json::Value> = hits
            .iter()
            .map(|(role, value)| {
                serde_json::json!({
                    "role": role,
                    "value": scalar_to_json(value),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    if hits.is_empty() {
        println!("no results");
        return Ok(());
    }
    for (role, value) in &hits {
        println!("{role}: {}", display_scalar(value));
    }
    println!();
    println!("{} result(s)", hits.len());
    Ok(())
}

// =============================================================================
// GEN COMMAND
// =============================================================================

/// Generate a canonical graph shape into the database.
pub fn cmd_gen(db_path: &Path, shape: &str, size: usize) -> Result<(), TrigraphError> {
    let graph: GraphStore = match shape {
        "line" => line_graph(size)?,
        "star" => star_graph(size)?,
        "polygon" => polygon_graph(size)?,
        "complete" => complete_graph(size)?,
        "ladder" => ladder_graph(size)?,
        other => {
            return Err(TrigraphError::Io(format!(
                "unknown shape {other:?} (expected line, star, polygon, complete or ladder)"
            )));
        }
    };

    let dump = TripleDump {
        graph: graph.to_dump(),
        ..TripleDump::default()
    };
    save_dump(db_path, &dump)?;

    tracing::info!(shape, size, "generated shape");
    println!(
        "generated {shape}({size}): {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(())
}

// =============================================================================
// EXPORT / IMPORT COMMANDS
// =============================================================================

/// Paths for the two-file CSV codec, derived from the requested file name.
fn csv_paths(file: &Path) -> (PathBuf, PathBuf) {
    let stem = file.file_stem().and_then(|s| s.to_str()).unwrap_or("graph");
    let parent = file.parent().unwrap_or(Path::new("."));
    (
        parent.join(format!("{stem}_nodes.csv")),
        parent.join(format!("{stem}_edges.csv")),
    )
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), TrigraphError> {
    std::fs::write(path, bytes)
        .map_err(|e| TrigraphError::Io(format!("cannot write {}: {e}", path.display())))
}

fn read_file(path: &Path) -> Result<Vec<u8>, TrigraphError> {
    validate_file_size(path, MAX_IMPORT_FILE_SIZE)?;
    std::fs::read(path)
        .map_err(|e| TrigraphError::Io(format!("cannot read {}: {e}", path.display())))
}

/// Export the database to a file.
pub fn cmd_export(db_path: &Path, file: &Path, format: &str) -> Result<(), TrigraphError> {
    let dump = load_dump(db_path)?;

    match format {
        "bin" => write_file(file, &dump_to_bytes(&dump)?)?,
        "cbor" => write_file(file, &dump_to_cbor(&dump)?)?,
        // CSV carries the graph only; the auxiliary triple maps have no
        // delimited-text rendering.
        "csv" => {
            let graph = GraphStore::from_dump(dump.graph.clone());
            let (nodes_csv, edges_csv) = graph_to_csv(&graph);
            let (nodes_path, edges_path) = csv_paths(file);
            write_file(&nodes_path, nodes_csv.as_bytes())?;
            write_file(&edges_path, edges_csv.as_bytes())?;
            println!(
                "exported {} and {}",
                nodes_path.display(),
                edges_path.display()
            );
            return Ok(());
        }
        other => {
            return Err(TrigraphError::Io(format!(
                "unknown format {other:?} (expected bin, cbor or csv)"
            )));
        }
    }

    println!("exported {}", file.display());
    Ok(())
}

/// Import a file into the database.
pub fn cmd_import(db_path: &Path, file: &Path, format: &str) -> Result<(), TrigraphError> {
    let dump = match format {
        "bin" => dump_from_bytes(&read_file(file)?)?,
        "cbor" => dump_from_cbor(&read_file(file)?)?,
        "csv" => {
            let (nodes_path, edges_path) = csv_paths(file);
            let nodes_csv = String::from_utf8(read_file(&nodes_path)?)
                .map_err(|e| TrigraphError::Deserialization(e.to_string()))?;
            let edges_csv = String::from_utf8(read_file(&edges_path)?)
                .map_err(|e| TrigraphError::Deserialization(e.to_string()))?;
            let graph = graph_from_csv(&nodes_csv, &edges_csv)?;
            TripleDump {
                graph: graph.to_dump(),
                ..TripleDump::default()
            }
        }
        other => {
            return Err(TrigraphError::Io(format!(
                "unknown format {other:?} (expected bin, cbor or csv)"
            )));
        }
    };

    save_dump(db_path, &dump)?;

    tracing::info!(
        nodes = dump.graph.nodes.len(),
        edges = dump.graph.edges.len(),
        "imported dump"
    );
    println!(
        "imported {} nodes, {} edges into {}",
        dump.graph.nodes.len(),
        dump.graph.edges.len(),
        db_path.display()
    );
    Ok(())
}

// =============================================================================
// HASH COMMAND
// =============================================================================

/// Compute the BLAKE3 content fingerprint of the database.
pub fn cmd_hash(db_path: &Path, json_mode: bool) -> Result<(), TrigraphError> {
    let dump = load_dump(db_path)?;
    let checksum = dump_checksum(&dump)?;

    if json_mode {
        let output = serde_json::json!({
            "database": db_path.to_string_lossy(),
            "blake3": checksum,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("BLAKE3: {checksum}");
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
