//! # Canonical Graph Generators
//!
//! Fixed graph shapes for testing and demos: line, star, polygon (cycle),
//! complete and ladder graphs. Line and star graphs label their nodes with
//! integers (the star's hub is `0`); the letter-labelled shapes start at
//! `a`. Unsupported sizes are reported as [`TrigraphError::InvalidSize`].

use crate::graph::GraphStore;
use crate::{InsertMode, ScalarValue, TrigraphError};

/// Letter label for a 1-based node index: 1 -> "a", 2 -> "b", ...
fn letter(index: usize) -> ScalarValue {
    ScalarValue::text(char::from_u32(96 + index as u32).unwrap_or('?').to_string())
}

/// Generate a line graph with `size` nodes chained head to tail.
pub fn line_graph(size: usize) -> Result<GraphStore, TrigraphError> {
    if size < 2 {
        return Err(TrigraphError::InvalidSize(size));
    }

    let mut graph = GraphStore::new();
    let mut nodes = Vec::with_capacity(size);
    for i in 1..=size {
        nodes.push(
            graph
                .add_node(i as i64, InsertMode::Idempotent)?
                .digest(),
        );
    }
    for pair in nodes.windows(2) {
        graph.add_edge(pair[0], pair[1], InsertMode::Idempotent)?;
    }

    Ok(graph)
}

/// Generate a star graph with `size` spokes around a hub node.
pub fn star_graph(size: usize) -> Result<GraphStore, TrigraphError> {
    if !(2..=26).contains(&size) {
        return Err(TrigraphError::InvalidSize(size));
    }

    let mut graph = GraphStore::new();
    let hub = graph.add_node(0i64, InsertMode::Idempotent)?.digest();
    for i in 1..=size {
        let spoke = graph.add_node(i as i64, InsertMode::Idempotent)?.digest();
        graph.add_edge(hub, spoke, InsertMode::Idempotent)?;
    }

    Ok(graph)
}

/// Generate a polygon-shaped (cycle) graph: 3 is a triangle, 4 a square,
/// 5 a pentagon, and so on.
pub fn polygon_graph(size: usize) -> Result<GraphStore, TrigraphError> {
    if !(2..=26).contains(&size) {
        return Err(TrigraphError::InvalidSize(size));
    }

    let mut graph = GraphStore::new();
    let mut nodes = Vec::with_capacity(size);
    for i in 1..=size {
        nodes.push(graph.add_node(letter(i), InsertMode::Idempotent)?.digest());
    }
    for i in 0..size {
        let next = nodes[(i + 1) % size];
        graph.add_edge(nodes[i], next, InsertMode::Idempotent)?;
    }

    Ok(graph)
}

/// Generate the complete graph on `size` nodes: an edge in each direction
/// between every ordered pair of distinct nodes.
pub fn complete_graph(size: usize) -> Result<GraphStore, TrigraphError> {
    if size < 2 {
        return Err(TrigraphError::InvalidSize(size));
    }

    let mut graph = GraphStore::new();
    let mut nodes = Vec::with_capacity(size);
    for i in 1..=size {
        nodes.push(graph.add_node(letter(i), InsertMode::Idempotent)?.digest());
    }
    for &head in &nodes {
        for &tail in &nodes {
            if head != tail {
                graph.add_edge(head, tail, InsertMode::Idempotent)?;
            }
        }
    }

    Ok(graph)
}

/// Generate a ladder graph of the given height: two rails of `height`
/// nodes, connected by rungs.
pub fn ladder_graph(height: usize) -> Result<GraphStore, TrigraphError> {
    if height == 0 {
        return Err(TrigraphError::InvalidSize(height));
    }

    let node_count = height * 2;
    let mut graph = GraphStore::new();
    let mut nodes = Vec::with_capacity(node_count);
    for i in 1..=node_count {
        nodes.push(graph.add_node(letter(i), InsertMode::Idempotent)?.digest());
    }
    // Rungs between the rails.
    for i in 0..node_count {
        if i % 2 == 1 {
            graph.add_edge(nodes[i - 1], nodes[i], InsertMode::Idempotent)?;
        }
    }
    // Rails.
    for i in 0..node_count.saturating_sub(2) {
        graph.add_edge(nodes[i], nodes[i + 2], InsertMode::Idempotent)?;
    }

    Ok(graph)
}

// =============================================================================
// TESTS
// =============================================================================
