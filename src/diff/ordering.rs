//! Creation order for new tables: principals before the tables whose
//! foreign keys point at them, declaration order otherwise.

use crate::catalog::Table;
use petgraph::Direction;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::debug;

/// Positions of `tables` in creation order. Among tables that are ready at
/// the same time the earlier declared one goes first. Reference cycles
/// fall back to declaration order; foreign keys are added after all
/// creates anyway.
pub fn principal_first(tables: &[&Table]) -> Vec<usize> {
    let mut graph: DiGraph<usize, ()> = DiGraph::new();
    let nodes: Vec<NodeIndex> = (0..tables.len()).map(|i| graph.add_node(i)).collect();

    for (i, table) in tables.iter().enumerate() {
        for fk in &table.foreign_keys {
            if let Some(j) = tables.iter().position(|t| t.name == fk.principal_table)
                && j != i
            {
                graph.update_edge(nodes[j], nodes[i], ());
            }
        }
    }

    if is_cyclic_directed(&graph) {
        debug!("Foreign keys between new tables form a cycle, keeping declaration order");
        return (0..tables.len()).collect();
    }

    let mut in_degree: Vec<usize> = nodes
        .iter()
        .map(|&n| graph.neighbors_directed(n, Direction::Incoming).count())
        .collect();
    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(i, _)| Reverse(i))
        .collect();

    let mut order = Vec::with_capacity(tables.len());
    while let Some(Reverse(i)) = ready.pop() {
        order.push(i);
        for next in graph.neighbors_directed(nodes[i], Direction::Outgoing) {
            let j = graph[next];
            in_degree[j] -= 1;
            if in_degree[j] == 0 {
                ready.push(Reverse(j));
            }
        }
    }
    order
}
