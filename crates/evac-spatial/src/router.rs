//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The decision logic calls routing through the [`Router`] trait only, so an
//! application can put a navmesh or visibility-graph planner behind it
//! without touching the core.  [`GraphRouter`] plans over a hand-authored
//! [`NavGraph`] and is what the demo and tests use.
//!
//! # Path shape
//!
//! Every path is an ordered list of points whose **first element is the
//! origin itself** and whose last element is the destination.  Consumers
//! that only care about routing decisions drop the first element.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

use evac_core::Point;

use crate::network::{NavGraph, NavNodeId};
use crate::{SpatialError, SpatialResult};

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable path planner.
///
/// Implementations must be `Send + Sync` so one router can be shared by all
/// agents during a (possibly parallel) re-evaluation pass.
pub trait Router: Send + Sync {
    /// Plan a walkable path from `origin` to `destination`.
    fn shortest_path(&self, origin: Point, destination: Point) -> SpatialResult<Vec<Point>>;
}

/// Lets the motion engine and the decision layer plan over one shared graph.
impl<R: Router + ?Sized> Router for Arc<R> {
    #[inline]
    fn shortest_path(&self, origin: Point, destination: Point) -> SpatialResult<Vec<Point>> {
        (**self).shortest_path(origin, destination)
    }
}

// ── GraphRouter ───────────────────────────────────────────────────────────────

/// Dijkstra over a [`NavGraph`], with both endpoints snapped to their nearest
/// graph node.
///
/// The returned path is `origin`, the node positions along the cheapest
/// corridor sequence, then `destination`.  Consecutive duplicates are
/// collapsed, so an origin sitting exactly on a node appears once.
pub struct GraphRouter {
    graph: NavGraph,
}

impl GraphRouter {
    pub fn new(graph: NavGraph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }
}

impl Router for GraphRouter {
    fn shortest_path(&self, origin: Point, destination: Point) -> SpatialResult<Vec<Point>> {
        if !origin.is_finite() || !destination.is_finite() {
            return Err(SpatialError::InvalidInput(format!(
                "cannot route between {origin} and {destination}"
            )));
        }
        let no_route = || SpatialError::NoRoute { from: origin, to: destination };
        let from = self.graph.snap(origin).ok_or_else(no_route)?;
        let to   = self.graph.snap(destination).ok_or_else(no_route)?;

        let nodes = dijkstra(&self.graph, from, to).ok_or_else(no_route)?;

        let mut path = Vec::with_capacity(nodes.len() + 2);
        path.push(origin);
        for n in nodes {
            push_dedup(&mut path, self.graph.node_pos[n.index()]);
        }
        push_dedup(&mut path, destination);
        Ok(path)
    }
}

fn push_dedup(path: &mut Vec<Point>, p: Point) {
    if path.last() != Some(&p) {
        path.push(p);
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Node sequence from `from` to `to` inclusive, or `None` if unreachable.
fn dijkstra(graph: &NavGraph, from: NavNodeId, to: NavNodeId) -> Option<Vec<NavNodeId>> {
    if from == to {
        return Some(vec![from]);
    }

    let n = graph.node_count();
    let mut dist      = vec![u64::MAX; n];
    let mut prev_edge = vec![usize::MAX; n];
    dist[from.index()] = 0;

    // Secondary key NavNodeId gives deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u64, NavNodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == to {
            return Some(reconstruct(graph, &prev_edge, from, to));
        }
        if cost > dist[node.index()] {
            continue;
        }
        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge];
            let new_cost = cost.saturating_add(graph.edge_length_mm[edge]);
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }
    None
}

fn reconstruct(graph: &NavGraph, prev_edge: &[usize], from: NavNodeId, to: NavNodeId) -> Vec<NavNodeId> {
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        cur = graph.edge_from[e];
        nodes.push(cur);
    }
    nodes.reverse();
    nodes
}
