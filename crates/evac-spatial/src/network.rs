//! Walkable navigation graph and builder.
//!
//! # Data layout
//!
//! Nodes are corridor junctions and room centres in planar metres; edges are
//! straight walkable corridors between them.  Outgoing edges use
//! **Compressed Sparse Row (CSR)** format: the edges leaving node `n`
//! occupy ids `node_out_start[n] .. node_out_start[n + 1]`, so Dijkstra's
//! inner loop is a contiguous scan.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps a free-space position to the nearest graph
//! node.  The router uses it to attach an agent's current position and the
//! exit centroid to the graph.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use evac_core::Point;

/// Index of a navigation-graph node.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NavNodeId(pub u32);

impl NavNodeId {
    pub const INVALID: NavNodeId = NavNodeId(u32::MAX);

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id:    NavNodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── NavGraph ──────────────────────────────────────────────────────────────────

/// Directed corridor graph in CSR format plus a spatial index for snapping.
///
/// Do not construct directly; use [`NavGraphBuilder`].
pub struct NavGraph {
    /// Position of each node.  Indexed by `NavNodeId`.
    pub node_pos: Vec<Point>,

    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Source node of each edge (needed for path reconstruction).
    pub edge_from: Vec<NavNodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NavNodeId>,

    /// Walking length of each edge in millimetres.  Integer so the Dijkstra
    /// heap has a total order.
    pub edge_length_mm: Vec<u64>,

    spatial_idx: RTree<NodeEntry>,
}

impl NavGraph {
    /// A graph with no nodes; every routing request against it fails.
    pub fn empty() -> Self {
        NavGraphBuilder::new().build()
    }

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// Iterator over the edge indices leaving `node`.
    #[inline]
    pub fn out_edges(&self, node: NavNodeId) -> impl Iterator<Item = usize> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        start..end
    }

    /// Nearest graph node to `pos`.  `None` only for an empty graph.
    pub fn snap(&self, pos: Point) -> Option<NavNodeId> {
        self.spatial_idx
            .nearest_neighbor(&pos.to_array())
            .map(|e| e.id)
    }
}

// ── NavGraphBuilder ───────────────────────────────────────────────────────────

/// Construct a [`NavGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use evac_core::Point;
/// use evac_spatial::NavGraphBuilder;
///
/// let mut b = NavGraphBuilder::new();
/// let hall = b.add_node(Point::new(10.0, 6.5));
/// let door = b.add_node(Point::new(25.5, 16.5));
/// b.add_corridor(hall, door);
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // both directions
/// ```
pub struct NavGraphBuilder {
    nodes:     Vec<Point>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:      NavNodeId,
    to:        NavNodeId,
    length_mm: u64,
}

impl NavGraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_edges: Vec::new() }
    }

    /// Add a node and return its id (sequential from 0).
    pub fn add_node(&mut self, pos: Point) -> NavNodeId {
        let id = NavNodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** edge whose length is the straight-line distance.
    pub fn add_directed_edge(&mut self, from: NavNodeId, to: NavNodeId) {
        let length_m = self.nodes[from.index()].distance(self.nodes[to.index()]);
        self.raw_edges.push(RawEdge {
            from,
            to,
            length_mm: (length_m * 1000.0).round() as u64,
        });
    }

    /// Convenience: a two-way corridor between `a` and `b`.
    pub fn add_corridor(&mut self, a: NavNodeId, b: NavNodeId) {
        self.add_directed_edge(a, b);
        self.add_directed_edge(b, a);
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }

    /// Consume the builder and produce a [`NavGraph`].
    pub fn build(self) -> NavGraph {
        let node_count = self.nodes.len();

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:      Vec<NavNodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:        Vec<NavNodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length_mm: Vec<u64>       = raw.iter().map(|e| e.length_mm).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry { point: pos.to_array(), id: NavNodeId(i as u32) })
            .collect();

        NavGraph {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_mm,
            spatial_idx: RTree::bulk_load(entries),
        }
    }
}

impl Default for NavGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
