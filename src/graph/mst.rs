use bitvec::prelude::*;
use tracing::debug;

use super::{
    frontier::{Frontier, IndexedMinHeap},
    EdgeId, Graph, VertexId,
};
use crate::{
    error::{Error, Result},
    kbn_summation,
};

/// Spanning tree grown from a root, stored as the edge each vertex was cheapest reached through.
///
/// Indexed by the dense vertex index of the graph it was computed on.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanningTree {
    root: Option<usize>,
    parent: Vec<Option<EdgeId>>,
    dist: Vec<f64>,
    visited: BitVec<u8, Msb0>,
}

impl SpanningTree {
    fn new(vertex_count: usize) -> Self {
        Self {
            root: None,
            parent: vec![None; vertex_count],
            dist: vec![f64::INFINITY; vertex_count],
            visited: BitVec::repeat(false, vertex_count),
        }
    }

    pub fn root(&self) -> Option<usize> {
        self.root
    }

    /// Edge through which `index` joined the tree, `None` for the root and unreachable vertices.
    pub fn parent(&self, index: usize) -> Option<EdgeId> {
        self.parent[index]
    }

    /// Weight of the parent edge, 0 for the root and infinity when unreachable.
    pub fn dist(&self, index: usize) -> f64 {
        self.dist[index]
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.parent.iter().flatten().copied()
    }

    /// Number of vertices connected to the root, the root included.
    pub fn reached(&self) -> usize {
        self.visited.count_ones()
    }

    pub fn spans_all(&self) -> bool {
        self.visited.all()
    }

    pub fn weight(&self, graph: &Graph) -> f64 {
        kbn_summation! {
            for edge in self.edges() => {
                weight += graph.edge(edge).distance();
            }
        }
        weight
    }
}

/// Prim's algorithm from `start` in O((V + E) log V) time.
///
/// Edges are followed in their stored direction. On an empty graph this is a no-op that
/// returns an empty tree.
///
/// <https://en.wikipedia.org/wiki/Prim%27s_algorithm>
pub fn prim(graph: &Graph, start: VertexId) -> Result<SpanningTree> {
    prim_with(
        graph,
        start,
        IndexedMinHeap::with_capacity(graph.vertex_count()),
    )
}

/// [`prim`] with a caller-provided [`Frontier`].
pub fn prim_with<F: Frontier>(
    graph: &Graph,
    start: VertexId,
    mut frontier: F,
) -> Result<SpanningTree> {
    let mut tree = SpanningTree::new(graph.vertex_count());
    if graph.is_empty() {
        return Ok(tree);
    }
    let root = graph.index_of(start).ok_or(Error::MissingVertex(start))?;
    tree.root = Some(root);
    tree.dist[root] = 0.;
    frontier.insert(root, 0.);

    while let Some(vertex) = frontier.extract_min() {
        tree.visited.set(vertex, true);

        for &edge_id in graph.vertex_at(vertex).adjacency() {
            let edge = graph.edge(edge_id);
            let destination = edge.destination();
            if tree.visited[destination] {
                continue;
            }
            let old_dist = tree.dist[destination];
            if edge.distance() < old_dist {
                tree.dist[destination] = edge.distance();
                tree.parent[destination] = Some(edge_id);
                if old_dist == f64::INFINITY {
                    frontier.insert(destination, edge.distance());
                } else {
                    frontier.decrease_key(destination, edge.distance());
                }
            }
        }
    }

    debug!(
        "Spanning tree from {} reaches {}/{} vertices",
        start,
        tree.reached(),
        graph.vertex_count()
    );
    Ok(tree)
}
