use std::{fmt, time::Instant};

use bitvec::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use super::{mst, Graph, VertexId};
use crate::{
    error::{Error, Result},
    kbn_summation,
};

/// Every tour starts and ends here
pub const ORIGIN: VertexId = 0;

/// Closed walk through the graph, starting and ending at [`ORIGIN`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tour {
    pub path: Vec<VertexId>,
    pub cost: f64,
}

impl Tour {
    /// The tour of a graph whose only vertex is the origin
    fn trivial() -> Self {
        Self {
            path: vec![ORIGIN, ORIGIN],
            cost: 0.,
        }
    }

    fn from_indices(graph: &Graph, indices: &[usize], cost: f64) -> Self {
        Self {
            path: indices
                .iter()
                .map(|index| graph.vertex_at(*index).id())
                .collect(),
            cost,
        }
    }

    /// Number of legs travelled
    pub fn len(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.path.first() == Some(&ORIGIN) && self.path.last() == Some(&ORIGIN)
    }

    /// Whether the tour is a Hamiltonian cycle of `graph`: closed at the origin and
    /// visiting every other vertex exactly once.
    pub fn visits_every_vertex(&self, graph: &Graph) -> bool {
        if !self.is_closed() || self.path.len() != graph.vertex_count() + 1 {
            return false;
        }
        let mut seen = BitVec::<u8, Msb0>::repeat(false, graph.vertex_count());
        for id in &self.path[..self.path.len() - 1] {
            match graph.index_of(*id) {
                Some(index) if !seen[index] => seen.set(index, true),
                _ => return false,
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Exact branch-and-bound search
    Backtracking,
    /// Preorder walk of the minimum spanning tree, at most twice the optimum on metric graphs
    Triangular,
    /// Greedily hop to the closest unvisited vertex
    NearestNeighbour,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::Backtracking,
        Algorithm::Triangular,
        Algorithm::NearestNeighbour,
    ];

    pub fn solve(self, graph: &Graph) -> Result<Tour> {
        match self {
            Algorithm::Backtracking => backtracking(graph),
            Algorithm::Triangular => triangular_approximation(graph),
            Algorithm::NearestNeighbour => nearest_neighbour(graph),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Backtracking => "backtracking",
            Algorithm::Triangular => "triangular",
            Algorithm::NearestNeighbour => "nearest-neighbour",
        })
    }
}

fn origin_index(graph: &Graph) -> Result<usize> {
    graph.index_of(ORIGIN).ok_or(Error::MissingOrigin)
}

/// Sum of the distances between consecutive vertices of `path`.
fn path_cost(graph: &Graph, path: &[usize]) -> Result<f64> {
    kbn_summation! {
        for leg in path.windows(2) => {
            cost += graph.distance(leg[0], leg[1])?;
        }
    }
    Ok(cost)
}

/// Exact TSP by depth-first branch and bound over direct edges.
///
/// A branch is cut as soon as its partial cost reaches the best complete tour found so
/// far. A branch that visits every vertex but has no edge back to the origin is dropped
/// and the search carries on. Worst case is O(V!).
pub fn backtracking(graph: &Graph) -> Result<Tour> {
    let origin = origin_index(graph)?;
    if graph.vertex_count() == 1 {
        return Ok(Tour::trivial());
    }
    debug!("Backtracking over {} vertices", graph.vertex_count());
    let start = Instant::now();

    let mut search = BranchAndBound::new(graph, origin);
    search.explore(origin, 0., 1);

    debug!(
        "Expanded {} nodes, pruned {} branches, {} dead ends",
        search.expanded, search.pruned, search.unclosable
    );
    let mut best_path = search.best_path.ok_or(Error::NoTour)?;
    best_path.push(origin);

    let tour = Tour::from_indices(graph, &best_path, search.best_sum);
    info!(
        "Backtracking tour of {} legs, cost {} in {:?}",
        tour.len(),
        tour.cost,
        start.elapsed()
    );
    Ok(tour)
}

/// Search state for [`backtracking`], indexed by dense vertex index.
struct BranchAndBound<'a> {
    graph: &'a Graph,
    origin: usize,
    visited: BitVec<u8, Msb0>,
    path: Vec<usize>,
    best_sum: f64,
    best_path: Option<Vec<usize>>,
    expanded: usize,
    pruned: usize,
    unclosable: usize,
}

impl<'a> BranchAndBound<'a> {
    fn new(graph: &'a Graph, origin: usize) -> Self {
        let mut visited = BitVec::repeat(false, graph.vertex_count());
        visited.set(origin, true);
        let mut path = Vec::with_capacity(graph.vertex_count() + 1);
        path.push(origin);
        Self {
            graph,
            origin,
            visited,
            path,
            best_sum: f64::INFINITY,
            best_path: None,
            expanded: 0,
            pruned: 0,
            unclosable: 0,
        }
    }

    /// `step` counts the vertices on the current path, `sum` is their travelled cost.
    fn explore(&mut self, vertex: usize, sum: f64, step: usize) {
        self.expanded += 1;
        let graph = self.graph;

        if step == graph.vertex_count() {
            match graph.direct_edge(vertex, self.origin) {
                Some(edge) if sum + edge.distance() < self.best_sum => {
                    self.best_sum = sum + edge.distance();
                    self.best_path = Some(self.path.clone());
                }
                Some(_) => self.pruned += 1,
                None => self.unclosable += 1,
            }
            return;
        }

        for &edge_id in graph.vertex_at(vertex).adjacency() {
            let edge = graph.edge(edge_id);
            let next = edge.destination();
            if self.visited[next] {
                continue;
            }
            let next_sum = sum + edge.distance();
            if next_sum >= self.best_sum {
                self.pruned += 1;
                continue;
            }

            self.visited.set(next, true);
            self.path.push(next);
            self.explore(next, next_sum, step + 1);
            self.path.pop();
            self.visited.set(next, false);
        }
    }
}

/// 2-approximation: preorder walk of the minimum spanning tree rooted at the origin,
/// shortcutting back to the origin at the end.
///
/// Legs between consecutive vertices use [`Graph::distance`], so vertices that are not
/// adjacent need coordinates.
///
/// <https://en.wikipedia.org/wiki/Travelling_salesman_problem#Heuristic_and_approximation_algorithms>
pub fn triangular_approximation(graph: &Graph) -> Result<Tour> {
    let origin = origin_index(graph)?;
    if graph.vertex_count() == 1 {
        return Ok(Tour::trivial());
    }
    debug!(
        "Triangular approximation over {} vertices",
        graph.vertex_count()
    );
    let start = Instant::now();

    let tree = mst::prim(graph, ORIGIN)?;
    if !tree.spans_all() {
        return Err(Error::Disconnected {
            root: ORIGIN,
            reached: tree.reached(),
            total: graph.vertex_count(),
        });
    }

    let mut path = preorder(graph, &tree, origin);
    path.push(origin);
    let cost = path_cost(graph, &path)?;

    let tour = Tour::from_indices(graph, &path, cost);
    info!(
        "Triangular approximation tour of {} legs, cost {} in {:?}",
        tour.len(),
        tour.cost,
        start.elapsed()
    );
    Ok(tour)
}

/// Visit order of the tree, each vertex before its children and children in adjacency order.
fn preorder(graph: &Graph, tree: &mst::SpanningTree, root: usize) -> Vec<usize> {
    let mut visited = BitVec::<u8, Msb0>::repeat(false, graph.vertex_count());
    let mut order = Vec::with_capacity(graph.vertex_count() + 1);
    let mut stack = vec![root];

    while let Some(vertex) = stack.pop() {
        if visited[vertex] {
            continue;
        }
        visited.set(vertex, true);
        order.push(vertex);

        // Reversed so the first child in adjacency order is popped first
        for &edge_id in graph.vertex_at(vertex).adjacency().iter().rev() {
            let child = graph.edge(edge_id).destination();
            if !visited[child] && tree.parent(child) == Some(edge_id) {
                stack.push(child);
            }
        }
    }
    order
}

/// Greedy tour that always moves to the closest unvisited vertex. O(V²) distance lookups.
pub fn nearest_neighbour(graph: &Graph) -> Result<Tour> {
    let origin = origin_index(graph)?;
    if graph.vertex_count() == 1 {
        return Ok(Tour::trivial());
    }
    debug!("Nearest neighbour over {} vertices", graph.vertex_count());
    let start = Instant::now();

    let mut visited = BitVec::<u8, Msb0>::repeat(false, graph.vertex_count());
    visited.set(origin, true);
    let mut path = Vec::with_capacity(graph.vertex_count() + 1);
    path.push(origin);

    let mut current = origin;
    let mut cost = 0.;
    for _ in 1..graph.vertex_count() {
        let (nearest, distance) =
            nearest_unvisited(graph, current, &visited)?.ok_or(Error::NoTour)?;
        visited.set(nearest, true);
        path.push(nearest);
        cost += distance;
        current = nearest;
    }
    cost += graph.distance(current, origin)?;
    path.push(origin);

    let tour = Tour::from_indices(graph, &path, cost);
    info!(
        "Nearest neighbour tour of {} legs, cost {} in {:?}",
        tour.len(),
        tour.cost,
        start.elapsed()
    );
    Ok(tour)
}

/// Linear scan in insertion order; the first vertex at the minimum distance wins.
fn nearest_unvisited(
    graph: &Graph,
    source: usize,
    visited: &BitSlice<u8, Msb0>,
) -> Result<Option<(usize, f64)>> {
    let mut nearest = None;
    let mut min = f64::INFINITY;
    for candidate in 0..graph.vertex_count() {
        if candidate == source || visited[candidate] {
            continue;
        }
        let distance = graph.distance(source, candidate)?;
        if distance < min {
            min = distance;
            nearest = Some((candidate, distance));
        }
    }
    Ok(nearest)
}
