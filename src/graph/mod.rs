use rustc_hash::FxHashMap as HashMap;

use crate::{
    error::{Error, Result},
    math::haversine,
};

/// Mutable min-priority queue used to grow the spanning tree
pub mod frontier;
/// Find the [Minimum Spanning Tree (MST)](https://en.wikipedia.org/wiki/Minimum_spanning_tree)
pub mod mst;
/// Solve the [Traveling Salesman Problem (TSP)](https://en.wikipedia.org/wiki/Travelling_salesman_problem)
pub mod tsp;

pub type VertexId = u32;

/// Handle into the edge arena of a [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn haversine(&self, other: &Self) -> f64 {
        haversine(
            [self.latitude, self.longitude],
            [other.latitude, other.longitude],
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    id: VertexId,
    coordinates: Option<Coordinates>,
    adjacency: Vec<EdgeId>,
}

impl Vertex {
    pub fn new(id: VertexId) -> Self {
        Self {
            id,
            coordinates: None,
            adjacency: vec![],
        }
    }

    pub fn with_coordinates(id: VertexId, coordinates: Coordinates) -> Self {
        Self {
            coordinates: Some(coordinates),
            ..Self::new(id)
        }
    }

    pub fn id(&self) -> VertexId {
        self.id
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    /// Outgoing edges in the order they were added
    pub fn adjacency(&self) -> &[EdgeId] {
        &self.adjacency
    }
}

/// Directed arc between two vertices, addressed by their dense index in the owning [`Graph`].
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source: usize,
    destination: usize,
    distance: f64,
    reverse: Option<EdgeId>,
}

impl Edge {
    pub fn source(&self) -> usize {
        self.source
    }

    pub fn destination(&self) -> usize {
        self.destination
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// The opposite arc of a bidirectional edge. Bookkeeping only, never followed by the solvers.
    pub fn reverse(&self) -> Option<EdgeId> {
        self.reverse
    }
}

/// Weighted graph owning its vertices and an arena of their outgoing edges.
///
/// Vertices keep their insertion order, which doubles as the dense index used by
/// per-run solver state and as the tie-break order when scanning all vertices.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    index_by_id: HashMap<VertexId, usize>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn find_vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.index_of(id).map(|index| &self.vertices[index])
    }

    pub fn index_of(&self, id: VertexId) -> Option<usize> {
        self.index_by_id.get(&id).copied()
    }

    /// # Panics
    ///
    /// If `index` is not below [`Graph::vertex_count`].
    pub fn vertex_at(&self, index: usize) -> &Vertex {
        &self.vertices[index]
    }

    pub fn edge(&self, edge: EdgeId) -> &Edge {
        &self.edges[edge.0]
    }

    /// Outgoing edges of the vertex with the given id, empty if it does not exist.
    pub fn edges_of(&self, id: VertexId) -> impl Iterator<Item = &Edge> + '_ {
        self.find_vertex(id)
            .into_iter()
            .flat_map(move |vertex| {
                vertex
                    .adjacency
                    .iter()
                    .map(move |edge| &self.edges[edge.0])
            })
    }

    /// Returns false, leaving the graph untouched, if a vertex with the same id already exists.
    pub fn add_vertex(&mut self, vertex: Vertex) -> bool {
        if self.index_by_id.contains_key(&vertex.id) {
            return false;
        }
        self.index_by_id.insert(vertex.id, self.vertices.len());
        self.vertices.push(Vertex {
            adjacency: vec![],
            ..vertex
        });
        true
    }

    /// Returns false if either endpoint is missing or the weight is negative or not finite.
    pub fn add_edge(&mut self, source: VertexId, destination: VertexId, distance: f64) -> bool {
        match self.endpoints(source, destination, distance) {
            Some((source, destination)) => {
                self.push_edge(source, destination, distance);
                true
            }
            None => false,
        }
    }

    /// Adds both arcs with the same weight and links them as each other's reverse.
    pub fn add_bidirectional_edge(
        &mut self,
        source: VertexId,
        destination: VertexId,
        distance: f64,
    ) -> bool {
        match self.endpoints(source, destination, distance) {
            Some((source, destination)) => {
                let forward = self.push_edge(source, destination, distance);
                let backward = self.push_edge(destination, source, distance);
                self.edges[forward.0].reverse = Some(backward);
                self.edges[backward.0].reverse = Some(forward);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.index_by_id.clear();
    }

    /// First edge from `source` to `destination` in adjacency order, if any.
    pub fn direct_edge(&self, source: usize, destination: usize) -> Option<&Edge> {
        self.vertices[source]
            .adjacency
            .iter()
            .map(|edge| &self.edges[edge.0])
            .find(|edge| edge.destination == destination)
    }

    /// Cost of travelling between two vertices given by dense index.
    ///
    /// A direct edge wins. Otherwise falls back to the great-circle distance between
    /// the vertices' coordinates, which must then be present on both.
    pub fn distance(&self, source: usize, destination: usize) -> Result<f64> {
        if let Some(edge) = self.direct_edge(source, destination) {
            return Ok(edge.distance);
        }
        let from = &self.vertices[source];
        let to = &self.vertices[destination];
        match (from.coordinates, to.coordinates) {
            (Some(a), Some(b)) => Ok(a.haversine(&b)),
            _ => Err(Error::MissingCoordinates {
                from: from.id,
                to: to.id,
            }),
        }
    }

    /// [`Graph::distance`] addressed by vertex id.
    pub fn distance_between(&self, source: VertexId, destination: VertexId) -> Result<f64> {
        let from = self.index_of(source).ok_or(Error::MissingVertex(source))?;
        let to = self
            .index_of(destination)
            .ok_or(Error::MissingVertex(destination))?;
        self.distance(from, to)
    }

    fn endpoints(
        &self,
        source: VertexId,
        destination: VertexId,
        distance: f64,
    ) -> Option<(usize, usize)> {
        if !distance.is_finite() || distance < 0. {
            return None;
        }
        Some((self.index_of(source)?, self.index_of(destination)?))
    }

    fn push_edge(&mut self, source: usize, destination: usize, distance: f64) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            source,
            destination,
            distance,
            reverse: None,
        });
        self.vertices[source].adjacency.push(id);
        id
    }
}
