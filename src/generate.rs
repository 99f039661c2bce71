use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use crate::graph::{Coordinates, Graph, Vertex, VertexId};

const LATITUDES: std::ops::Range<f64> = 37.0..42.0;
const LONGITUDES: std::ops::Range<f64> = -9.5..-6.5;

/// Complete graph of `count` vertices (ids `0..count`) scattered over a few degrees of
/// latitude and longitude, weighted by great-circle distance.
///
/// The weights form a metric, so the triangle inequality holds.
pub fn random_geographic(count: usize, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = Graph::new();
    let mut coordinates = Vec::with_capacity(count);
    for id in 0..count as VertexId {
        let point = Coordinates::new(rng.gen_range(LATITUDES), rng.gen_range(LONGITUDES));
        coordinates.push(point);
        graph.add_vertex(Vertex::with_coordinates(id, point));
    }

    for (a, from) in coordinates.iter().enumerate() {
        for (b, to) in coordinates.iter().enumerate().skip(a + 1) {
            graph.add_bidirectional_edge(a as VertexId, b as VertexId, from.haversine(to));
        }
    }
    debug!(
        "Generated {} vertices and {} edges from seed {}",
        graph.vertex_count(),
        graph.edge_count(),
        seed
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::random_geographic;
    use pretty_assertions::assert_eq;

    #[test]
    fn generated_graph_is_complete() {
        let graph = random_geographic(6, 42);
        assert_eq!(graph.vertex_count(), 6);
        assert_eq!(graph.edge_count(), 6 * 5);
        for vertex in graph.vertices() {
            assert!(vertex.coordinates().is_some());
            assert_eq!(vertex.adjacency().len(), 5);
        }
    }

    #[test]
    fn generated_graph_is_reproducible() {
        let a = random_geographic(5, 7);
        let b = random_geographic(5, 7);
        assert_eq!(a.vertices(), b.vertices());
        assert_eq!(
            a.distance_between(1, 3).unwrap(),
            b.distance_between(1, 3).unwrap()
        );
    }

    #[test]
    fn edge_weights_match_coordinates() {
        let graph = random_geographic(4, 3);
        for vertex in graph.vertices() {
            for edge in graph.edges_of(vertex.id()) {
                let from = graph.vertex_at(edge.source()).coordinates().unwrap();
                let to = graph.vertex_at(edge.destination()).coordinates().unwrap();
                assert!((edge.distance() - from.haversine(&to)).abs() < 1e-6);
            }
        }
    }
}
