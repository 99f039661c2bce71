//! Build a [`Graph`] from CSV edge and node lists.
//!
//! Records are deserialized by position so header names do not matter:
//! edges are `origin, destination, distance` and nodes are `id, longitude, latitude`.
//! Trailing columns such as labels are ignored.
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{
    error::{Error, Result},
    graph::{Coordinates, Graph, Vertex, VertexId},
};

#[derive(Debug, Deserialize)]
struct EdgeRecord(VertexId, VertexId, f64);

#[derive(Debug, Deserialize)]
struct NodeRecord(VertexId, f64, f64);

pub fn load_graph(edges: &Path, nodes: Option<&Path>, directed: bool) -> Result<Graph> {
    info!("Reading edges from {}", edges.display());
    let edges = BufReader::new(File::open(edges)?);
    let nodes = match nodes {
        Some(path) => {
            info!("Reading nodes from {}", path.display());
            Some(BufReader::new(File::open(path)?))
        }
        None => None,
    };
    read_graph(edges, nodes, directed)
}

pub fn read_graph<E: Read, N: Read>(edges: E, nodes: Option<N>, directed: bool) -> Result<Graph> {
    let mut graph = Graph::new();

    if let Some(nodes) = nodes {
        for node in read_records::<NodeRecord, _>(nodes) {
            let NodeRecord(id, longitude, latitude) = node?;
            if !graph.add_vertex(Vertex::with_coordinates(
                id,
                Coordinates::new(latitude, longitude),
            )) {
                warn!("Node {} is listed more than once, keeping the first", id);
            }
        }
        debug!("Read {} nodes", graph.vertex_count());
    }

    for (row, edge) in read_records::<EdgeRecord, _>(edges).enumerate() {
        let EdgeRecord(origin, destination, distance) = edge?;

        for id in [origin, destination] {
            if graph.find_vertex(id).is_none() {
                graph.add_vertex(Vertex::new(id));
            }
        }
        let added = if directed {
            graph.add_edge(origin, destination, distance)
        } else {
            graph.add_bidirectional_edge(origin, destination, distance)
        };
        if !added {
            return Err(Error::invalid_data(format!(
                "edge record {}: distance {} must be finite and non-negative",
                row + 1,
                distance
            )));
        }
    }

    info!(
        "Loaded {} vertices and {} edges",
        graph.vertex_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Deserialize every data record of `reader` by column position.
fn read_records<T, R: Read>(reader: R) -> impl Iterator<Item = Result<T>>
where
    for<'de> T: Deserialize<'de>,
{
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
        .into_records()
        .enumerate()
        .map(|(row, record)| {
            let record = record?;
            record
                .deserialize(None)
                .map_err(|e| Error::invalid_data(format!("record {}: {}", row + 1, e)))
        })
}
