use thiserror::Error as ThisError;

use crate::graph::VertexId;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("vertex {0} does not exist")]
    MissingVertex(VertexId),
    #[error("tours start at vertex 0, which does not exist")]
    MissingOrigin,
    #[error("no edge from {from} to {to} and coordinates are missing for the fallback")]
    MissingCoordinates { from: VertexId, to: VertexId },
    #[error("no Hamiltonian cycle through vertex 0 exists")]
    NoTour,
    #[error("spanning tree from vertex {root} reaches {reached} of {total} vertices")]
    Disconnected {
        root: VertexId,
        reached: usize,
        total: usize,
    },
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
