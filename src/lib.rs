//! Traveling salesman tours over weighted, optionally geographic graphs.
//!
//! [`graph::Graph`] stores vertices and directed edges, [`graph::mst`] grows minimum
//! spanning trees and [`graph::tsp`] holds the exact and approximate tour solvers.
//! Graphs come from CSV files through [`loader`] or from [`generate`].
pub mod error;
pub mod generate;
pub mod graph;
pub mod loader;
pub mod math;
