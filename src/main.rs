use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::{
    io::{self, Write},
    path::PathBuf,
    time::Instant,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tsp_graph::{
    error::{Error, Result},
    generate,
    graph::{
        mst,
        tsp::{Algorithm, Tour, ORIGIN},
        Graph, VertexId,
    },
    loader,
};

#[derive(Debug, Parser)]
#[command(author, version, about)]
/// Solve the traveling salesman problem over a weighted graph
struct Opt {
    /// CSV of `origin,destination,distance` records with a header row
    #[arg(long, required_unless_present = "random")]
    edges: Option<PathBuf>,

    /// CSV of `id,longitude,latitude` records with a header row
    #[arg(long)]
    nodes: Option<PathBuf>,

    /// Treat every edge record as one-way
    #[arg(long)]
    directed: bool,

    /// Generate a complete geographic graph with this many vertices instead of reading one
    #[arg(long, conflicts_with_all = ["edges", "nodes"])]
    random: Option<usize>,

    /// Seed for `--random`
    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(short, long, value_enum, default_value_t = AlgorithmChoice::All)]
    algorithm: AlgorithmChoice,

    /// Also report the weight of the minimum spanning tree rooted at vertex 0
    #[arg(long)]
    mst: bool,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AlgorithmChoice {
    Backtracking,
    Triangular,
    NearestNeighbour,
    All,
}

impl AlgorithmChoice {
    fn algorithms(self) -> Vec<Algorithm> {
        match self {
            AlgorithmChoice::Backtracking => vec![Algorithm::Backtracking],
            AlgorithmChoice::Triangular => vec![Algorithm::Triangular],
            AlgorithmChoice::NearestNeighbour => vec![Algorithm::NearestNeighbour],
            AlgorithmChoice::All => Algorithm::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct Report {
    algorithm: Algorithm,
    cost: f64,
    path: Vec<VertexId>,
    elapsed_ms: f64,
}

#[derive(Debug, Serialize)]
struct MstSummary {
    weight: f64,
    reached: usize,
    total: usize,
}

/// Everything one run writes to stdout
#[derive(Debug, Serialize)]
struct Output {
    #[serde(skip_serializing_if = "Option::is_none")]
    mst: Option<MstSummary>,
    tours: Vec<Report>,
}

impl Output {
    fn write<W: Write>(&self, out: &mut W, format: Format) -> Result<()> {
        match format {
            Format::Text => {
                if let Some(mst) = &self.mst {
                    writeln!(
                        out,
                        "mst: weight {} reaching {}/{} vertices",
                        mst.weight, mst.reached, mst.total
                    )?;
                }
                for report in &self.tours {
                    writeln!(
                        out,
                        "{}: cost {} in {:.3} ms",
                        report.algorithm, report.cost, report.elapsed_ms
                    )?;
                    writeln!(
                        out,
                        "  {}",
                        report
                            .path
                            .iter()
                            .map(|id| id.to_string())
                            .collect::<Vec<_>>()
                            .join(" -> ")
                    )?;
                }
            }
            Format::Json => {
                serde_json::to_writer_pretty(&mut *out, self)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let opt = Opt::parse();
    init_tracing(opt.verbose)?;

    let graph = match (opt.random, &opt.edges) {
        (Some(count), _) => {
            info!("Generating {} random vertices from seed {}", count, opt.seed);
            generate::random_geographic(count, opt.seed)
        }
        (None, Some(edges)) => loader::load_graph(edges, opt.nodes.as_deref(), opt.directed)?,
        (None, None) => return Err(Error::other("either --edges or --random is required")),
    };

    if graph.find_vertex(ORIGIN).is_none() {
        return Err(Error::MissingOrigin);
    }
    if opt.algorithm.algorithms().contains(&Algorithm::Backtracking) && graph.vertex_count() > 15
    {
        warn!(
            "Backtracking over {} vertices may take a very long time",
            graph.vertex_count()
        );
    }

    let mst = if opt.mst {
        let tree = mst::prim(&graph, ORIGIN)?;
        Some(MstSummary {
            weight: tree.weight(&graph),
            reached: tree.reached(),
            total: graph.vertex_count(),
        })
    } else {
        None
    };

    let tours = opt
        .algorithm
        .algorithms()
        .into_iter()
        .map(|algorithm| solve(&graph, algorithm))
        .collect::<Result<Vec<_>>>()?;

    Output { mst, tours }.write(&mut io::stdout().lock(), opt.format)
}

fn solve(graph: &Graph, algorithm: Algorithm) -> Result<Report> {
    let start = Instant::now();
    let tour = algorithm.solve(graph)?;
    let elapsed = start.elapsed();
    if !tour.visits_every_vertex(graph) {
        warn!("{} returned a tour that is not a Hamiltonian cycle", algorithm);
    }
    let Tour { path, cost } = tour;
    Ok(Report {
        algorithm,
        cost,
        path,
        elapsed_ms: elapsed.as_secs_f64() * 1000.,
    })
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default_directive = if verbose {
        "tsp_graph=debug"
    } else {
        "tsp_graph=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| Error::other(format!("logger init failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::{solve, AlgorithmChoice, Format, MstSummary, Opt, Output};
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;
    use tsp_graph::graph::{mst, tsp::Algorithm, Graph, Vertex};

    fn triangle() -> Graph {
        let mut graph = Graph::new();
        for id in 0..3 {
            graph.add_vertex(Vertex::new(id));
        }
        graph.add_bidirectional_edge(0, 1, 1.);
        graph.add_bidirectional_edge(1, 2, 2.);
        graph.add_bidirectional_edge(2, 0, 3.);
        graph
    }

    fn output_with_mst(graph: &Graph) -> Output {
        let tree = mst::prim(graph, 0).unwrap();
        Output {
            mst: Some(MstSummary {
                weight: tree.weight(graph),
                reached: tree.reached(),
                total: graph.vertex_count(),
            }),
            tours: vec![solve(graph, Algorithm::Triangular).unwrap()],
        }
    }

    #[test]
    fn cli_is_consistent() {
        Opt::command().debug_assert();
    }

    #[test]
    fn edges_or_random_is_required() {
        assert!(Opt::try_parse_from(["tsp-graph"]).is_err());
        assert!(Opt::try_parse_from(["tsp-graph", "--random", "5", "--edges", "e.csv"]).is_err());
    }

    #[test]
    fn parses_options() {
        let opt = Opt::try_parse_from([
            "tsp-graph",
            "--edges",
            "edges.csv",
            "--nodes",
            "nodes.csv",
            "-a",
            "nearest-neighbour",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(opt.algorithm, AlgorithmChoice::NearestNeighbour);
        assert_eq!(opt.format, Format::Json);
        assert_eq!(opt.algorithm.algorithms().len(), 1);
        assert!(!opt.directed);

        let opt = Opt::try_parse_from(["tsp-graph", "--random", "8", "--seed", "3"]).unwrap();
        assert_eq!(opt.random, Some(8));
        assert_eq!(opt.algorithm.algorithms().len(), 3);
    }

    #[test]
    fn json_output_with_mst_is_a_single_document() {
        let graph = triangle();
        let mut buffer = Vec::new();
        output_with_mst(&graph)
            .write(&mut buffer, Format::Json)
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["mst"]["weight"], 3.);
        assert_eq!(value["mst"]["reached"], 3);
        assert_eq!(value["tours"][0]["algorithm"], "triangular");
        assert_eq!(value["tours"][0]["cost"], 6.);
        assert_eq!(value["tours"][0]["path"], serde_json::json!([0, 1, 2, 0]));
    }

    #[test]
    fn json_output_without_mst_omits_it() {
        let graph = triangle();
        let output = Output {
            mst: None,
            tours: vec![solve(&graph, Algorithm::NearestNeighbour).unwrap()],
        };
        let mut buffer = Vec::new();
        output.write(&mut buffer, Format::Json).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert!(value.get("mst").is_none());
        assert_eq!(value["tours"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn text_output_starts_with_mst_line() {
        let graph = triangle();
        let mut buffer = Vec::new();
        output_with_mst(&graph)
            .write(&mut buffer, Format::Text)
            .unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "mst: weight 3 reaching 3/3 vertices");
        assert!(lines[1].starts_with("triangular: cost 6 in "));
        assert_eq!(lines[2], "  0 -> 1 -> 2 -> 0");
    }
}
