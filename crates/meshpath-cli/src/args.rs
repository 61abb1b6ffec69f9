//! Command-line arguments.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use meshpath_core::Point3;
use meshpath_paths::{DEFAULT_TOLERANCE, MeshGraph, PathError, ResolveConfig, VertexId};

/// Shortest paths along the edges of STL meshes.
#[derive(Debug, Parser)]
#[command(name = "meshpath")]
#[command(version)]
#[command(about = "Shortest paths along the edges of STL meshes")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Distance within which a query point matches a mesh vertex
    #[arg(long, default_value_t = DEFAULT_TOLERANCE, global = true)]
    pub tolerance: f64,

    /// Also append log output to this file
    #[arg(long, value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn resolve_config(&self) -> ResolveConfig {
        ResolveConfig {
            tolerance: self.tolerance,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Find the shortest path between two vertices of a mesh
    ///
    /// Writes one marker triangle per path vertex to `<STL>_path.stl`.
    Path(PathArgs),
    /// Time searches between random vertex pairs
    Bench(BenchArgs),
}

#[derive(Debug, Args)]
pub struct PathArgs {
    /// ASCII or binary STL file
    pub stl: PathBuf,

    /// Start vertex, as `x,y,z` or a vertex index
    #[arg(long, allow_hyphen_values = true)]
    pub from: Endpoint,

    /// Goal vertex, as `x,y,z` or a vertex index
    #[arg(long, allow_hyphen_values = true)]
    pub to: Endpoint,

    /// Print a JSON summary to stdout
    #[arg(long)]
    pub json: bool,

    /// Do not write the marker STL
    #[arg(long)]
    pub no_render: bool,

    /// Write the mesh adjacency as a Graphviz file
    #[arg(long, value_name = "FILE")]
    pub graphviz: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct BenchArgs {
    /// ASCII or binary STL file
    pub stl: PathBuf,

    /// Number of random queries
    #[arg(long, default_value_t = 100)]
    pub pairs: usize,

    /// Seed for choosing the pairs
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

/// One end of a path query as given on the command line.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Endpoint {
    Point(Point3),
    Index(usize),
}

impl Endpoint {
    /// The vertex this endpoint names in `graph`.
    pub fn resolve(
        &self,
        graph: &MeshGraph,
        config: &ResolveConfig,
    ) -> Result<VertexId, PathError> {
        match *self {
            Endpoint::Point(p) => graph.resolve(p, config),
            Endpoint::Index(i) => graph.check_id(i),
        }
    }
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.contains(',') {
            return s
                .parse()
                .map(Endpoint::Index)
                .map_err(|_| format!("`{s}` is neither a vertex index nor `x,y,z`"));
        }
        let coords = s
            .split(',')
            .map(|c| c.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("bad coordinate in `{s}`: {e}"))?;
        match coords[..] {
            [x, y, z] => Ok(Endpoint::Point(Point3::new(x, y, z))),
            _ => Err(format!("expected three coordinates, got {} in `{s}`", coords.len())),
        }
    }
}
