use std::fmt;
use std::io::Write;
use std::time::Duration;

use meshpath_paths::{MeshGraph, SearchStats, VertexId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::path::load_graph;
use crate::args::BenchArgs;
use crate::error::CliError;

/// Aggregate of a batch of random searches.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BenchReport {
    pub queries: usize,
    pub found: usize,
    /// Vertices popped over all searches.
    pub popped: usize,
    pub total: Duration,
    pub slowest: Duration,
}

impl BenchReport {
    pub fn mean(&self) -> Duration {
        match u32::try_from(self.queries) {
            Ok(n) if n > 0 => self.total / n,
            _ => Duration::ZERO,
        }
    }

    fn add(&mut self, stats: &SearchStats, found: bool) {
        self.queries += 1;
        self.found += usize::from(found);
        self.popped += stats.popped;
        self.total += stats.elapsed;
        self.slowest = self.slowest.max(stats.elapsed);
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = |d: Duration| d.as_secs_f64() * 1000.0;
        writeln!(f, "queries: {} ({} found)", self.queries, self.found)?;
        writeln!(f, "popped: {}", self.popped)?;
        writeln!(
            f,
            "search: total {:.3}ms, mean {:.3}ms, slowest {:.3}ms",
            ms(self.total),
            ms(self.mean()),
            ms(self.slowest)
        )
    }
}

/// Run `pairs` searches between vertices drawn uniformly with `seed`.
pub fn bench_graph(graph: &MeshGraph, pairs: usize, seed: u64) -> BenchReport {
    let mut report = BenchReport::default();
    let n = graph.vertex_count();
    if n == 0 {
        return report;
    }
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..pairs {
        let begin = VertexId(rng.random_range(0..n));
        let goal = VertexId(rng.random_range(0..n));
        let mut last = SearchStats::default();
        let result = graph.dijkstra_with(begin, goal, &mut |s: &SearchStats| last = s.clone());
        log::debug!("{begin} -> {goal}: {last}");
        report.add(&last, result.found());
    }
    report
}

pub fn run(args: &BenchArgs, out: &mut dyn Write) -> Result<BenchReport, CliError> {
    let graph = load_graph(&args.stl)?;
    let report = bench_graph(&graph, args.pairs, args.seed);
    log::info!(
        "{} queries, mean search {:.3}ms",
        report.queries,
        report.mean().as_secs_f64() * 1000.0
    );
    write!(out, "{report}")?;
    Ok(report)
}
