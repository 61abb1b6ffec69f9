use std::time::Instant;

use crate::graph::{MeshGraph, VertexId};
use crate::heap::OpenHeap;
use crate::result::{PathResult, PathVertex};
use crate::stats::{NoopRecorder, SearchOutcome, SearchStats};
use crate::traits::SearchRecorder;

impl MeshGraph {
    /// Shortest path from `begin` to `goal` along mesh edges.
    ///
    /// Returns a result with `found() == false` when the two vertices lie in
    /// different connected components.
    ///
    /// # Panics
    ///
    /// Panics if either id is not a vertex of this graph. Use
    /// [`MeshGraph::check_id`] or [`MeshGraph::resolve`] to obtain valid ids.
    pub fn dijkstra(&self, begin: VertexId, goal: VertexId) -> PathResult {
        self.dijkstra_with(begin, goal, &mut NoopRecorder)
    }

    /// Like [`dijkstra`](Self::dijkstra), reporting counters and timing to
    /// `recorder` when the search terminates.
    pub fn dijkstra_with<R: SearchRecorder + ?Sized>(
        &self,
        begin: VertexId,
        goal: VertexId,
        recorder: &mut R,
    ) -> PathResult {
        assert!(
            self.contains(begin) && self.contains(goal),
            "dijkstra: vertex {begin} or {goal} not in a graph of {} vertices",
            self.vertex_count()
        );
        let started = Instant::now();
        let mut stats = SearchStats {
            vertices: self.vertex_count(),
            ..SearchStats::default()
        };

        if begin == goal {
            stats.outcome = SearchOutcome::Found;
            stats.elapsed = started.elapsed();
            recorder.record(&stats);
            return PathResult::reached(vec![self.snapshot(begin)], 0.0);
        }

        // Fresh labels for every search.
        let n = self.vertex_count();
        let mut dist = vec![f64::INFINITY; n];
        let mut prev: Vec<Option<VertexId>> = vec![None; n];
        dist[begin.0] = 0.0;

        let mut open = OpenHeap::new(&dist);

        let result = loop {
            let Some(u) = open.pop_min(&dist) else {
                break PathResult::unreachable();
            };
            stats.popped += 1;

            let du = dist[u.0];
            // Everything still open is unreachable from `begin`.
            if du == f64::INFINITY {
                break PathResult::unreachable();
            }
            if u == goal {
                break PathResult::reached(self.trace_back(goal, &prev), du);
            }

            let pu = self.vertices[u.0].position;
            for &v in &self.vertices[u.0].neighbors {
                stats.relaxed += 1;
                let alt = du + pu.distance(self.vertices[v.0].position);
                // A NaN weight never improves a label.
                let improves = alt < dist[v.0];
                if !improves {
                    continue;
                }
                // Locate before mutating: the search relies on heap order.
                let Some(at) = open.position_of(v) else {
                    continue;
                };
                // Linear in the open set while most keys are infinite, so
                // only checked under test.
                #[cfg(test)]
                assert_eq!(open.find_index(v, &dist), Some(at));
                dist[v.0] = alt;
                prev[v.0] = Some(u);
                open.revalidate_at(at, &dist);
                stats.decreased += 1;
            }
        };

        stats.outcome = if result.found() {
            SearchOutcome::Found
        } else {
            SearchOutcome::Exhausted
        };
        stats.elapsed = started.elapsed();
        recorder.record(&stats);
        result
    }

    fn snapshot(&self, id: VertexId) -> PathVertex {
        PathVertex {
            id,
            position: self.vertices[id.0].position,
        }
    }

    fn trace_back(&self, goal: VertexId, prev: &[Option<VertexId>]) -> Vec<PathVertex> {
        let mut path = Vec::new();
        let mut cur = Some(goal);
        while let Some(id) = cur {
            path.push(self.snapshot(id));
            cur = prev[id.0];
        }
        path.reverse();
        path
    }
}
