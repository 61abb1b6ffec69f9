//! One-shot entry points: triangles in, shortest path out.

use std::time::Instant;

use meshpath_core::{Point3, Triangle};

use crate::graph::{MeshGraph, VertexId};
use crate::resolve::{PathError, ResolveConfig};
use crate::result::PathResult;
use crate::stats::LogRecorder;
use crate::traits::SearchRecorder;

/// Settings for [`calculate_path_with`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathConfig {
    pub resolve: ResolveConfig,
}

/// The two ends of a query.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Query {
    /// Mesh coordinates, matched within the configured tolerance.
    Points { begin: Point3, goal: Point3 },
    /// Vertex ids in order of first appearance in the triangle list.
    Indices { begin: usize, goal: usize },
}

impl Query {
    /// Map both ends onto vertices of `graph`.
    pub fn resolve(
        &self,
        graph: &MeshGraph,
        config: &ResolveConfig,
    ) -> Result<(VertexId, VertexId), PathError> {
        match *self {
            Query::Points { begin, goal } => {
                Ok((graph.resolve(begin, config)?, graph.resolve(goal, config)?))
            }
            Query::Indices { begin, goal } => Ok((graph.check_id(begin)?, graph.check_id(goal)?)),
        }
    }
}

/// Shortest path between two mesh points.
///
/// Fails when either point is not a vertex of the mesh; two vertices that
/// are not connected yield `Ok` with [`PathResult::found`] false.
pub fn calculate_path(
    begin: Point3,
    goal: Point3,
    triangles: &[Triangle],
) -> Result<PathResult, PathError> {
    calculate_path_with(
        &PathConfig::default(),
        Query::Points { begin, goal },
        triangles,
        &mut LogRecorder,
    )
}

/// Shortest path between two vertex indices.
pub fn calculate_path_by_index(
    begin: usize,
    goal: usize,
    triangles: &[Triangle],
) -> Result<PathResult, PathError> {
    calculate_path_with(
        &PathConfig::default(),
        Query::Indices { begin, goal },
        triangles,
        &mut LogRecorder,
    )
}

/// Build the graph of `triangles`, resolve `query` and search.
///
/// The graph is dropped before returning; the result holds snapshots only.
pub fn calculate_path_with<R: SearchRecorder + ?Sized>(
    config: &PathConfig,
    query: Query,
    triangles: &[Triangle],
    recorder: &mut R,
) -> Result<PathResult, PathError> {
    let started = Instant::now();
    let graph = MeshGraph::from_triangles(triangles);
    log::debug!(
        "built graph of {} triangles: {} vertices, {} edges in {:.3}ms",
        triangles.len(),
        graph.vertex_count(),
        graph.edge_count(),
        started.elapsed().as_secs_f64() * 1000.0
    );

    let (begin, goal) = query.resolve(&graph, &config.resolve)?;
    Ok(graph.dijkstra_with(begin, goal, recorder))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{cube, p};
    use crate::stats::SearchStats;

    #[test]
    fn points_and_indices_agree() {
        let tris = cube(1.0);
        let graph = MeshGraph::from_triangles(&tris);
        let begin = p(0.0, 0.0, 0.0);
        let goal = p(1.0, 1.0, 1.0);

        let by_point = calculate_path(begin, goal, &tris).unwrap();
        let by_index = calculate_path_by_index(
            graph.id_of(begin).unwrap().0,
            graph.id_of(goal).unwrap().0,
            &tris,
        )
        .unwrap();
        assert_eq!(by_point, by_index);
        assert!(by_point.found());
    }

    #[test]
    fn same_point_twice() {
        let tris = cube(1.0);
        let r = calculate_path(p(1.0, 0.0, 1.0), p(1.0, 0.0, 1.0), &tris).unwrap();
        assert!(r.found());
        assert_eq!(r.length(), 0.0);
        assert_eq!(r.len(), 1);
        assert_eq!(r.path()[0].position, p(1.0, 0.0, 1.0));
    }

    #[test]
    fn unmatched_point_is_not_a_missing_path() {
        let tris = cube(1.0);
        let err = calculate_path(p(0.0, 0.0, 0.0), p(3.0, 3.0, 3.0), &tris).unwrap_err();
        assert!(matches!(err, PathError::NoMatchingVertex { .. }));

        let err = calculate_path_by_index(0, 42, &tris).unwrap_err();
        assert_eq!(err, PathError::VertexOutOfRange { index: 42, count: 8 });
    }

    #[test]
    fn disconnected_meshes_have_no_path() {
        let mut tris = cube(1.0);
        tris.push(Triangle::new(p(4.0, 0.0, 0.0), p(5.0, 0.0, 0.0), p(4.0, 1.0, 0.0)));
        let r = calculate_path(p(0.0, 0.0, 0.0), p(5.0, 0.0, 0.0), &tris).unwrap();
        assert!(!r.found());
        assert_eq!(r.length(), f64::INFINITY);
        assert!(r.path().is_empty());
    }

    #[test]
    fn tolerance_comes_from_config() {
        let tris = cube(1.0);
        let config = PathConfig {
            resolve: ResolveConfig { tolerance: 0.01 },
        };
        let query = Query::Points {
            begin: p(0.001, 0.0, 0.0),
            goal: p(1.0, 0.0, 0.004),
        };
        let mut calls = 0;
        let r = calculate_path_with(&config, query, &tris, &mut |_: &SearchStats| calls += 1)
            .unwrap();
        assert_eq!(calls, 1);
        assert!((r.length() - 1.0).abs() < 1e-12);

        // The default tolerance rejects the same point.
        assert!(calculate_path(p(0.001, 0.0, 0.0), p(1.0, 0.0, 0.0), &tris).is_err());
    }
}
