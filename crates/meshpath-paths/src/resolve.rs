//! Mapping query coordinates and indices onto graph vertices.

use meshpath_core::Point3;
use thiserror::Error;

use crate::graph::{MeshGraph, VertexId};

/// Default matching tolerance, in mesh units. Absorbs the error of a
/// coordinate that went through a text or `f32` round trip.
pub const DEFAULT_TOLERANCE: f64 = 1e-5;

/// How query points are matched against mesh vertices.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolveConfig {
    /// A vertex matches when its distance to the query is below this.
    pub tolerance: f64,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// A query that does not name a vertex of the mesh.
///
/// This is bad input, distinct from a query whose ends are simply not
/// connected (see [`PathResult::found`](crate::PathResult::found)).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("no mesh vertex within {tolerance} of ({point})")]
    NoMatchingVertex { point: Point3, tolerance: f64 },
    #[error("vertex index {index} out of range for a mesh with {count} vertices")]
    VertexOutOfRange { index: usize, count: usize },
}

impl MeshGraph {
    /// Find the vertex at `point`.
    ///
    /// An exact match wins; otherwise the first vertex in point order that
    /// lies within the tolerance is returned.
    pub fn resolve(&self, point: Point3, config: &ResolveConfig) -> Result<VertexId, PathError> {
        if let Some(id) = self.id_of(point) {
            return Ok(id);
        }
        self.index
            .iter()
            .find(|(p, _)| p.distance(point) < config.tolerance)
            .map(|(_, &id)| id)
            .ok_or(PathError::NoMatchingVertex {
                point,
                tolerance: config.tolerance,
            })
    }

    /// Validate a raw vertex index.
    pub fn check_id(&self, index: usize) -> Result<VertexId, PathError> {
        if index < self.vertex_count() {
            Ok(VertexId(index))
        } else {
            Err(PathError::VertexOutOfRange {
                index,
                count: self.vertex_count(),
            })
        }
    }
}
