use std::fmt;
use std::io::{self, Write};

use meshpath_core::{Point3, Triangle, write_ascii_stl};

use crate::graph::VertexId;

/// Snapshot of a vertex on a path, independent of the graph it came from.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathVertex {
    pub id: VertexId,
    pub position: Point3,
}

/// Outcome of a shortest-path query.
///
/// A path that was not found has an infinite length and no vertices.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathResult {
    path: Vec<PathVertex>,
    #[cfg_attr(feature = "serde", serde(with = "length_serde"))]
    length: f64,
}

impl PathResult {
    /// A path from `path[0]` to its last vertex of total length `length`.
    pub fn reached(path: Vec<PathVertex>, length: f64) -> Self {
        Self { path, length }
    }

    /// The "no path" result.
    pub fn unreachable() -> Self {
        Self {
            path: Vec::new(),
            length: f64::INFINITY,
        }
    }

    /// Whether a path exists.
    #[inline]
    pub fn found(&self) -> bool {
        self.length != f64::INFINITY
    }

    /// Vertices from begin to goal.
    #[inline]
    pub fn path(&self) -> &[PathVertex] {
        &self.path
    }

    /// Total length, `f64::INFINITY` when not found.
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Number of vertices on the path.
    #[inline]
    pub fn len(&self) -> usize {
        self.path.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn begin(&self) -> Option<&PathVertex> {
        self.path.first()
    }

    pub fn goal(&self) -> Option<&PathVertex> {
        self.path.last()
    }

    /// Vertex ids along the path.
    pub fn ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.path.iter().map(|v| v.id)
    }

    /// One marker triangle per path vertex, see [`MarkerStyle`].
    pub fn to_marker_triangles(&self, style: &MarkerStyle) -> Vec<Triangle> {
        let d = style.offset;
        self.path
            .iter()
            .map(|v| {
                let p = v.position;
                Triangle::with_normal(
                    style.normal,
                    p.shift(d, 0.0, 0.0),
                    p.shift(0.0, d, 0.0),
                    p.shift(0.0, 0.0, d),
                )
            })
            .collect()
    }

    /// Write the path markers as an ASCII STL solid named `PathScene`.
    pub fn write_marker_stl<W: Write>(&self, writer: W, style: &MarkerStyle) -> io::Result<()> {
        write_ascii_stl(writer, "PathScene", &self.to_marker_triangles(style))
    }
}

impl fmt::Display for PathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pathFound: {}", self.found())?;
        if self.found() {
            writeln!(f, "Length: {}", self.length)?;
            write!(f, "Path: ")?;
            for v in &self.path {
                write!(f, "{} ", v.id)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Appearance of the per-vertex markers written for a path.
///
/// Each vertex `p` becomes the triangle `p + (offset, 0, 0)`,
/// `p + (0, offset, 0)`, `p + (0, 0, offset)`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerStyle {
    pub offset: f64,
    pub normal: Point3,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            offset: 0.5,
            normal: Point3::new(0.0, 1.0, 0.0),
        }
    }
}

// JSON has no infinity; an unreachable length travels as `null`.
#[cfg(feature = "serde")]
mod length_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(length: &f64, s: S) -> Result<S::Ok, S::Error> {
        if length.is_finite() {
            s.serialize_some(length)
        } else {
            s.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::INFINITY))
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn unreachable_round_trip() {
        let r = PathResult::unreachable();
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"path":[],"length":null}"#);
        let back: PathResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn reached_round_trip() {
        let r = PathResult::reached(
            vec![PathVertex {
                id: VertexId(3),
                position: Point3::new(1.0, 2.0, 3.0),
            }],
            0.0,
        );
        let json = serde_json::to_string(&r).unwrap();
        let back: PathResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
