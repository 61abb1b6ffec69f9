//! Geometry primitives: [`Point3`] and [`Triangle`].

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

// ---------------------------------------------------------------------------
// Point3
// ---------------------------------------------------------------------------

/// A point in 3D space.
///
/// Points are totally ordered (lexicographically on x, y, z) so they can key
/// ordered maps. Equality is exact and agrees with the ordering; `-0.0` and
/// `0.0` are the same coordinate.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// Origin (0, 0, 0).
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Return a point shifted by (dx, dy, dz).
    #[inline]
    pub fn shift(self, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Squared Euclidean distance to `other`.
    #[inline]
    pub fn distance_squared(self, other: Point3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Point3) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Whether every coordinate is finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    // Adding 0.0 folds -0.0 into 0.0 before bit-level comparison.
    #[inline]
    fn canonical(v: f64) -> f64 {
        v + 0.0
    }
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point3, b: Point3) -> f64 {
    a.distance(b)
}

// --- trait impls for Point3 ---

impl PartialEq for Point3 {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Point3 {}

impl Hash for Point3 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Self::canonical(self.x).to_bits().hash(state);
        Self::canonical(self.y).to_bits().hash(state);
        Self::canonical(self.z).to_bits().hash(state);
    }
}

impl PartialOrd for Point3 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point3 {
    fn cmp(&self, other: &Self) -> Ordering {
        let c = Self::canonical;
        c(self.x)
            .total_cmp(&c(other.x))
            .then_with(|| c(self.y).total_cmp(&c(other.y)))
            .then_with(|| c(self.z).total_cmp(&c(other.z)))
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

impl From<[f32; 3]> for Point3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(f64::from(v[0]), f64::from(v[1]), f64::from(v[2]))
    }
}

// ---------------------------------------------------------------------------
// Triangle
// ---------------------------------------------------------------------------

/// A mesh facet: a normal and three corners.
///
/// The normal is carried through from the mesh file and is not used for
/// path finding.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangle {
    pub normal: Point3,
    pub vertices: [Point3; 3],
}

impl Triangle {
    /// Create a triangle with a zero normal.
    #[inline]
    pub const fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self {
            normal: Point3::ZERO,
            vertices: [a, b, c],
        }
    }

    /// Create a triangle with an explicit normal.
    #[inline]
    pub const fn with_normal(normal: Point3, a: Point3, b: Point3, c: Point3) -> Self {
        Self {
            normal,
            vertices: [a, b, c],
        }
    }

    /// The three edges `(v1, v2)`, `(v2, v3)`, `(v3, v1)`.
    #[inline]
    pub fn edges(&self) -> [(Point3, Point3); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, HashSet};

    #[test]
    fn distance_is_euclidean() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(4.0, 6.0, 3.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(distance(b, a), 5.0);
        assert_eq!(a.distance(a), 0.0);
    }

    #[test]
    fn ordering_is_lexicographic() {
        let mut set = BTreeSet::new();
        set.insert(Point3::new(1.0, 0.0, 0.0));
        set.insert(Point3::new(0.0, 5.0, 0.0));
        set.insert(Point3::new(0.0, 1.0, 9.0));
        set.insert(Point3::new(0.0, 1.0, 2.0));
        let order: Vec<_> = set.into_iter().collect();
        assert_eq!(
            order,
            vec![
                Point3::new(0.0, 1.0, 2.0),
                Point3::new(0.0, 1.0, 9.0),
                Point3::new(0.0, 5.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
            ]
        );
    }

    #[test]
    fn negative_zero_equals_zero() {
        let a = Point3::new(-0.0, 1.0, 0.0);
        let b = Point3::new(0.0, 1.0, -0.0);
        assert_eq!(a, b);
        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn exact_equality_only() {
        let a = Point3::new(0.1, 0.2, 0.3);
        let b = Point3::new(0.1, 0.2, 0.3 + 1e-12);
        assert_ne!(a, b);
    }

    #[test]
    fn widening_from_f32() {
        let p = Point3::from([0.5f32, -2.0, 3.25]);
        assert_eq!(p, Point3::new(0.5, -2.0, 3.25));
    }

    #[test]
    fn triangle_edges_close_the_loop() {
        let t = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let edges = t.edges();
        assert_eq!(edges[0].0, t.vertices[0]);
        assert_eq!(edges[2].1, t.vertices[0]);
    }

    #[test]
    fn finiteness() {
        assert!(Point3::new(1.0, -2.0, 0.0).is_finite());
        assert!(!Point3::new(f64::NAN, 0.0, 0.0).is_finite());
        assert!(!Point3::new(0.0, 0.0, f64::NEG_INFINITY).is_finite());
    }

    #[test]
    fn display_is_space_separated() {
        assert_eq!(Point3::new(1.5, 0.0, -2.0).to_string(), "1.5 0 -2");
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn triangle_round_trip() {
        let t = Triangle::with_normal(
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let json = serde_json::to_string(&t).unwrap();
        let back: Triangle = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
