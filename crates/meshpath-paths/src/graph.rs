use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write as _};

use meshpath_core::{Point3, Triangle};

/// Dense index of a deduplicated mesh vertex.
///
/// Ids are handed out in order of first appearance, starting at 0, and are
/// the position of the vertex in [`MeshGraph::vertices`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct VertexId(pub usize);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A deduplicated mesh point and the vertices it shares an edge with.
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    pub(crate) id: VertexId,
    pub(crate) position: Point3,
    pub(crate) neighbors: BTreeSet<VertexId>,
}

impl Vertex {
    #[inline]
    pub fn id(&self) -> VertexId {
        self.id
    }

    #[inline]
    pub fn position(&self) -> Point3 {
        self.position
    }

    /// Vertices connected to this one by a mesh edge.
    #[inline]
    pub fn neighbors(&self) -> &BTreeSet<VertexId> {
        &self.neighbors
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }
}

// ---------------------------------------------------------------------------
// MeshGraph
// ---------------------------------------------------------------------------

/// Undirected vertex/edge graph of a triangle mesh.
///
/// Corners that are exactly equal collapse into one vertex and every
/// triangle side becomes an edge. The graph owns all vertex storage; every
/// relation between vertices is a [`VertexId`]. Adjacency never changes once
/// built, and search state is kept outside the graph, so one graph can serve
/// any number of searches.
#[derive(Clone, Debug, Default)]
pub struct MeshGraph {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) index: BTreeMap<Point3, VertexId>,
}

impl MeshGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph of a triangle soup.
    pub fn from_triangles<'a>(triangles: impl IntoIterator<Item = &'a Triangle>) -> Self {
        let mut graph = Self::new();
        for t in triangles {
            graph.add_triangle(t);
        }
        graph
    }

    /// Add one triangle. Adding a triangle twice changes nothing.
    pub fn add_triangle(&mut self, t: &Triangle) {
        for (p, q) in t.edges() {
            let a = self.ensure_vertex(p);
            let b = self.ensure_vertex(q);
            self.connect(a, b);
        }
    }

    fn ensure_vertex(&mut self, p: Point3) -> VertexId {
        if let Some(&id) = self.index.get(&p) {
            return id;
        }
        let id = VertexId(self.vertices.len());
        self.vertices.push(Vertex {
            id,
            position: p,
            neighbors: BTreeSet::new(),
        });
        self.index.insert(p, id);
        id
    }

    fn connect(&mut self, a: VertexId, b: VertexId) {
        // Degenerate triangles repeat a corner.
        if a == b {
            return;
        }
        if self.vertices[a.0].neighbors.insert(b) {
            self.vertices[b.0].neighbors.insert(a);
        }
    }

    /// Number of distinct vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.vertices.iter().map(Vertex::degree).sum::<usize>() / 2
    }

    /// All vertices, indexed by id.
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The vertex with the given id, if it exists.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.0)
    }

    /// Whether `id` names a vertex of this graph.
    #[inline]
    pub fn contains(&self, id: VertexId) -> bool {
        id.0 < self.vertices.len()
    }

    /// Position of a vertex.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a vertex of this graph.
    #[inline]
    pub fn position(&self, id: VertexId) -> Point3 {
        self.vertices[id.0].position
    }

    /// Neighbors of a vertex in ascending id order.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a vertex of this graph.
    pub fn neighbors(&self, id: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices[id.0].neighbors.iter().copied()
    }

    /// Id of the vertex at exactly `p`.
    #[inline]
    pub fn id_of(&self, p: Point3) -> Option<VertexId> {
        self.index.get(&p).copied()
    }

    /// The point-to-vertex map used for deduplication.
    #[inline]
    pub fn point_index(&self) -> &BTreeMap<Point3, VertexId> {
        &self.index
    }

    /// Render the adjacency as a Graphviz document, for inspecting small
    /// meshes.
    pub fn to_graphviz(&self) -> String {
        let mut out = String::new();
        out.push_str("# Render with any Graphviz viewer, e.g. `dot -Tsvg`\n");
        out.push_str("digraph G {\n");
        out.push_str("   concentrate = true;\n");
        out.push_str("   rankdir = LR;\n");
        for v in &self.vertices {
            let _ = writeln!(out, "   {};", v.id);
            for n in &v.neighbors {
                let _ = writeln!(out, "   {} -> {};", v.id, n);
            }
        }
        out.push_str("}\n");
        out
    }
}
