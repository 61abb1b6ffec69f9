//! Connected-component labelling.

use crate::graph::{MeshGraph, VertexId};

/// Component label of every vertex of a graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Components {
    labels: Vec<usize>,
    count: usize,
}

impl Components {
    /// Number of components.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Label of `v`, or `None` if `v` is not in the labelled graph.
    #[inline]
    pub fn label(&self, v: VertexId) -> Option<usize> {
        self.labels.get(v.0).copied()
    }

    /// Whether `a` and `b` are connected.
    pub fn connected(&self, a: VertexId, b: VertexId) -> bool {
        match (self.label(a), self.label(b)) {
            (Some(la), Some(lb)) => la == lb,
            _ => false,
        }
    }

    /// Number of vertices in each component, indexed by label.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.count];
        for &l in &self.labels {
            sizes[l] += 1;
        }
        sizes
    }
}

impl MeshGraph {
    /// Label every vertex with a connected-component id.
    ///
    /// Labels are assigned in order of the lowest vertex id in each
    /// component, starting at 0.
    pub fn components(&self) -> Components {
        const UNLABELLED: usize = usize::MAX;
        let n = self.vertex_count();
        let mut labels = vec![UNLABELLED; n];
        let mut stack = Vec::new();
        let mut label = 0;

        for start in 0..n {
            if labels[start] != UNLABELLED {
                continue;
            }

            // Iterative DFS from `start`.
            stack.clear();
            stack.push(start);
            labels[start] = label;

            while let Some(ci) = stack.pop() {
                for ni in self.vertices[ci].neighbors.iter().map(|v| v.0) {
                    if labels[ni] == UNLABELLED {
                        labels[ni] = label;
                        stack.push(ni);
                    }
                }
            }

            label += 1;
        }

        Components {
            labels,
            count: label,
        }
    }

    /// Every vertex reachable from `v`, `v` included, in discovery order.
    ///
    /// # Panics
    ///
    /// Panics if `v` is not a vertex of this graph.
    pub fn component_of(&self, v: VertexId) -> Vec<VertexId> {
        let mut seen = vec![false; self.vertex_count()];
        let mut result = vec![v];
        let mut stack = vec![v];
        seen[v.0] = true;

        while let Some(c) = stack.pop() {
            for &n in &self.vertices[c.0].neighbors {
                if !seen[n.0] {
                    seen[n.0] = true;
                    stack.push(n);
                    result.push(n);
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{cube, p};
    use meshpath_core::Triangle;

    fn two_pieces() -> MeshGraph {
        let mut tris = cube(1.0);
        tris.push(Triangle::new(p(9.0, 0.0, 0.0), p(10.0, 0.0, 0.0), p(9.0, 1.0, 0.0)));
        MeshGraph::from_triangles(&tris)
    }

    #[test]
    fn single_component() {
        let g = MeshGraph::from_triangles(&cube(1.0));
        let cc = g.components();
        assert_eq!(cc.count(), 1);
        assert_eq!(cc.sizes(), vec![8]);
        assert!(cc.connected(VertexId(0), VertexId(7)));
    }

    #[test]
    fn separate_pieces() {
        let g = two_pieces();
        let cc = g.components();
        assert_eq!(cc.count(), 2);
        assert_eq!(cc.sizes(), vec![8, 3]);
        assert_eq!(cc.label(VertexId(0)), Some(0));
        assert_eq!(cc.label(VertexId(9)), Some(1));
        assert!(!cc.connected(VertexId(0), VertexId(9)));
        assert!(!cc.connected(VertexId(0), VertexId(99)));
    }

    #[test]
    fn found_iff_connected() {
        let g = two_pieces();
        let cc = g.components();
        for a in (0..g.vertex_count()).map(VertexId) {
            for b in (0..g.vertex_count()).map(VertexId) {
                assert_eq!(g.dijkstra(a, b).found(), cc.connected(a, b), "{a} -> {b}");
            }
        }
    }

    #[test]
    fn component_of_collects_reachable() {
        let g = two_pieces();
        let mut piece = g.component_of(VertexId(10));
        piece.sort();
        assert_eq!(piece, vec![VertexId(8), VertexId(9), VertexId(10)]);
        assert_eq!(g.component_of(VertexId(0)).len(), 8);
    }
}
