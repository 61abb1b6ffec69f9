//! Indexed binary min-heap over vertex ids.
//!
//! The heap does not own the keys. Every operation that compares takes the
//! distance array of the running search, indexed by [`VertexId`], so a key
//! can be lowered in place by the caller and the heap repaired afterwards
//! with [`OpenHeap::revalidate_at`].
//!
//! Heap order: for every non-root position `i` with parent `p`,
//! `dist[heap[p]] <= dist[heap[i]]`.

use crate::graph::VertexId;

/// Marks a vertex that is not (or no longer) in the heap.
const NOT_OPEN: usize = usize::MAX;

/// The open set of a search: vertices not yet finalized.
#[derive(Clone, Debug)]
pub struct OpenHeap {
    heap: Vec<VertexId>,
    // heap position of each vertex, or NOT_OPEN
    pos: Vec<usize>,
}

#[inline]
fn parent(i: usize) -> usize {
    (i - 1) / 2
}

#[inline]
fn left_child(i: usize) -> usize {
    2 * i + 1
}

#[inline]
fn right_child(i: usize) -> usize {
    2 * i + 2
}

impl OpenHeap {
    /// Build a heap holding every vertex `0..dist.len()`, keyed by `dist`.
    pub fn new(dist: &[f64]) -> Self {
        let n = dist.len();
        let mut h = Self {
            heap: (0..n).map(VertexId).collect(),
            pos: (0..n).collect(),
        };
        for i in (0..n / 2).rev() {
            h.sift_down(i, dist);
        }
        h
    }

    /// Whether no vertices remain open.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of open vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// The open vertex with the smallest distance, without removing it.
    #[inline]
    pub fn peek_min(&self) -> Option<VertexId> {
        self.heap.first().copied()
    }

    /// Remove and return the open vertex with the smallest distance.
    ///
    /// Ties are broken arbitrarily.
    pub fn pop_min(&mut self, dist: &[f64]) -> Option<VertexId> {
        let last = self.heap.len().checked_sub(1)?;
        self.swap(0, last);
        let top = self.heap.pop()?;
        self.pos[top.0] = NOT_OPEN;
        if !self.heap.is_empty() {
            self.sift_down(0, dist);
        }
        Some(top)
    }

    /// Whether `v` is still open.
    #[inline]
    pub fn contains(&self, v: VertexId) -> bool {
        self.position_of(v).is_some()
    }

    /// Heap position of `v`, read from the position index.
    #[inline]
    pub fn position_of(&self, v: VertexId) -> Option<usize> {
        self.pos.get(v.0).copied().filter(|&p| p != NOT_OPEN)
    }

    /// Locate `needle` by searching the tree from the root.
    ///
    /// Must be called while the heap is still ordered, i.e. before the
    /// needle's distance is lowered.
    pub fn find_index(&self, needle: VertexId, dist: &[f64]) -> Option<usize> {
        self.find_index_from(needle, 0, dist)
    }

    /// Locate `needle` in the subtree rooted at `finger`.
    ///
    /// A subtree whose root is already farther than the needle cannot hold
    /// the needle, so it is skipped.
    pub fn find_index_from(&self, needle: VertexId, finger: usize, dist: &[f64]) -> Option<usize> {
        let &candidate = self.heap.get(finger)?;
        if candidate == needle {
            return Some(finger);
        }
        let key = *dist.get(needle.0)?;
        if dist[candidate.0] > key {
            return None;
        }
        self.find_index_from(needle, left_child(finger), dist)
            .or_else(|| self.find_index_from(needle, right_child(finger), dist))
    }

    /// Restore heap order after the key of the vertex at `position` was
    /// changed in place.
    ///
    /// Sifts up, then down; at most one of the two moves anything.
    /// Out-of-range positions are ignored.
    pub fn revalidate_at(&mut self, position: usize, dist: &[f64]) {
        if position >= self.heap.len() {
            return;
        }
        let settled = self.sift_up(position, dist);
        self.sift_down(settled, dist);
    }

    /// Whether the heap order holds for `dist`.
    pub fn is_ordered(&self, dist: &[f64]) -> bool {
        (1..self.heap.len()).all(|i| dist[self.heap[parent(i)].0] <= dist[self.heap[i].0])
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.pos[self.heap[a].0] = a;
        self.pos[self.heap[b].0] = b;
    }

    #[inline]
    fn key(&self, i: usize, dist: &[f64]) -> f64 {
        dist[self.heap[i].0]
    }

    /// Move the element at `i` toward the root; returns its final position.
    fn sift_up(&mut self, mut i: usize, dist: &[f64]) -> usize {
        while i > 0 {
            let p = parent(i);
            if self.key(i, dist) < self.key(p, dist) {
                self.swap(i, p);
                i = p;
            } else {
                break;
            }
        }
        i
    }

    fn sift_down(&mut self, mut i: usize, dist: &[f64]) {
        let n = self.heap.len();
        loop {
            let l = left_child(i);
            if l >= n {
                return;
            }
            let r = right_child(i);
            let smaller = if r < n && self.key(r, dist) < self.key(l, dist) {
                r
            } else {
                l
            };
            if self.key(smaller, dist) < self.key(i, dist) {
                self.swap(i, smaller);
                i = smaller;
            } else {
                return;
            }
        }
    }
}
