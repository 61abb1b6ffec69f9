//! Shortest paths along the edges of triangle meshes.
//!
//! This crate turns a triangle soup into an undirected vertex/edge graph and
//! answers shortest-path queries on it:
//!
//! - **Graph construction** with exact vertex deduplication ([`MeshGraph::from_triangles`])
//! - **Dijkstra** single-pair search over an indexed min-heap ([`MeshGraph::dijkstra`])
//! - **Query resolution** from coordinates or indices ([`MeshGraph::resolve`], [`Query`])
//! - **Connected components** labelling ([`MeshGraph::components`])
//! - **One-shot entry points** ([`calculate_path`], [`calculate_path_by_index`])
//!
//! Edge weights are Euclidean distances between endpoints. The graph is
//! immutable once built; every search keeps its own labels, so a graph can be
//! queried any number of times.
//!
//! # Diagnostics
//!
//! | Type | Role |
//! |---|---|
//! | [`SearchRecorder`] | Receives a [`SearchStats`] when a search ends |
//! | [`NoopRecorder`] | Discards stats |
//! | [`LogRecorder`] | Forwards stats to the `log` facade |
//!
//! Any `FnMut(&SearchStats)` closure is also a recorder.

mod calculate;
mod cc;
mod dijkstra;
mod graph;
mod heap;
mod resolve;
mod result;
mod stats;
mod traits;

pub use calculate::{
    PathConfig, Query, calculate_path, calculate_path_by_index, calculate_path_with,
};
pub use cc::Components;
pub use graph::{MeshGraph, Vertex, VertexId};
pub use heap::OpenHeap;
pub use resolve::{DEFAULT_TOLERANCE, PathError, ResolveConfig};
pub use result::{MarkerStyle, PathResult, PathVertex};
pub use stats::{LogRecorder, NoopRecorder, SearchOutcome, SearchStats};
pub use traits::SearchRecorder;
