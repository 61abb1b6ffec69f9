//! **meshpath-core**: core types for path finding on triangle meshes.
//!
//! This crate provides the types shared across the *meshpath* workspace:
//! 3D points and triangles, plus reading and writing of STL meshes.

pub mod geom;
pub mod stl;

pub use geom::{Point3, Triangle, distance};
pub use stl::{StlError, StlFormat, StlMesh, parse_stl, read_stl, write_ascii_stl, write_binary_stl};
