pub mod bench;
pub mod path;
