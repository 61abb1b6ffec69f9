use std::io;
use std::path::PathBuf;

use meshpath_core::StlError;
use meshpath_paths::PathError;
use thiserror::Error;

/// Everything that can make a command fail.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Stl(#[from] StlError),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{} contains no triangles", .0.display())]
    EmptyMesh(PathBuf),
}

impl CliError {
    pub(crate) fn write(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| CliError::Write { path, source }
    }
}
