// mirror_core/src/domain.rs
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File descriptor listed on a resource's parent: the resource label plus
/// the server-side URI of its catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub label: String,
    pub uri: String,
}

/// What a resource retrieval produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Retrieved {
    /// Materialized files, one per resource file.
    Files(Vec<PathBuf>),
    /// A closed zip archive.
    Zip(PathBuf),
}

impl Retrieved {
    pub fn paths(&self) -> Vec<PathBuf> {
        match self {
            Retrieved::Files(v) => v.clone(),
            Retrieved::Zip(p) => vec![p.clone()],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileStatus {
    pub server_path: String,
    pub local_path: PathBuf,
    pub present: bool,
}

/// How a resource's local root looks on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MirrorState {
    Absent,
    Directory,
    /// A file occupies the root path, e.g. a previously downloaded zip.
    Packed,
}
