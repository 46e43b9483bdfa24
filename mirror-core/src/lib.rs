#![forbid(unsafe_code)]

pub mod error;
pub mod config;

pub mod util {
    pub mod uri;
}

pub mod archive;
pub mod domain;
pub mod repo;
pub mod repo_factory;

pub mod direct;
pub mod mirror;

pub mod pack {
    pub mod writer;
}

pub mod read {
    pub mod extract;
}

pub mod catalog;
pub mod list;
pub mod source;
pub mod stats;

#[cfg(test)]
mod testutil;

// Re-exports: stable API surface
pub use archive::PathTranslator;
pub use catalog::Catalog;
pub use config::{ArchiveConfig, CopyOrder};
pub use direct::DirectArchive;
pub use domain::{FileDescriptor, MirrorState, Retrieved};
pub use mirror::IncrementalMirror;
pub use repo::{MirrorStrategy, RemoteFile, RemoteResource, ResourceParent};
pub use repo_factory::{Backend, open_archive};
