// mirror_core/src/repo.rs
use crate::domain::{FileDescriptor, Retrieved};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// A remote file handle provided by the metadata layer.
pub trait RemoteFile {
    /// Canonical server-side path.
    fn server_path(&self) -> &str;

    /// Where this file lives in the local mirror.
    fn local_path(&self) -> &Path;

    /// Download to `dest`, creating parent directories as needed.
    fn fetch(&self, dest: &Path) -> Result<()>;
}

/// Owner of a resource; lists file descriptors used to locate the resource's server root.
pub trait ResourceParent {
    fn file_descriptors(&self) -> Result<Vec<FileDescriptor>>;
}

/// A named collection of remote files.
pub trait RemoteResource {
    fn urn(&self) -> &str;

    fn uri(&self) -> &str;

    fn label(&self) -> &str;

    fn files(&self) -> Result<Vec<Box<dyn RemoteFile + '_>>>;

    fn parent(&self) -> Result<Box<dyn ResourceParent + '_>>;

    /// Bulk download. With `extract` the resource is materialized as a directory at
    /// `dest` and the written files are returned; otherwise a zip is written into
    /// `dest` and its path returned.
    fn fetch(&self, dest: &Path, extract: bool) -> Result<Retrieved>;
}

/// Capability shared by the direct-access and incremental-mirror strategies.
pub trait MirrorStrategy: Send + Sync {
    fn get_file(&self, file: &dyn RemoteFile) -> Result<PathBuf>;

    fn get_resource(
        &self,
        resource: &dyn RemoteResource,
        extract: bool,
        dest_dir: Option<&Path>,
    ) -> Result<Retrieved>;

    fn translator(&self) -> &crate::archive::PathTranslator;

    fn stats(&self) -> crate::stats::MirrorStats;
}

impl<T: RemoteFile + ?Sized> RemoteFile for &T {
    fn server_path(&self) -> &str {
        (**self).server_path()
    }

    fn local_path(&self) -> &Path {
        (**self).local_path()
    }

    fn fetch(&self, dest: &Path) -> Result<()> {
        (**self).fetch(dest)
    }
}
