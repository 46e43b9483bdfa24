use std::path::{Path, PathBuf};

use crate::error::{MirrorError, Result};
use crate::repo::RemoteResource;
use crate::util::uri::{dirname, join_local};

/// Maps archive paths (as the server names them) onto a local mirror root.
///
/// Without an archive root every path is appended verbatim under `rootdir`.
/// With one, that prefix is required and replaced by `rootdir`.
#[derive(Clone, Debug)]
pub struct PathTranslator {
    rootdir: PathBuf,
    archive_root: Option<String>,
}

impl PathTranslator {
    pub fn new(rootdir: impl Into<PathBuf>, archive_root: Option<String>) -> Self {
        Self {
            rootdir: rootdir.into(),
            archive_root: archive_root.filter(|r| !r.is_empty()),
        }
    }

    pub fn rootdir(&self) -> &Path {
        &self.rootdir
    }

    pub fn archive_root(&self) -> Option<&str> {
        self.archive_root.as_deref()
    }

    pub fn local_path(&self, archive_path: &str) -> Result<PathBuf> {
        let rest = match &self.archive_root {
            None => archive_path,
            Some(root) => archive_path.strip_prefix(root.as_str()).ok_or_else(|| {
                MirrorError::InvalidPath {
                    path: archive_path.to_string(),
                    root: root.clone(),
                }
            })?,
        };
        Ok(join_local(&self.rootdir, rest))
    }

    /// Server directory holding `resource`: the dirname of the URI of the parent's
    /// first file descriptor carrying the resource's label.
    pub fn resource_server_root(&self, resource: &dyn RemoteResource) -> Result<String> {
        let label = resource.label();
        let descriptor = resource
            .parent()?
            .file_descriptors()?
            .into_iter()
            .find(|d| d.label == label)
            .ok_or_else(|| MirrorError::MissingDescriptor {
                label: label.to_string(),
            })?;
        Ok(dirname(&descriptor.uri).to_string())
    }

    pub fn resource_local_root(&self, resource: &dyn RemoteResource) -> Result<PathBuf> {
        self.local_path(&self.resource_server_root(resource)?)
    }
}
