use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::archive::PathTranslator;
use crate::config::CopyOrder;
use crate::direct::rel_to_root;
use crate::domain::{MirrorState, Retrieved};
use crate::error::{MirrorError, Result};
use crate::list::mirror_state;
use crate::pack::writer::{ZipEntry, prepare_dest_dir, write_zip};
use crate::read::extract::extract_zip;
use crate::repo::{MirrorStrategy, RemoteFile, RemoteResource};
use crate::stats::{Counters, MirrorStats};
use crate::util::uri::{join_local, uri_last};

/// Strategy treating local storage as a cache that is filled on demand, file by
/// file, or in bulk when a resource has never been materialized.
///
/// Callers must serialize access per mirror root: presence checks and fetches
/// are not atomic.
#[derive(Debug)]
pub struct IncrementalMirror {
    translator: PathTranslator,
    copy_order: CopyOrder,
    reconcile_directories: bool,
    counters: Counters,
}

impl IncrementalMirror {
    pub fn new(translator: PathTranslator) -> Self {
        Self {
            translator,
            copy_order: CopyOrder::default(),
            reconcile_directories: false,
            counters: Counters::default(),
        }
    }

    pub fn with_copy_order(mut self, order: CopyOrder) -> Self {
        self.copy_order = order;
        self
    }

    pub fn with_reconcile_directories(mut self, yes: bool) -> Self {
        self.reconcile_directories = yes;
        self
    }

    fn ensure_file(&self, file: &dyn RemoteFile) -> Result<PathBuf> {
        let local = file.local_path();
        if local.exists() {
            self.counters.present();
        } else {
            debug!(server = file.server_path(), local = %local.display(), "mirror: fetching");
            file.fetch(local)?;
            self.counters.fetched();
        }
        Ok(local.to_path_buf())
    }

    fn fill_files(&self, files: &[Box<dyn RemoteFile + '_>]) -> Result<Vec<PathBuf>> {
        files.iter().map(|f| self.ensure_file(f.as_ref())).collect()
    }

    /// Fetch only the files of `resource` missing from the mirror. Never prunes.
    pub fn fill_resource_holes(&self, resource: &dyn RemoteResource) -> Result<Vec<PathBuf>> {
        self.fill_files(&resource.files()?)
    }

    /// Whether `state` is served by hole-filling rather than a bulk fetch.
    fn fills_holes(&self, state: MirrorState) -> bool {
        match state {
            MirrorState::Packed => true,
            MirrorState::Directory => self.reconcile_directories,
            MirrorState::Absent => false,
        }
    }

    /// Make every file of `resource` present locally and return their paths.
    pub fn resource_files(&self, resource: &dyn RemoteResource) -> Result<Vec<PathBuf>> {
        let local_root = self.translator.resource_local_root(resource)?;
        let state = mirror_state(&local_root);
        if self.fills_holes(state) {
            debug!(resource = resource.urn(), ?state, "mirror: filling holes");
            return self.fill_resource_holes(resource);
        }

        info!(resource = resource.urn(), root = %local_root.display(), "mirror: bulk fetch");
        self.counters.bulk();
        match resource.fetch(&local_root, true)? {
            Retrieved::Files(paths) => Ok(paths),
            Retrieved::Zip(p) => Err(MirrorError::Fetch(format!(
                "bulk extract of {} returned archive {}",
                resource.urn(),
                p.display()
            ))),
        }
    }

    fn copy_resource(&self, resource: &dyn RemoteResource, dest_dir: &Path) -> Result<Vec<PathBuf>> {
        let local_root = self.translator.resource_local_root(resource)?;
        if self.fills_holes(mirror_state(&local_root)) {
            return self.copy_filled(resource, &local_root, dest_dir);
        }

        let files = match self.copy_order {
            CopyOrder::FillThenCopy => {
                let files = self.resource_files(resource)?;
                self.copy_tree(&local_root, dest_dir)?;
                files
            }
            CopyOrder::Legacy => {
                self.copy_tree(&local_root, dest_dir)?;
                self.resource_files(resource)?
            }
        };

        files
            .iter()
            .map(|p| {
                p.strip_prefix(&local_root)
                    .map(|rel| dest_dir.join(rel))
                    .map_err(|_| MirrorError::OutsideRoot {
                        path: p.display().to_string(),
                        root: local_root.display().to_string(),
                    })
            })
            .collect()
    }

    /// Copy-out for hole-filled resources. Their cached files need not live under
    /// the local root, so targets are named by server path relative to the
    /// resource's server root.
    fn copy_filled(
        &self,
        resource: &dyn RemoteResource,
        local_root: &Path,
        dest_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        let root = self.translator.resource_server_root(resource)?;
        let files = resource.files()?;
        if self.copy_order == CopyOrder::Legacy {
            self.copy_tree(local_root, dest_dir)?;
        }
        let paths = self.fill_files(&files)?;
        let fill_then_copy = self.copy_order == CopyOrder::FillThenCopy;
        if fill_then_copy {
            self.copy_tree(local_root, dest_dir)?;
        }

        let mut out = Vec::with_capacity(paths.len());
        let mut copied = 0u64;
        for (f, p) in files.iter().zip(paths) {
            let target = join_local(dest_dir, rel_to_root(f.server_path(), &root)?);
            // Cached outside the local root, so the tree copy did not reach it.
            if fill_then_copy && !target.exists() {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(&p, &target)?;
                copied += 1;
            }
            out.push(target);
        }
        self.counters.copied(copied);
        Ok(out)
    }

    /// Recursive copy of a mirrored directory; a root that is not a directory copies nothing.
    fn copy_tree(&self, src: &Path, dest: &Path) -> Result<u64> {
        if !src.is_dir() {
            debug!(src = %src.display(), "mirror: nothing to copy");
            return Ok(0);
        }
        let mut n = 0u64;
        for e in WalkDir::new(src).follow_links(false) {
            let e = e?;
            let rel = e.path().strip_prefix(src).unwrap_or(e.path());
            let outp = dest.join(rel);
            if e.file_type().is_dir() {
                fs::create_dir_all(&outp)?;
            } else if e.file_type().is_file() {
                fs::copy(e.path(), &outp)?;
                n += 1;
            }
        }
        self.counters.copied(n);
        Ok(n)
    }

    fn zip_resource(&self, resource: &dyn RemoteResource, dest_dir: &Path) -> Result<PathBuf> {
        let local_root = self.translator.resource_local_root(resource)?;
        let state = mirror_state(&local_root);

        if !self.fills_holes(state) {
            return self.fetch_zip(resource, &local_root, dest_dir);
        }

        let files = resource.files()?;
        let paths = self.fill_files(&files)?;
        let root = self.translator.resource_server_root(resource)?;
        let entries = files
            .iter()
            .zip(paths)
            .map(|(f, p)| Ok(ZipEntry::new(p, rel_to_root(f.server_path(), &root)?)))
            .collect::<Result<Vec<_>>>()?;

        let zip_location = dest_dir.join(format!("{}.zip", uri_last(resource.uri())));
        let n = write_zip(&zip_location, &entries)?;
        self.counters.zipped();
        info!(resource = resource.urn(), entries = n, zip = %zip_location.display(), "mirror: zipped resource");
        Ok(zip_location)
    }

    /// Let the server build the zip, then unpack it into the mirror as a side effect.
    fn fetch_zip(&self, resource: &dyn RemoteResource, local_root: &Path, dest_dir: &Path) -> Result<PathBuf> {
        prepare_dest_dir(dest_dir)?;
        info!(resource = resource.urn(), dest = %dest_dir.display(), "mirror: bulk zip fetch");
        self.counters.bulk();
        let zip_path = match resource.fetch(dest_dir, false)? {
            Retrieved::Zip(p) => p,
            Retrieved::Files(_) => {
                return Err(MirrorError::Fetch(format!(
                    "bulk zip fetch of {} returned a directory listing",
                    resource.urn()
                )));
            }
        };
        let parent = local_root.parent().unwrap_or(local_root);
        let written = extract_zip(&zip_path, parent, 0)?;
        debug!(files = written.len(), into = %parent.display(), "mirror: populated from zip");
        Ok(zip_path)
    }
}

impl MirrorStrategy for IncrementalMirror {
    fn get_file(&self, file: &dyn RemoteFile) -> Result<PathBuf> {
        self.ensure_file(file)
    }

    fn get_resource(
        &self,
        resource: &dyn RemoteResource,
        extract: bool,
        dest_dir: Option<&Path>,
    ) -> Result<Retrieved> {
        match (extract, dest_dir) {
            (true, Some(dest)) => self.copy_resource(resource, dest).map(Retrieved::Files),
            (true, None) => self.resource_files(resource).map(Retrieved::Files),
            (false, dest) => self
                .zip_resource(resource, dest.unwrap_or(Path::new(".")))
                .map(Retrieved::Zip),
        }
    }

    fn translator(&self) -> &PathTranslator {
        &self.translator
    }

    fn stats(&self) -> MirrorStats {
        self.counters.snapshot()
    }
}
