use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::archive::PathTranslator;
use crate::domain::Retrieved;
use crate::error::{MirrorError, Result};
use crate::pack::writer::{ZipEntry, entry_name, write_zip};
use crate::repo::{MirrorStrategy, RemoteFile, RemoteResource};
use crate::stats::{Counters, MirrorStats};
use crate::util::uri::{join_local, relative};

/// Strategy for an archive whose storage is already visible on the local
/// filesystem. Nothing is ever fetched.
#[derive(Debug)]
pub struct DirectArchive {
    translator: PathTranslator,
    counters: Counters,
}

impl DirectArchive {
    pub fn new(translator: PathTranslator) -> Self {
        Self {
            translator,
            counters: Counters::default(),
        }
    }

    fn copy_resource(&self, resource: &dyn RemoteResource, dest_dir: &Path) -> Result<Vec<PathBuf>> {
        let root = self.translator.resource_server_root(resource)?;
        let mut paths = Vec::new();
        for f in resource.files()? {
            let rel = rel_to_root(f.server_path(), &root)?;
            let path = join_local(dest_dir, rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(f.local_path(), &path)?;
            debug!(src = %f.local_path().display(), dst = %path.display(), "direct: copied");
            paths.push(path);
        }
        self.counters.copied(paths.len() as u64);
        Ok(paths)
    }

    fn zip_resource(&self, resource: &dyn RemoteResource, dest_dir: &Path) -> Result<PathBuf> {
        let root = self.translator.resource_server_root(resource)?;
        let urn = resource.urn();
        let entries = resource
            .files()?
            .iter()
            .map(|f| {
                let rel = rel_to_root(f.server_path(), &root)?;
                Ok(ZipEntry::new(f.local_path(), entry_name(&[urn, rel])))
            })
            .collect::<Result<Vec<_>>>()?;

        let zip_location = dest_dir.join(format!("{urn}.zip"));
        let n = write_zip(&zip_location, &entries)?;
        self.counters.zipped();
        info!(resource = urn, entries = n, zip = %zip_location.display(), "direct: zipped resource");
        Ok(zip_location)
    }
}

impl MirrorStrategy for DirectArchive {
    fn get_file(&self, file: &dyn RemoteFile) -> Result<PathBuf> {
        Ok(file.local_path().to_path_buf())
    }

    fn get_resource(
        &self,
        resource: &dyn RemoteResource,
        extract: bool,
        dest_dir: Option<&Path>,
    ) -> Result<Retrieved> {
        match (extract, dest_dir) {
            (true, Some(dest)) => self.copy_resource(resource, dest).map(Retrieved::Files),
            (true, None) => Ok(Retrieved::Files(
                resource
                    .files()?
                    .iter()
                    .map(|f| f.local_path().to_path_buf())
                    .collect(),
            )),
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

pub(crate) fn rel_to_root<'a>(server_path: &'a str, root: &str) -> Result<&'a str> {
    relative(server_path, root).ok_or_else(|| MirrorError::OutsideRoot {
        path: server_path.to_string(),
        root: root.to_string(),
    })
}
