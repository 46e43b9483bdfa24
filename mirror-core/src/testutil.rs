use std::cell::Cell;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::domain::{FileDescriptor, Retrieved};
use crate::error::{MirrorError, Result};
use crate::pack::writer::{ZipEntry, entry_name, write_zip};
use crate::repo::{RemoteFile, RemoteResource, ResourceParent};
use crate::util::uri::{dirname, join_local, relative, uri_last};

pub struct FakeFile {
    server_path: String,
    local_path: PathBuf,
    content: Vec<u8>,
    pub fetches: Cell<usize>,
}

impl RemoteFile for FakeFile {
    fn server_path(&self) -> &str {
        &self.server_path
    }

    fn local_path(&self) -> &Path {
        &self.local_path
    }

    fn fetch(&self, dest: &Path) -> Result<()> {
        self.fetches.set(self.fetches.get() + 1);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, &self.content)?;
        Ok(())
    }
}

struct FakeParent<'a>(&'a [FileDescriptor]);

impl ResourceParent for FakeParent<'_> {
    fn file_descriptors(&self) -> Result<Vec<FileDescriptor>> {
        Ok(self.0.to_vec())
    }
}

/// In-memory resource; bulk fetches write the file contents it was built with.
pub struct FakeResource {
    urn: String,
    uri: String,
    label: String,
    descriptors: Vec<FileDescriptor>,
    pub files: Vec<FakeFile>,
    pub bulk_fetches: Cell<usize>,
}

impl FakeResource {
    pub fn new(urn: &str, uri: &str, label: &str) -> Self {
        Self {
            urn: urn.into(),
            uri: uri.into(),
            label: label.into(),
            descriptors: Vec::new(),
            files: Vec::new(),
            bulk_fetches: Cell::new(0),
        }
    }

    pub fn with_descriptor(mut self, label: &str, uri: &str) -> Self {
        self.descriptors.push(FileDescriptor {
            label: label.into(),
            uri: uri.into(),
        });
        self
    }

    pub fn with_file(mut self, server_path: &str, local_path: impl Into<PathBuf>, content: &[u8]) -> Self {
        self.files.push(FakeFile {
            server_path: server_path.into(),
            local_path: local_path.into(),
            content: content.to_vec(),
            fetches: Cell::new(0),
        });
        self
    }

    pub fn total_fetches(&self) -> usize {
        self.files.iter().map(|f| f.fetches.get()).sum()
    }

    fn server_root(&self) -> Result<String> {
        self.descriptors
            .iter()
            .find(|d| d.label == self.label)
            .map(|d| dirname(&d.uri).to_string())
            .ok_or_else(|| MirrorError::MissingDescriptor {
                label: self.label.clone(),
            })
    }
}

impl RemoteResource for FakeResource {
    fn urn(&self) -> &str {
        &self.urn
    }

    fn uri(&self) -> &str {
        &self.uri
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn files(&self) -> Result<Vec<Box<dyn RemoteFile + '_>>> {
        Ok(self
            .files
            .iter()
            .map(|f| Box::new(f) as Box<dyn RemoteFile + '_>)
            .collect())
    }

    fn parent(&self) -> Result<Box<dyn ResourceParent + '_>> {
        Ok(Box::new(FakeParent(&self.descriptors)))
    }

    fn fetch(&self, dest: &Path, extract: bool) -> Result<Retrieved> {
        self.bulk_fetches.set(self.bulk_fetches.get() + 1);
        let root = self.server_root()?;
        let staging = tempfile::tempdir()?;
        let mut written = Vec::new();
        let mut entries = Vec::new();
        for f in &self.files {
            let rel = relative(&f.server_path, &root).unwrap_or(&f.server_path);
            let base = if extract { dest } else { staging.path() };
            let p = join_local(base, rel);
            if let Some(parent) = p.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&p, &f.content)?;
            entries.push(ZipEntry::new(&p, entry_name(&[uri_last(&root), rel])));
            written.push(p);
        }
        if extract {
            return Ok(Retrieved::Files(written));
        }
        let out = dest.join(format!("{}.zip", uri_last(&self.uri)));
        write_zip(&out, &entries)?;
        Ok(Retrieved::Zip(out))
    }
}

pub fn zip_names(path: &Path) -> Vec<String> {
    let mut z = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    (0..z.len())
        .map(|i| z.by_index(i).unwrap().name().to_string())
        .collect()
}
