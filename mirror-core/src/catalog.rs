// mirror_core/src/catalog.rs
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::archive::PathTranslator;
use crate::domain::{FileDescriptor, Retrieved};
use crate::error::{MirrorError, Result};
use crate::read::extract::extract_zip;
use crate::repo::{RemoteFile, RemoteResource, ResourceParent};
use crate::source::Source;
use crate::util::uri::{relative, uri_last};

#[derive(Clone, Debug, Deserialize)]
struct CatalogDoc {
    source: String,
    resources: Vec<ResourceDoc>,
}

#[derive(Clone, Debug, Deserialize)]
struct ResourceDoc {
    urn: String,
    uri: String,
    label: String,
    #[serde(default)]
    parent_files: Vec<FileDescriptor>,
    files: Vec<FileDoc>,
}

#[derive(Clone, Debug, Deserialize)]
struct FileDoc {
    path: String,
    #[serde(default)]
    uri: Option<String>,
}

/// Resource listing read from a JSON document, backed by a `Source`.
#[derive(Debug)]
pub struct Catalog {
    source: Source,
    translator: PathTranslator,
    resources: Vec<ResourceDoc>,
}

impl Catalog {
    pub fn load(path: &Path, translator: PathTranslator) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| MirrorError::Config(format!("catalog {}: {e}", path.display())))?;
        let base = path.parent().unwrap_or(Path::new("."));
        Self::from_json(&raw, base, translator)
    }

    pub fn from_json(raw: &str, base_dir: &Path, translator: PathTranslator) -> Result<Self> {
        let doc: CatalogDoc = serde_json::from_str(raw)?;
        Ok(Self {
            source: Source::parse(&doc.source, base_dir)?,
            translator,
            resources: doc.resources,
        })
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn urns(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().map(|r| r.urn.as_str())
    }

    pub fn resource(&self, urn: &str) -> Result<CatalogResource<'_>> {
        self.resources
            .iter()
            .find(|r| r.urn == urn)
            .map(|doc| CatalogResource { catalog: self, doc })
            .ok_or_else(|| MirrorError::UnknownResource(urn.to_string()))
    }
}

pub struct CatalogResource<'a> {
    catalog: &'a Catalog,
    doc: &'a ResourceDoc,
}

impl<'a> CatalogResource<'a> {
    /// Look up one file by server path.
    pub fn file(&self, server_path: &str) -> Result<CatalogFile<'a>> {
        self.doc
            .files
            .iter()
            .find(|f| f.path == server_path)
            .map(|f| self.make_file(f))
            .transpose()?
            .ok_or_else(|| MirrorError::UnknownFile(server_path.to_string()))
    }

    fn make_file(&self, f: &'a FileDoc) -> Result<CatalogFile<'a>> {
        let uri = match &f.uri {
            Some(u) => u.clone(),
            None => {
                let root = self.catalog.translator.resource_server_root(self)?;
                let name = relative(&f.path, &root).unwrap_or_else(|| uri_last(&f.path));
                format!("{}/files/{name}", self.doc.uri.trim_end_matches('/'))
            }
        };
        Ok(CatalogFile {
            source: &self.catalog.source,
            server_path: &f.path,
            uri,
            local_path: self.catalog.translator.local_path(&f.path)?,
        })
    }
}

struct CatalogParent<'a>(&'a [FileDescriptor]);

impl ResourceParent for CatalogParent<'_> {
    fn file_descriptors(&self) -> Result<Vec<FileDescriptor>> {
        Ok(self.0.to_vec())
    }
}

impl RemoteResource for CatalogResource<'_> {
    fn urn(&self) -> &str {
        &self.doc.urn
    }

    fn uri(&self) -> &str {
        &self.doc.uri
    }

    fn label(&self) -> &str {
        &self.doc.label
    }

    fn files(&self) -> Result<Vec<Box<dyn RemoteFile + '_>>> {
        self.doc
            .files
            .iter()
            .map(|f| Ok(Box::new(self.make_file(f)?) as Box<dyn RemoteFile + '_>))
            .collect()
    }

    fn parent(&self) -> Result<Box<dyn ResourceParent + '_>> {
        Ok(Box::new(CatalogParent(&self.doc.parent_files)))
    }

    fn fetch(&self, dest: &Path, extract: bool) -> Result<Retrieved> {
        let root = self.catalog.translator.resource_server_root(self)?;
        let paths: Vec<&str> = self.doc.files.iter().map(|f| f.path.as_str()).collect();
        let name = format!("{}.zip", uri_last(&self.doc.uri));
        info!(resource = %self.doc.urn, extract, dest = %dest.display(), "catalog: bulk fetch");

        if !extract {
            let out = dest.join(name);
            self.catalog
                .source
                .fetch_resource_zip(&self.doc.uri, &root, &paths, &out)?;
            return Ok(Retrieved::Zip(out));
        }

        let staging = tempfile::tempdir()?;
        let zip_path = staging.path().join(name);
        self.catalog
            .source
            .fetch_resource_zip(&self.doc.uri, &root, &paths, &zip_path)?;
        Ok(Retrieved::Files(extract_zip(&zip_path, dest, 1)?))
    }
}

pub struct CatalogFile<'a> {
    source: &'a Source,
    server_path: &'a str,
    uri: String,
    local_path: PathBuf,
}

impl CatalogFile<'_> {
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl RemoteFile for CatalogFile<'_> {
    fn server_path(&self) -> &str {
        self.server_path
    }

    fn local_path(&self) -> &Path {
        &self.local_path
    }

    fn fetch(&self, dest: &Path) -> Result<()> {
        self.source.fetch_file(self.server_path, &self.uri, dest)
    }
}
