use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{MirrorError, Result};

/// One file to place in a zip: where it is on disk and what it is called inside.
#[derive(Clone, Debug)]
pub struct ZipEntry {
    pub src: PathBuf,
    pub name: String,
}

impl ZipEntry {
    pub fn new(src: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            name: name.into(),
        }
    }
}

/// Join name parts into a POSIX relative entry name.
pub fn entry_name(parts: &[&str]) -> String {
    parts
        .iter()
        .flat_map(|p| p.split('/'))
        .filter(|p| !p.is_empty() && *p != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Create the directory a zip will be written into. An existing directory is fine.
pub fn prepare_dest_dir(dir: &Path) -> Result<()> {
    match fs::create_dir(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir)?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Write `entries` into a fresh zip at `out` with default options. The archive is
/// finished and closed before this returns. Returns the number of entries written.
pub fn write_zip(out: &Path, entries: &[ZipEntry]) -> Result<usize> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        prepare_dest_dir(parent)?;
    }

    let mut zip = ZipWriter::new(File::create(out)?);
    let options = SimpleFileOptions::default();

    for e in entries {
        if e.name.is_empty() || e.name.starts_with('/') {
            return Err(MirrorError::UnsafeEntry(e.name.clone()));
        }
        debug!(entry = %e.name, src = %e.src.display(), "zip: add");
        let mut src = BufReader::new(File::open(&e.src)?);
        zip.start_file(e.name.as_str(), options)?;
        io::copy(&mut src, &mut zip)?;
    }

    let f = zip.finish()?;
    f.sync_all()?;
    Ok(entries.len())
}
