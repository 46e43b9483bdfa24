use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use zip::ZipArchive;

use crate::error::{MirrorError, Result};

/// Extract every file entry of the zip at `archive` below `dest`, dropping the
/// first `strip_components` components of each entry name. Returns the written
/// paths in archive order.
pub fn extract_zip(archive: &Path, dest: &Path, strip_components: usize) -> Result<Vec<PathBuf>> {
    let mut zip = ZipArchive::new(BufReader::new(File::open(archive)?))?;
    fs::create_dir_all(dest)?;

    let mut written = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let rel = safe_rel(entry.name())?;
        let Some(rel) = strip(&rel, strip_components) else {
            continue;
        };
        let outp = dest.join(&rel);

        if entry.is_dir() {
            fs::create_dir_all(&outp)?;
            continue;
        }
        if let Some(parent) = outp.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&outp)?;
        io::copy(&mut entry, &mut out)?;
        debug!(path = %outp.display(), "extract: wrote");
        written.push(outp);
    }
    Ok(written)
}

fn safe_rel(name: &str) -> Result<PathBuf> {
    let p = Path::new(name);
    let mut out = PathBuf::new();
    for c in p.components() {
        match c {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            _ => return Err(MirrorError::UnsafeEntry(name.to_string())),
        }
    }
    Ok(out)
}

fn strip(rel: &Path, n: usize) -> Option<PathBuf> {
    let rest: PathBuf = rel.components().skip(n).collect();
    if rest.as_os_str().is_empty() {
        None
    } else {
        Some(rest)
    }
}
