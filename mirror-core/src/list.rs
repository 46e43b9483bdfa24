use std::fs;
use std::path::Path;

use crate::archive::PathTranslator;
use crate::domain::{FileStatus, MirrorState};
use crate::error::Result;
use crate::repo::RemoteResource;

pub fn mirror_state(local_root: &Path) -> MirrorState {
    match fs::metadata(local_root) {
        Ok(md) if md.is_file() => MirrorState::Packed,
        Ok(md) if md.is_dir() => MirrorState::Directory,
        _ => MirrorState::Absent,
    }
}

/// Presence of every file of `resource` in the local mirror, in listing order.
pub fn status(translator: &PathTranslator, resource: &dyn RemoteResource) -> Result<(MirrorState, Vec<FileStatus>)> {
    let state = mirror_state(&translator.resource_local_root(resource)?);
    let rows = resource
        .files()?
        .iter()
        .map(|f| FileStatus {
            server_path: f.server_path().to_string(),
            local_path: f.local_path().to_path_buf(),
            present: f.local_path().exists(),
        })
        .collect();
    Ok((state, rows))
}
