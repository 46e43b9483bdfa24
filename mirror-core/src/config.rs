use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::archive::PathTranslator;
use crate::error::{MirrorError, Result};
use crate::repo_factory::Backend;

/// Order of the two steps when the incremental mirror copies a resource out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyOrder {
    /// Complete the mirror, then copy the tree.
    #[default]
    FillThenCopy,
    /// Copy whatever tree is present, then complete the mirror. Files fetched by the
    /// second step are not in the copy.
    Legacy,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub rootdir: PathBuf,
    pub archive_root: Option<String>,
    pub backend: Backend,
    pub copy_order: CopyOrder,
    /// Hole-fill resources whose local root is already a directory instead of
    /// bulk-fetching them again. Off unless set.
    pub reconcile_directories: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            rootdir: PathBuf::from("/"),
            archive_root: None,
            backend: Backend::default(),
            copy_order: CopyOrder::default(),
            reconcile_directories: false,
        }
    }
}

impl ArchiveConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| MirrorError::Config(format!("{}: {e}", path.display())))?;
        let cfg: ArchiveConfig = serde_json::from_str(&raw)?;
        if cfg.rootdir.as_os_str().is_empty() {
            return Err(MirrorError::Config("rootdir must not be empty".into()));
        }
        Ok(cfg)
    }

    pub fn translator(&self) -> PathTranslator {
        PathTranslator::new(self.rootdir.clone(), self.archive_root.clone())
    }
}
