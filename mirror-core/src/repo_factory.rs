use serde::{Deserialize, Serialize};

use crate::config::ArchiveConfig;
use crate::direct::DirectArchive;
use crate::mirror::IncrementalMirror;
use crate::repo::MirrorStrategy;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Archive storage is mounted locally.
    Direct,
    /// Local storage is a cache filled from the server.
    #[default]
    Mirror,
}

pub fn open_archive(cfg: &ArchiveConfig) -> Box<dyn MirrorStrategy> {
    match cfg.backend {
        Backend::Direct => Box::new(DirectArchive::new(cfg.translator())),
        Backend::Mirror => Box::new(
            IncrementalMirror::new(cfg.translator())
                .with_copy_order(cfg.copy_order)
                .with_reconcile_directories(cfg.reconcile_directories),
        ),
    }
}
