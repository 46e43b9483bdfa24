use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorStats {
    pub files_fetched: u64,
    pub files_present: u64,
    pub bulk_fetches: u64,
    pub zips_built: u64,
    pub files_copied: u64,
}

/// Live counters behind a strategy; `snapshot` yields a `MirrorStats`.
#[derive(Debug, Default)]
pub struct Counters {
    files_fetched: AtomicU64,
    files_present: AtomicU64,
    bulk_fetches: AtomicU64,
    zips_built: AtomicU64,
    files_copied: AtomicU64,
}

impl Counters {
    pub fn fetched(&self) {
        self.files_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn present(&self) {
        self.files_present.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bulk(&self) {
        self.bulk_fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn zipped(&self) {
        self.zips_built.fetch_add(1, Ordering::Relaxed);
    }

    pub fn copied(&self, n: u64) {
        self.files_copied.fetch_add(n, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MirrorStats {
        MirrorStats {
            files_fetched: self.files_fetched.load(Ordering::Relaxed),
            files_present: self.files_present.load(Ordering::Relaxed),
            bulk_fetches: self.bulk_fetches.load(Ordering::Relaxed),
            zips_built: self.zips_built.load(Ordering::Relaxed),
            files_copied: self.files_copied.load(Ordering::Relaxed),
        }
    }
}
