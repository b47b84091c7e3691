use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Detects saves by polling modification times.
///
/// A path that appears, disappears or gets a new mtime counts as changed.
#[derive(Debug, Default)]
pub struct MtimeWatcher {
    seen: BTreeMap<PathBuf, Option<SystemTime>>,
}

impl MtimeWatcher {
    pub fn new<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut watcher = Self::default();
        watcher.retarget(paths);
        watcher
    }

    /// Replaces the watched set; current mtimes become the baseline.
    pub fn retarget<I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.seen = paths
            .into_iter()
            .map(|path| {
                let mtime = modified(&path);
                (path, mtime)
            })
            .collect();
    }

    pub fn poll(&mut self) -> Vec<PathBuf> {
        let mut changed = Vec::new();
        for (path, last) in &mut self.seen {
            let current = modified(path);
            if current != *last {
                *last = current;
                changed.push(path.clone());
            }
        }
        changed
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}
