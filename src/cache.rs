//! Incremental regeneration skip.
//!
//! Generation is deterministic, so a single SHA-256 manifest over every input
//! header (path and content) decides whether the output directory is already
//! current. The manifest lives next to the generated files; deleting it
//! forces a full regeneration, as does `--force`.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

const MANIFEST_NAME: &str = ".bindgen_manifest";

pub struct IncrementalCache {
    manifest_path: PathBuf,
}

impl IncrementalCache {
    pub fn new(output_dir: &Path) -> Self {
        IncrementalCache {
            manifest_path: output_dir.join(MANIFEST_NAME),
        }
    }

    /// Hashes every `(path, content)` pair in order. Paths participate so a
    /// renamed header invalidates the manifest even with identical content.
    pub fn compute_manifest(inputs: &[(String, String)]) -> String {
        let mut hasher = Sha256::new();
        for (path, content) in inputs {
            hasher.update(path.as_bytes());
            hasher.update([0u8]);
            hasher.update(content.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }

    pub fn is_fresh(&self, manifest: &str) -> bool {
        match fs::read_to_string(&self.manifest_path) {
            Ok(stored) => stored.trim() == manifest,
            Err(_) => false,
        }
    }

    pub fn store(&self, manifest: &str) {
        // Failure to persist the manifest only costs a regeneration.
        fs::write(&self.manifest_path, manifest).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_changes_with_content_and_path() {
        let base = vec![("a.h".to_string(), "class A;".to_string())];
        let renamed = vec![("b.h".to_string(), "class A;".to_string())];
        let edited = vec![("a.h".to_string(), "class B;".to_string())];

        let manifest = IncrementalCache::compute_manifest(&base);
        assert_eq!(manifest, IncrementalCache::compute_manifest(&base));
        assert_ne!(manifest, IncrementalCache::compute_manifest(&renamed));
        assert_ne!(manifest, IncrementalCache::compute_manifest(&edited));
    }

    #[test]
    fn fresh_only_after_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = IncrementalCache::new(dir.path());
        let manifest = IncrementalCache::compute_manifest(&[("a.h".into(), "x".into())]);

        assert!(!cache.is_fresh(&manifest));
        cache.store(&manifest);
        assert!(cache.is_fresh(&manifest));
        assert!(!cache.is_fresh("different"));
    }
}
