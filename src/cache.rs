use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::dashboard::Dashboard;

pub type ContentKey = [u8; 32];

pub fn content_key(bytes: &[u8]) -> ContentKey {
    Sha256::digest(bytes).into()
}

/// Dashboards keyed by the SHA-256 of the uploaded file.
///
/// Identical bytes reuse the stored dashboard; any other content is built
/// and stored under its own key. Entries are never invalidated.
#[derive(Debug, Default)]
pub struct DashboardCache {
    entries: HashMap<ContentKey, Arc<Dashboard>>,
    hits: usize,
    misses: usize,
}

impl DashboardCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build<F, E>(&mut self, bytes: &[u8], build: F) -> Result<Arc<Dashboard>, E>
    where
        F: FnOnce(&[u8]) -> Result<Dashboard, E>,
    {
        let key = content_key(bytes);
        if let Some(dashboard) = self.entries.get(&key) {
            self.hits += 1;
            debug!(hits = self.hits, "dashboard cache hit");
            return Ok(Arc::clone(dashboard));
        }

        self.misses += 1;
        debug!(misses = self.misses, bytes = bytes.len(), "dashboard cache miss");
        let dashboard = Arc::new(build(bytes)?);
        self.entries.insert(key, Arc::clone(&dashboard));
        Ok(dashboard)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use crate::team::TeamAssigner;

    const CSV_A: &[u8] = b"Name,Email,Score\nAna,ana@x.com,90\n";
    const CSV_B: &[u8] = b"Name,Email,Score\nAna,ana@x.com,91\n";

    fn build(bytes: &[u8]) -> Result<Dashboard, LoadError> {
        Dashboard::from_csv(bytes, &TeamAssigner::new())
    }

    #[test]
    fn identical_content_is_built_once() {
        let mut cache = DashboardCache::new();
        let first = cache.get_or_build(CSV_A, build).unwrap();
        let second = cache.get_or_build(CSV_A, build).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn different_content_misses() {
        let mut cache = DashboardCache::new();
        let a = cache.get_or_build(CSV_A, build).unwrap();
        let b = cache.get_or_build(CSV_B, build).unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(a.overview.scores.overall, Some(90.0));
        assert_eq!(b.overview.scores.overall, Some(91.0));
    }

    #[test]
    fn failed_builds_are_not_stored() {
        let mut cache = DashboardCache::new();
        let result = cache.get_or_build(b"Name,Email,Score\n", build);

        assert!(matches!(result, Err(LoadError::EmptyDataset)));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn keys_are_content_hashes() {
        assert_eq!(content_key(CSV_A), content_key(CSV_A));
        assert_ne!(content_key(CSV_A), content_key(CSV_B));
    }
}
