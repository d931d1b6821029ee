//! Checksum lookup abstraction.
//!
//! Builders ask a [`ChecksumSource`] for extra digests of each file
//! (typically read from sidecar files next to it). The filesystem-backed
//! implementation lives in the application crate; [`MemoryChecksums`]
//! serves tests and callers that already hold digests.

use std::collections::{BTreeMap, HashMap};

use crate::models::{ChecksumAlgorithm, ObjectFileDescriptor};

/// Source of checksums for staged files.
///
/// Implementations return only unambiguous digests: when more than one
/// candidate exists for an algorithm, that algorithm is left out.
pub trait ChecksumSource {
    fn checksums_for(
        &self,
        descriptor: &ObjectFileDescriptor,
    ) -> BTreeMap<ChecksumAlgorithm, String>;
}

/// Source that never finds anything.
pub struct NoChecksums;

impl ChecksumSource for NoChecksums {
    fn checksums_for(&self, _: &ObjectFileDescriptor) -> BTreeMap<ChecksumAlgorithm, String> {
        BTreeMap::new()
    }
}

/// In-memory source keyed by relative path.
#[derive(Debug, Default)]
pub struct MemoryChecksums {
    entries: HashMap<String, BTreeMap<ChecksumAlgorithm, String>>,
}

impl MemoryChecksums {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, relative_path: &str, algorithm: ChecksumAlgorithm, digest: &str) {
        self.entries
            .entry(relative_path.to_string())
            .or_default()
            .insert(algorithm, digest.to_string());
    }
}

impl ChecksumSource for MemoryChecksums {
    fn checksums_for(
        &self,
        descriptor: &ObjectFileDescriptor,
    ) -> BTreeMap<ChecksumAlgorithm, String> {
        self.entries
            .get(&descriptor.relative_path)
            .cloned()
            .unwrap_or_default()
    }
}

/// Descriptor digests merged with looked-up ones; the descriptor wins.
pub fn merged_checksums(
    descriptor: &ObjectFileDescriptor,
    source: &dyn ChecksumSource,
) -> BTreeMap<ChecksumAlgorithm, String> {
    let mut checksums = source.checksums_for(descriptor);
    for (algorithm, digest) in &descriptor.checksums {
        checksums.insert(*algorithm, digest.clone());
    }
    checksums
}
