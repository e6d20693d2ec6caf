use parking_lot::Mutex;
use tracing::warn;

use crate::services::phash::PerceptualHash;

/// Outcome of comparing one candidate against every registered hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateCheck {
    pub is_duplicate: bool,
    /// Smallest distance to a registered hash; `None` when nothing was comparable
    /// (empty index, or every comparison was skipped).
    pub min_distance: Option<u32>,
}

struct IndexEntry {
    raw: String,
    parsed: Option<PerceptualHash>,
}

/// Append-only history of perceptual hashes seen by the service.
///
/// Scanning for near-duplicates and registering the candidate happen under a
/// single lock acquisition, so two concurrent submissions of the same image
/// cannot both miss each other.
#[derive(Default)]
pub struct PhashIndex {
    entries: Mutex<Vec<IndexEntry>>,
}

impl PhashIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `candidate` against every registered hash, then register it.
    ///
    /// The candidate is appended whatever the outcome, including when it is
    /// malformed. Comparisons that cannot be made (bad hex, width mismatch)
    /// are skipped and logged.
    pub fn check_and_register(&self, candidate: &str, threshold: u32) -> DuplicateCheck {
        let parsed = match PerceptualHash::from_hex(candidate) {
            Ok(hash) => Some(hash),
            Err(e) => {
                warn!(candidate = %candidate, error = %e, "Malformed candidate hash, skipping duplicate scan");
                None
            }
        };

        let mut entries = self.entries.lock();

        let mut min_distance: Option<u32> = None;
        if let Some(ref hash) = parsed {
            for entry in entries.iter() {
                let Some(ref existing) = entry.parsed else {
                    continue;
                };
                match hash.distance(existing) {
                    Ok(d) => min_distance = Some(min_distance.map_or(d, |m| m.min(d))),
                    Err(e) => {
                        warn!(stored = %entry.raw, error = %e, "Skipping incomparable stored hash");
                    }
                }
            }
        }

        entries.push(IndexEntry {
            raw: candidate.to_string(),
            parsed,
        });
        metrics::gauge!("kyc_phash_index_size").set(entries.len() as f64);

        DuplicateCheck {
            is_duplicate: min_distance.is_some_and(|d| d <= threshold),
            min_distance,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered hashes in insertion order.
    pub fn snapshot(&self) -> Vec<String> {
        self.entries.lock().iter().map(|e| e.raw.clone()).collect()
    }
}
