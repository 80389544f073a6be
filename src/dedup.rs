//! New-vs-seen partitioning of a fetched batch.

use std::collections::HashSet;

use tracing::info;

use crate::jobs::JobRecord;
use crate::store::{SeenStore, StoreError};

/// Result of classifying one batch. Both halves keep fetch order.
#[derive(Debug, Default)]
pub struct Classification {
    pub new: Vec<JobRecord>,
    pub seen: Vec<JobRecord>,
}

/// Drop records whose id already appeared earlier in the batch, keeping the first.
pub fn collapse_duplicates(batch: Vec<JobRecord>) -> Vec<JobRecord> {
    let mut ids = HashSet::with_capacity(batch.len());
    batch
        .into_iter()
        .filter(|job| ids.insert(job.id.clone()))
        .collect()
}

/// Split `batch` into records not yet in `store` and records already there,
/// then commit the new ids with a single `mark_seen` call.
///
/// If the commit fails nothing is returned; the caller must not report the
/// batch as new without it being persisted.
pub fn classify(
    batch: Vec<JobRecord>,
    store: &mut dyn SeenStore,
) -> Result<Classification, StoreError> {
    let mut result = Classification::default();
    let mut pending: Vec<String> = Vec::new();
    let mut pending_set: HashSet<String> = HashSet::new();

    for job in batch {
        if store.contains(&job.id) || pending_set.contains(&job.id) {
            result.seen.push(job);
        } else {
            pending_set.insert(job.id.clone());
            pending.push(job.id.clone());
            result.new.push(job);
        }
    }

    if pending.is_empty() {
        info!("No new jobs found");
    } else {
        store.mark_seen(&pending)?;
        info!("Found {} new jobs", result.new.len());
    }

    Ok(result)
}
