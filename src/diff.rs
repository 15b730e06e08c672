use futures::future::join_all;

use crate::episode::episode_path;
use crate::error::DiffError;
use crate::feed::{Episode, Feed};
use crate::progress::{ProgressEvent, SharedProgressReporter};
use crate::sync::SyncOptions;

/// Normalized closeness of two byte sizes: `1 - |a - b| / (a + b)`.
///
/// Defined as 0.0 when both sizes are zero; a zero-length file is never
/// evidence of a completed download.
pub fn size_similarity(a: u64, b: u64) -> f64 {
    if a == 0 && b == 0 {
        return 0.0;
    }
    let (a, b) = (a as f64, b as f64);
    1.0 - (a - b).abs() / (a + b)
}

/// Decide whether a local file already represents this episode.
///
/// A file at the target path counts as downloaded when its on-disk size is
/// within the similarity threshold of the declared enclosure length. A
/// below-threshold file is reported as a SizeMismatch diagnostic and treated
/// as missing.
pub async fn is_downloaded(
    feed: &Feed,
    episode: &Episode,
    options: &SyncOptions,
    reporter: &SharedProgressReporter,
) -> Result<bool, DiffError> {
    let path = episode_path(&options.root, &feed.title, episode);

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(DiffError::StatFailed { path, source: e }),
    };

    let similarity = size_similarity(metadata.len(), episode.size_bytes);
    if similarity >= options.similarity_threshold {
        return Ok(true);
    }

    reporter.report(ProgressEvent::SizeMismatch {
        episode_title: episode.title.clone(),
        local_bytes: metadata.len(),
        declared_bytes: episode.size_bytes,
        similarity,
    });

    Ok(false)
}

/// Return the episodes not yet present locally, in feed order.
///
/// Existence checks run concurrently within fixed-size batches; one batch
/// must complete before the next starts, which bounds the number of stats
/// in flight. `join_all` yields results in input order, so the missing list
/// preserves the feed's ascending-date order no matter which check within a
/// batch finishes first. A failed stat fails the whole diff.
pub async fn filter_missing(
    feed: &Feed,
    options: &SyncOptions,
    reporter: &SharedProgressReporter,
) -> Result<Vec<Episode>, DiffError> {
    let mut missing = Vec::new();

    // chunks panics on a zero chunk size
    let batch_size = options.batch_size.max(1);

    for batch in feed.episodes.chunks(batch_size) {
        let checks = batch
            .iter()
            .map(|episode| is_downloaded(feed, episode, options, reporter));

        for (episode, downloaded) in batch.iter().zip(join_all(checks).await) {
            if !downloaded? {
                missing.push(episode.clone());
            }
        }
    }

    Ok(missing)
}
