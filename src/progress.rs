use std::sync::Arc;

/// Events emitted during a synchronization pass for progress reporting
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Feed is being fetched from a URL or read from a file
    FetchingFeed { source: String },

    /// Feed has been parsed and validated
    FeedParsed {
        channel_title: String,
        episode_count: usize,
    },

    /// The local directory has been diffed against the feed
    DiffCompleted { missing_count: usize },

    /// A local file exists at the expected path but its size does not match
    /// the declared enclosure length closely enough to count as downloaded
    SizeMismatch {
        episode_title: String,
        local_bytes: u64,
        declared_bytes: u64,
        similarity: f64,
    },

    /// A download is starting
    DownloadStarting {
        episode_title: String,
        /// Index of this episode in the download queue (0-based)
        episode_index: usize,
        /// Total number of episodes to download
        total_to_download: usize,
        /// Expected content length in bytes, if known
        content_length: Option<u64>,
    },

    /// Download progress update
    DownloadProgress {
        episode_title: String,
        bytes_downloaded: u64,
        total_bytes: Option<u64>,
    },

    /// A download completed successfully
    DownloadCompleted {
        episode_title: String,
        bytes_downloaded: u64,
    },

    /// Sync pass completed
    SyncCompleted { downloaded_count: usize },
}

/// Trait for reporting progress events during synchronization.
///
/// Implementations can use this to display progress bars, log messages,
/// or collect statistics.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {
        // Intentionally empty
    }
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_reporter_handles_all_events() {
        let reporter = NoopReporter;

        reporter.report(ProgressEvent::FetchingFeed {
            source: "https://example.com/feed.xml".to_string(),
        });

        reporter.report(ProgressEvent::FeedParsed {
            channel_title: "Test Podcast".to_string(),
            episode_count: 10,
        });

        reporter.report(ProgressEvent::DiffCompleted { missing_count: 4 });

        reporter.report(ProgressEvent::SizeMismatch {
            episode_title: "Episode 1".to_string(),
            local_bytes: 900,
            declared_bytes: 1000,
            similarity: 0.947,
        });

        reporter.report(ProgressEvent::DownloadStarting {
            episode_title: "Episode 1".to_string(),
            episode_index: 0,
            total_to_download: 4,
            content_length: Some(1024),
        });

        reporter.report(ProgressEvent::DownloadProgress {
            episode_title: "Episode 1".to_string(),
            bytes_downloaded: 512,
            total_bytes: Some(1024),
        });

        reporter.report(ProgressEvent::DownloadCompleted {
            episode_title: "Episode 1".to_string(),
            bytes_downloaded: 1024,
        });

        reporter.report(ProgressEvent::SyncCompleted { downloaded_count: 4 });
    }
}
