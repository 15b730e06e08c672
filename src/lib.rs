pub mod diff;
pub mod episode;
pub mod error;
pub mod feed;
pub mod http;
pub mod progress;
pub mod sync;

// Re-export main types for convenience
pub use diff::{filter_missing, is_downloaded, size_similarity};
pub use episode::{download_episode, episode_filename, episode_path, slug};
pub use error::{DiffError, DownloadError, FeedError, SyncError};
pub use feed::{Episode, Feed, fetch_feed, is_url, parse_feed, parse_feed_file};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use progress::{NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter};
pub use sync::{SyncOptions, SyncSummary, sync_podcast};
