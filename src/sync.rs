// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use crate::diff::filter_missing;
use crate::episode::{DownloadContext, download_episode};
use crate::error::SyncError;
use crate::feed::{fetch_feed, is_url, parse_feed_file};
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};

/// Configuration for a sync pass
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Directory the per-channel episode directories live under
    pub root: PathBuf,
    /// Number of concurrent existence checks per batch
    pub batch_size: usize,
    /// Minimum size similarity for a local file to count as downloaded
    pub similarity_threshold: f64,
    /// Maximum number of episodes to download (None = all)
    pub limit: Option<usize>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./podcasts"),
            batch_size: 20,
            similarity_threshold: 0.98,
            limit: None,
        }
    }
}

/// Outcome of a completed sync pass
#[derive(Debug, Clone)]
pub struct SyncSummary {
    /// Channel title from the feed
    pub channel_title: String,
    /// Number of valid episodes in the feed
    pub total_episodes: usize,
    /// Number of episodes downloaded this pass
    pub downloaded: usize,
    /// Number of episodes already present locally
    pub skipped: usize,
}

/// Run one fetch-diff-download pass.
///
/// Fetches and parses the feed, diffs it against the local directory in
/// batches, then downloads each missing episode sequentially in ascending
/// publish-date order. The first transport or filesystem error aborts the
/// pass; whatever was downloaded up to that point stays on disk and is
/// skipped on the next invocation.
pub async fn sync_podcast<C: HttpClient>(
    client: &C,
    feed_source: &str,
    options: &SyncOptions,
    reporter: SharedProgressReporter,
) -> Result<SyncSummary, SyncError> {
    reporter.report(ProgressEvent::FetchingFeed {
        source: feed_source.to_string(),
    });

    let feed = if is_url(feed_source) {
        fetch_feed(client, feed_source).await?
    } else {
        parse_feed_file(Path::new(feed_source))?
    };

    reporter.report(ProgressEvent::FeedParsed {
        channel_title: feed.title.clone(),
        episode_count: feed.episodes.len(),
    });

    let missing = filter_missing(&feed, options, &reporter).await?;

    reporter.report(ProgressEvent::DiffCompleted {
        missing_count: missing.len(),
    });

    let total_episodes = feed.episodes.len();
    let skipped = total_episodes - missing.len();

    let to_download: Vec<_> = match options.limit {
        Some(limit) => missing.into_iter().take(limit).collect(),
        None => missing,
    };

    let total_to_download = to_download.len();

    // One download at a time, oldest episode first
    for (episode_index, episode) in to_download.iter().enumerate() {
        let context = DownloadContext {
            episode_index,
            total_to_download,
        };

        download_episode(
            client,
            &options.root,
            &feed.title,
            episode,
            &context,
            &reporter,
        )
        .await?;
    }

    reporter.report(ProgressEvent::SyncCompleted {
        downloaded_count: total_to_download,
    });

    Ok(SyncSummary {
        channel_title: feed.title,
        total_episodes,
        downloaded: total_to_download,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::http::{ByteStream, HttpResponse};
    use crate::progress::{NoopReporter, ProgressReporter};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[derive(Clone)]
    struct MockHttpClient {
        feed_xml: String,
        audio_data: Vec<u8>,
    }

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn get_bytes(&self, url: &str) -> Result<Bytes, reqwest::Error> {
            if url.contains("feed") {
                Ok(Bytes::from(self.feed_xml.clone()))
            } else {
                Ok(Bytes::from(self.audio_data.clone()))
            }
        }

        async fn get_stream(&self, _url: &str) -> Result<HttpResponse, reqwest::Error> {
            let data = self.audio_data.clone();
            let len = data.len() as u64;

            let stream: ByteStream =
                Box::pin(futures::stream::once(async move { Ok(Bytes::from(data)) }));

            Ok(HttpResponse {
                status: 200,
                content_length: Some(len),
                body: stream,
            })
        }
    }

    struct OrderReporter {
        started: Mutex<Vec<String>>,
    }

    impl OrderReporter {
        fn shared() -> std::sync::Arc<Self> {
            std::sync::Arc::new(Self {
                started: Mutex::new(Vec::new()),
            })
        }
    }

    impl ProgressReporter for OrderReporter {
        fn report(&self, event: ProgressEvent) {
            if let ProgressEvent::DownloadStarting { episode_title, .. } = event {
                self.started.lock().unwrap().push(episode_title);
            }
        }
    }

    // Three valid items, deliberately out of date order, plus one item
    // without an enclosure. The declared lengths match the mock audio body
    // ("fake audio content", 18 bytes) so a second pass skips everything.
    const SAMPLE_FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Test Podcast</title>
    <description>A test podcast</description>
    <item>
      <title>Episode A</title>
      <pubDate>Mon, 01 Jan 2024 12:00:00 +0000</pubDate>
      <enclosure url="https://example.com/a.mp3" length="18" type="audio/mpeg"/>
    </item>
    <item>
      <title>Episode C</title>
      <pubDate>Wed, 03 Jan 2024 12:00:00 +0000</pubDate>
      <enclosure url="https://example.com/c.mp3" length="18" type="audio/mpeg"/>
    </item>
    <item>
      <title>Episode B</title>
      <pubDate>Tue, 02 Jan 2024 12:00:00 +0000</pubDate>
      <enclosure url="https://example.com/b.mp3" length="18" type="audio/mpeg"/>
    </item>
    <item>
      <title>Broken Item</title>
      <pubDate>Thu, 04 Jan 2024 12:00:00 +0000</pubDate>
    </item>
  </channel>
</rss>"#;

    fn make_client() -> MockHttpClient {
        MockHttpClient {
            feed_xml: SAMPLE_FEED.to_string(),
            audio_data: b"fake audio content".to_vec(),
        }
    }

    fn make_options(root: &std::path::Path) -> SyncOptions {
        SyncOptions {
            root: root.to_path_buf(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn sync_downloads_missing_episodes_in_date_order() {
        let dir = tempdir().unwrap();
        let client = make_client();

        let reporter = OrderReporter::shared();
        let shared: SharedProgressReporter = reporter.clone();

        let summary = sync_podcast(
            &client,
            "https://example.com/feed.xml",
            &make_options(dir.path()),
            shared,
        )
        .await
        .unwrap();

        assert_eq!(summary.channel_title, "Test Podcast");
        assert_eq!(summary.total_episodes, 3);
        assert_eq!(summary.downloaded, 3);
        assert_eq!(summary.skipped, 0);

        // The invalid item never reaches the pipeline; valid items download
        // oldest first regardless of feed order
        let started = reporter.started.lock().unwrap().clone();
        assert_eq!(started, ["Episode A", "Episode B", "Episode C"]);

        let channel_dir = dir.path().join("test podcast");
        assert!(
            channel_dir
                .join("test podcast 2024-01-01 episode a.mp3")
                .exists()
        );
        assert!(
            channel_dir
                .join("test podcast 2024-01-02 episode b.mp3")
                .exists()
        );
        assert!(
            channel_dir
                .join("test podcast 2024-01-03 episode c.mp3")
                .exists()
        );
    }

    #[tokio::test]
    async fn second_sync_skips_everything() {
        let dir = tempdir().unwrap();
        let client = make_client();
        let options = make_options(dir.path());

        sync_podcast(
            &client,
            "https://example.com/feed.xml",
            &options,
            NoopReporter::shared(),
        )
        .await
        .unwrap();

        let summary = sync_podcast(
            &client,
            "https://example.com/feed.xml",
            &options,
            NoopReporter::shared(),
        )
        .await
        .unwrap();

        assert_eq!(summary.downloaded, 0);
        assert_eq!(summary.skipped, 3);
    }

    #[tokio::test]
    async fn sync_respects_limit() {
        let dir = tempdir().unwrap();
        let client = make_client();

        let options = SyncOptions {
            limit: Some(1),
            ..make_options(dir.path())
        };

        let summary = sync_podcast(
            &client,
            "https://example.com/feed.xml",
            &options,
            NoopReporter::shared(),
        )
        .await
        .unwrap();

        // Only the oldest missing episode is fetched
        assert_eq!(summary.downloaded, 1);
        assert!(
            dir.path()
                .join("test podcast")
                .join("test podcast 2024-01-01 episode a.mp3")
                .exists()
        );
    }

    #[tokio::test]
    async fn sync_reads_local_feed_files() {
        let dir = tempdir().unwrap();
        let feed_path = dir.path().join("feed.xml");
        std::fs::write(&feed_path, SAMPLE_FEED).unwrap();

        let client = make_client();
        let options = make_options(&dir.path().join("out"));

        let summary = sync_podcast(
            &client,
            feed_path.to_str().unwrap(),
            &options,
            NoopReporter::shared(),
        )
        .await
        .unwrap();

        assert_eq!(summary.downloaded, 3);
    }
}
