use std::path::Path;

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::DownloadError;
use crate::feed::Episode;
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};

use super::path::episode_path;

/// Position of a download within the current sync pass
#[derive(Debug, Clone)]
pub struct DownloadContext {
    /// Index of this episode in the download queue (0-based)
    pub episode_index: usize,
    /// Total number of episodes to download
    pub total_to_download: usize,
}

/// Download an episode to its target path under `root`.
///
/// Streams the response body to disk, creating missing parent directories
/// first. There is no retry and no rollback; a partial file is only detected
/// by the size check on the next sync pass. Returns the number of bytes
/// written on success.
pub async fn download_episode<C: HttpClient>(
    client: &C,
    root: &Path,
    channel_title: &str,
    episode: &Episode,
    context: &DownloadContext,
    reporter: &SharedProgressReporter,
) -> Result<u64, DownloadError> {
    let url = episode.media_url.as_str();
    let output_path = episode_path(root, channel_title, episode);

    let response = client
        .get_stream(url)
        .await
        .map_err(|e| DownloadError::HttpFailed {
            url: url.to_string(),
            source: e,
        })?;

    if response.status >= 400 {
        return Err(DownloadError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    reporter.report(ProgressEvent::DownloadStarting {
        episode_title: episode.title.clone(),
        episode_index: context.episode_index,
        total_to_download: context.total_to_download,
        content_length: response.content_length,
    });

    if let Some(parent) = output_path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            DownloadError::DirectoryCreateFailed {
                path: parent.to_path_buf(),
                source: e,
            }
        })?;
    }

    let mut file = File::create(&output_path)
        .await
        .map_err(|e| DownloadError::FileCreateFailed {
            path: output_path.clone(),
            source: e,
        })?;

    let mut bytes_downloaded: u64 = 0;
    let mut stream = response.body;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::StreamFailed {
            url: url.to_string(),
            source: e,
        })?;

        file.write_all(&chunk)
            .await
            .map_err(|e| DownloadError::FileWriteFailed {
                path: output_path.clone(),
                source: e,
            })?;

        bytes_downloaded += chunk.len() as u64;

        reporter.report(ProgressEvent::DownloadProgress {
            episode_title: episode.title.clone(),
            bytes_downloaded,
            total_bytes: response.content_length,
        });
    }

    file.flush()
        .await
        .map_err(|e| DownloadError::FileWriteFailed {
            path: output_path.clone(),
            source: e,
        })?;

    reporter.report(ProgressEvent::DownloadCompleted {
        episode_title: episode.title.clone(),
        bytes_downloaded,
    });

    Ok(bytes_downloaded)
}
