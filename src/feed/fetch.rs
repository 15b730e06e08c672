// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use crate::error::FeedError;
use crate::http::HttpClient;

use super::parse::{Feed, parse_feed};

/// Fetch and parse a podcast feed from a URL.
///
/// Transport failures propagate as-is; there is no retry at this boundary.
pub async fn fetch_feed<C: HttpClient>(client: &C, url: &str) -> Result<Feed, FeedError> {
    let bytes = client
        .get_bytes(url)
        .await
        .map_err(|e| FeedError::FetchFailed {
            url: url.to_string(),
            source: e,
        })?;
    parse_feed(&bytes)
}

/// Parse a podcast feed from a local RSS file
pub fn parse_feed_file(path: &Path) -> Result<Feed, FeedError> {
    let bytes = std::fs::read(path).map_err(|e| FeedError::FileReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_feed(&bytes)
}

/// Determine if a feed source is a URL or a file path
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
