// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, FixedOffset};
use url::Url;

use crate::error::FeedError;

/// Channel title used when the feed does not carry one
pub const DEFAULT_CHANNEL_TITLE: &str = "Untitled Podcast";

/// Represents a parsed podcast feed
#[derive(Debug, Clone)]
pub struct Feed {
    pub title: String,
    /// Episodes sorted ascending by publish date; ties keep feed order
    pub episodes: Vec<Episode>,
}

/// A single validated, downloadable episode.
///
/// Only items with a non-empty title, a parseable publish date and a valid
/// enclosure URL become episodes; everything else is dropped during parsing.
#[derive(Debug, Clone)]
pub struct Episode {
    pub title: String,
    pub published_at: DateTime<FixedOffset>,
    pub media_url: Url,
    /// Declared enclosure length in bytes, 0 if the feed does not report one
    pub size_bytes: u64,
}

/// Parse RSS feed XML bytes into a Feed
pub fn parse_feed(xml_bytes: &[u8]) -> Result<Feed, FeedError> {
    let channel = rss::Channel::read_from(xml_bytes)?;

    let mut episodes: Vec<Episode> = channel.items().iter().filter_map(parse_episode).collect();

    // Vec::sort_by_key is stable, so same-date items keep their feed order
    episodes.sort_by_key(|episode| episode.published_at);

    let title = normalize_title(channel.title())
        .unwrap_or_else(|| DEFAULT_CHANNEL_TITLE.to_string());

    Ok(Feed { title, episodes })
}

/// Validate one feed item. Returns None for items that are missing a title,
/// a parseable date or an enclosure URL; those never enter the system.
fn parse_episode(item: &rss::Item) -> Option<Episode> {
    let title = normalize_title(item.title()?)?;

    let published_at = parse_pub_date(item.pub_date()?)?;

    let enclosure = item.enclosure()?;
    let media_url = Url::parse(enclosure.url()).ok()?;
    let size_bytes = enclosure.length().parse().unwrap_or(0);

    Some(Episode {
        title,
        published_at,
        media_url,
        size_bytes,
    })
}

/// Decode HTML entities and trim; None if nothing readable remains
fn normalize_title(raw: &str) -> Option<String> {
    let decoded = html_escape::decode_html_entities(raw);
    let trimmed = decoded.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a pubDate string, RFC 2822 first, then common non-conforming formats
fn parse_pub_date(date_str: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(date_str) {
        return Some(dt);
    }

    let formats = [
        "%a, %d %b %Y %H:%M:%S %z",
        "%Y-%m-%dT%H:%M:%S%:z",
        "%Y-%m-%d %H:%M:%S %z",
    ];

    formats
        .iter()
        .find_map(|format| DateTime::parse_from_str(date_str, format).ok())
}
