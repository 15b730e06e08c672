mod fetch;
mod parse;

pub use fetch::{fetch_feed, is_url, parse_feed_file};
pub use parse::{DEFAULT_CHANNEL_TITLE, Episode, Feed, parse_feed};
