use std::path::{Path, PathBuf};

use crate::feed::Episode;

/// Normalize arbitrary display text to a filesystem- and URL-safe slug.
///
/// Hyphens count as word separators, diacritics are folded to their ASCII
/// base form, and any run of remaining non-alphanumeric characters collapses
/// into a single space. The result is lowercase and carries no leading or
/// trailing whitespace.
pub fn slug(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut pending_separator = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        if let Some(folded) = fold_diacritic(c) {
            push_word(&mut result, folded, &mut pending_separator);
        } else if c.is_alphanumeric() {
            let mut buf = [0u8; 4];
            push_word(&mut result, c.encode_utf8(&mut buf), &mut pending_separator);
        } else {
            pending_separator = true;
        }
    }

    result
}

fn push_word(result: &mut String, word: &str, pending_separator: &mut bool) {
    if *pending_separator && !result.is_empty() {
        result.push(' ');
    }
    *pending_separator = false;
    result.push_str(word);
}

/// ASCII base form for accented Latin characters (input is already lowercase)
fn fold_diacritic(c: char) -> Option<&'static str> {
    Some(match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' => "i",
        'ł' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => "o",
        'ŕ' | 'ř' => "r",
        'ś' | 'š' => "s",
        'ť' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        'æ' => "ae",
        'œ' => "oe",
        'ß' => "ss",
        'þ' => "th",
        _ => return None,
    })
}

/// File name for an episode: "<channel> <YYYY-MM-DD> <title>.mp3"
pub fn episode_filename(channel_title: &str, episode: &Episode) -> String {
    format!(
        "{} {} {}.mp3",
        slug(channel_title),
        episode.published_at.format("%Y-%m-%d"),
        slug(&episode.title)
    )
}

/// Target path for an episode: "<root>/<channel>/<filename>".
///
/// Pure and deterministic; the same (channel, episode) pair always maps to
/// the same path. Same-day episodes with identical titles collide.
/// Directory creation is left to the download pipeline.
pub fn episode_path(root: &Path, channel_title: &str, episode: &Episode) -> PathBuf {
    root.join(slug(channel_title))
        .join(episode_filename(channel_title, episode))
}
