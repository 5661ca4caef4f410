//! Hashtag and keyword extraction from free text.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Default cap on the number of hashtags kept from model output.
pub const DEFAULT_HASHTAG_LIMIT: usize = 10;

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+").expect("hashtag pattern is valid"));

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").expect("word pattern is valid"));

/// Words that never become keywords.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "are", "this", "that", "from", "about", "your", "you", "our", "their", "it's", "its",
];

/// Every `#tag` in `text`, de-duplicated in first-seen order, at most
/// `limit` of them.
#[must_use]
pub fn extract_hashtags(text: &str, limit: usize) -> Vec<String> {
    dedup(HASHTAG_RE.find_iter(text).map(|m| m.as_str().to_string()))
        .into_iter()
        .take(limit)
        .collect()
}

/// Lowercase words longer than three characters that are not stop words,
/// in order of appearance.
#[must_use]
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|w| w.chars().count() > 3 && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Turn a keyword into a hashtag: `"solar power"` becomes `#SolarPower`.
#[must_use]
pub fn keyword_to_hashtag(keyword: &str) -> String {
    let mut tag = String::from("#");
    for word in keyword.split_whitespace() {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            tag.extend(first.to_uppercase());
            tag.push_str(&chars.as_str().to_lowercase());
        }
    }
    tag
}

/// Drop repeats while keeping the first occurrence of each item.
pub(crate) fn dedup<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_and_dedups_in_order() {
        let tags = extract_hashtags("#AI #tech, #AI\n#future_now and more #tech", 10);
        assert_eq!(tags, ["#AI", "#tech", "#future_now"]);
    }

    #[test]
    fn respects_limit() {
        let text = (0..20).map(|i| format!("#t{i}")).collect::<Vec<_>>().join(" ");
        assert_eq!(extract_hashtags(&text, DEFAULT_HASHTAG_LIMIT).len(), 10);
    }

    #[test]
    fn comma_separated_tags_work() {
        assert_eq!(extract_hashtags("#Inspire, #Growth, #Now", 10), ["#Inspire", "#Growth", "#Now"]);
    }

    #[test]
    fn no_tags_is_empty() {
        assert!(extract_hashtags("nothing to see", 10).is_empty());
    }

    #[test]
    fn keywords_skip_short_and_stop_words() {
        let kws = extract_keywords("The future of Solar energy is about your community");
        assert_eq!(kws, ["future", "solar", "energy", "community"]);
    }

    #[test]
    fn keyword_hashtag_is_title_cased() {
        assert_eq!(keyword_to_hashtag("solar"), "#Solar");
        assert_eq!(keyword_to_hashtag("solar POWER"), "#SolarPower");
    }
}
