//! Split a multi-platform model reply into one post per platform.

use std::collections::BTreeMap;

use tracing::debug;

use crate::types::Platform;

/// For each requested platform, the text following its name on the same
/// line. When the name is missing, or nothing follows it, the whole reply
/// is used for that platform.
#[must_use]
pub fn split_platform_posts(raw: &str, platforms: &[Platform]) -> BTreeMap<Platform, String> {
    let whole = raw.trim();
    platforms
        .iter()
        .map(|&platform| {
            let text = line_after_label(raw, platform.label()).unwrap_or_else(|| {
                debug!(%platform, "Platform label not found in reply, using full text");
                whole.to_string()
            });
            (platform, text)
        })
        .collect()
}

fn line_after_label(raw: &str, label: &str) -> Option<String> {
    let start = raw.find(label)? + label.len();
    let rest = &raw[start..];
    let line = rest.split('\n').next().unwrap_or_default();
    let text = line
        .trim()
        .trim_start_matches(|c: char| c == ':' || c == '*' || c.is_whitespace())
        .trim_end_matches('*')
        .trim();
    (!text.is_empty()).then(|| text.to_string())
}
