//! Filtering and usage statistics over saved posts.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{Platform, Post, Tone};

/// Narrow a post listing by platform and/or tone. Unset fields match
/// everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    /// Keep only posts for this platform.
    pub platform: Option<Platform>,
    /// Keep only posts with this tone.
    pub tone: Option<Tone>,
}

impl HistoryFilter {
    /// Whether `post` passes the filter.
    #[must_use]
    pub fn matches(&self, post: &Post) -> bool {
        self.platform.is_none_or(|p| post.platform == p) && self.tone.is_none_or(|t| post.tone == t)
    }

    /// Keep the matching posts, preserving order.
    #[must_use]
    pub fn apply(&self, posts: Vec<Post>) -> Vec<Post> {
        posts.into_iter().filter(|p| self.matches(p)).collect()
    }

    /// Whether any field narrows the listing.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.platform.is_some() || self.tone.is_some()
    }

    /// Filter `posts`, remembering how many there were before.
    #[must_use]
    pub fn page(&self, posts: Vec<Post>) -> HistoryPage {
        let total = posts.len();
        HistoryPage {
            posts: self.apply(posts),
            total,
            filtered: self.is_active(),
        }
    }
}

/// A filtered history listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryPage {
    /// Posts that passed the filter, newest first.
    pub posts: Vec<Post>,
    /// Size of the unfiltered history.
    pub total: usize,
    /// Whether a filter was applied.
    pub filtered: bool,
}

impl HistoryPage {
    /// `Showing N of M posts` when a filter was applied.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        self.filtered
            .then(|| format!("Showing {} of {} posts", self.posts.len(), self.total))
    }
}

/// Counts over a set of saved posts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsageStats {
    /// Number of posts.
    pub total: usize,
    /// Posts per platform. Platforms with no posts are absent.
    pub by_platform: BTreeMap<Platform, usize>,
    /// Posts per tone. Tones with no posts are absent.
    pub by_tone: BTreeMap<Tone, usize>,
}

impl UsageStats {
    /// Tally `posts`.
    #[must_use]
    pub fn from_posts(posts: &[Post]) -> Self {
        let mut stats = Self {
            total: posts.len(),
            ..Self::default()
        };
        for post in posts {
            *stats.by_platform.entry(post.platform).or_default() += 1;
            *stats.by_tone.entry(post.tone).or_default() += 1;
        }
        stats
    }

    /// The platform with the most posts, ties going to the first in
    /// declaration order.
    #[must_use]
    pub fn top_platform(&self) -> Option<Platform> {
        let mut best: Option<(Platform, usize)> = None;
        for (&platform, &count) in &self.by_platform {
            if best.is_none_or(|(_, c)| count > c) {
                best = Some((platform, count));
            }
        }
        best.map(|(p, _)| p)
    }
}
