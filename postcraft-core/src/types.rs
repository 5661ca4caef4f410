//! Core type definitions for postcraft.
//!
//! Posts and settings are plain value structs. Optional fields are filled in
//! by constructors (empty hashtag list, current timestamp) instead of being
//! patched after the fact.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Store-assigned identifier of a saved post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PostId(pub i64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PostId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| format!("invalid post id '{s}': {e}"))
    }
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Target social media platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// Facebook.
    Facebook,
    /// Twitter / X.
    Twitter,
    /// Instagram.
    Instagram,
    /// LinkedIn.
    LinkedIn,
}

impl Platform {
    /// All platforms in display order.
    pub const ALL: [Platform; 4] = [
        Self::Facebook,
        Self::Twitter,
        Self::Instagram,
        Self::LinkedIn,
    ];

    /// Human-readable label, as stored in the database.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Facebook => "Facebook",
            Self::Twitter => "Twitter",
            Self::Instagram => "Instagram",
            Self::LinkedIn => "LinkedIn",
        }
    }

    /// Maximum post length in characters.
    #[must_use]
    pub fn char_limit(self) -> usize {
        match self {
            Self::Twitter => 280,
            Self::Facebook => 2000,
            Self::Instagram => 2200,
            Self::LinkedIn => 3000,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown platform: '{s}'"))
    }
}

/// Tone of voice for generated content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Professional and authoritative.
    #[default]
    Professional,
    /// Friendly and conversational.
    Casual,
    /// Playful.
    Humorous,
    /// Understanding and emotionally connected.
    Empathetic,
}

impl Tone {
    /// All tones in display order.
    pub const ALL: [Tone; 4] = [
        Self::Professional,
        Self::Casual,
        Self::Humorous,
        Self::Empathetic,
    ];

    /// Lowercase label, as stored in the database.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Casual => "casual",
            Self::Humorous => "humorous",
            Self::Empathetic => "empathetic",
        }
    }

    /// Phrase describing how the tone shapes the writing.
    #[must_use]
    pub fn modifier(self) -> &'static str {
        match self {
            Self::Professional => "maintaining a professional and authoritative tone",
            Self::Casual => "using a friendly and conversational approach",
            Self::Humorous => "adding a touch of humor and playfulness",
            Self::Empathetic => "showing understanding and emotional connection",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown tone: '{s}'"))
    }
}

/// Kind of post to generate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Sells something.
    Promotional,
    /// Shares facts.
    #[default]
    Informative,
    /// Asks the audience something.
    Question,
}

impl ContentType {
    /// All content types in display order.
    pub const ALL: [ContentType; 3] = [Self::Promotional, Self::Informative, Self::Question];

    /// Lowercase label, as stored in the database.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Promotional => "promotional",
            Self::Informative => "informative",
            Self::Question => "question",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown content type: '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// A post that has been generated but not yet saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    /// Post body.
    pub text: String,
    /// Hashtags in display order. May be empty.
    pub hashtags: Vec<String>,
    /// Target platform.
    pub platform: Platform,
    /// Tone the post was written in.
    pub tone: Tone,
    /// Kind of post.
    pub content_type: ContentType,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

impl PostDraft {
    /// Create a draft with no hashtags, stamped with the current time.
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        platform: Platform,
        tone: Tone,
        content_type: ContentType,
    ) -> Self {
        Self {
            text: text.into(),
            hashtags: Vec::new(),
            platform,
            tone,
            content_type,
            timestamp: Utc::now(),
        }
    }

    /// Attach hashtags.
    #[must_use]
    pub fn with_hashtags<I, T>(mut self, hashtags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.hashtags = hashtags.into_iter().map(Into::into).collect();
        self
    }

    /// Override the creation time.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// A saved post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Identifier assigned by the store. Never changes.
    pub id: PostId,
    /// Post body.
    pub text: String,
    /// Hashtags in display order.
    pub hashtags: Vec<String>,
    /// Target platform.
    pub platform: Platform,
    /// Tone the post was written in.
    pub tone: Tone,
    /// Kind of post.
    pub content_type: ContentType,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

impl Post {
    /// Attach a store-assigned id to a draft.
    #[must_use]
    pub fn from_draft(id: PostId, draft: PostDraft) -> Self {
        Self {
            id,
            text: draft.text,
            hashtags: draft.hashtags,
            platform: draft.platform,
            tone: draft.tone,
            content_type: draft.content_type,
            timestamp: draft.timestamp,
        }
    }

    /// Hashtags joined with single spaces, as shown in history listings.
    #[must_use]
    pub fn hashtag_line(&self) -> String {
        self.hashtags.join(" ")
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// An API key that never prints itself.
///
/// `Debug` and `Display` only ever show the masked form.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw key. Surrounding whitespace is dropped.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    /// Whether no key is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw key. Only for building request headers and storage rows.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Masked rendering: first and last four characters of long keys, all
    /// stars for short ones.
    #[must_use]
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() < 12 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}{}{tail}", "*".repeat(chars.len() - 8))
    }
}

impl From<String> for Credential {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for Credential {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.masked()).finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("<not set>")
        } else {
            f.write_str(&self.masked())
        }
    }
}

/// The single user's preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSettings {
    /// Tone preselected for new content.
    pub default_tone: Tone,
    /// Platforms preselected for new content.
    pub default_platforms: Vec<Platform>,
    /// Stored LLM API key. May be empty.
    pub api_key: Credential,
}

impl UserSettings {
    /// Platforms used when nothing has been saved yet.
    #[must_use]
    pub fn default_platform_list() -> Vec<Platform> {
        vec![Platform::Facebook, Platform::Twitter]
    }
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            default_tone: Tone::Professional,
            default_platforms: Self::default_platform_list(),
            api_key: Credential::default(),
        }
    }
}
