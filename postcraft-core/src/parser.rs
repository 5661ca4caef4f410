//! Parser for the four-section content package returned by the LLM.
//!
//! The expected shape is:
//!
//! ```text
//! 1. Caption:
//!    Description: <caption>
//! 2. Post Idea:
//!    Description: <idea>
//! 3. Hashtags:
//!    Description: <tags>
//! 4. Visual/Design Suggestion:
//!    Description: <visual>
//! ```
//!
//! Real model output drifts from this shape, so parsing never fails. A
//! section that cannot be found comes back as an empty string.

use std::fmt;

use tracing::warn;

/// Marker that introduces the body of each section.
pub const DESCRIPTION_MARKER: &str = "Description:";

/// One of the four labelled sections of a content package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    /// Short, catchy caption.
    Caption,
    /// A longer description of the post.
    PostIdea,
    /// Suggested hashtags, as free text.
    Hashtags,
    /// Suggested image or design.
    Visual,
}

impl Section {
    /// All sections in template order.
    pub const ALL: [Section; 4] = [Self::Caption, Self::PostIdea, Self::Hashtags, Self::Visual];

    /// The literal header that opens this section.
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Self::Caption => "1. Caption:",
            Self::PostIdea => "2. Post Idea:",
            Self::Hashtags => "3. Hashtags:",
            Self::Visual => "4. Visual/Design Suggestion:",
        }
    }

    /// Stable machine-readable key.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Caption => "caption",
            Self::PostIdea => "post_idea",
            Self::Hashtags => "hashtags",
            Self::Visual => "visual",
        }
    }

    /// Header text without the numbering and colon, e.g. `Post Idea`.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Caption => "Caption",
            Self::PostIdea => "Post Idea",
            Self::Hashtags => "Hashtags",
            Self::Visual => "Visual/Design Suggestion",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Caption => 0,
            Self::PostIdea => 1,
            Self::Hashtags => 2,
            Self::Visual => 3,
        }
    }

    /// If `line` opens a section, return it and the text after the header.
    fn match_header(line: &str) -> Option<(Self, &str)> {
        let line = line.trim_start();
        Self::ALL
            .into_iter()
            .find_map(|s| line.strip_prefix(s.header()).map(|rest| (s, rest)))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The four extracted fields of a content package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPackage {
    /// Short, catchy caption.
    pub caption: String,
    /// Longer post idea.
    pub post_idea: String,
    /// Hashtags as written by the model.
    pub hashtags: String,
    /// Visual/design suggestion.
    pub visual: String,
}

impl ParsedPackage {
    /// Value of one section.
    #[must_use]
    pub fn get(&self, section: Section) -> &str {
        match section {
            Section::Caption => &self.caption,
            Section::PostIdea => &self.post_idea,
            Section::Hashtags => &self.hashtags,
            Section::Visual => &self.visual,
        }
    }

    /// `(section, value)` pairs in template order.
    pub fn sections(&self) -> impl Iterator<Item = (Section, &str)> {
        Section::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    /// Sections that came back empty.
    #[must_use]
    pub fn missing(&self) -> Vec<Section> {
        self.sections()
            .filter(|(_, v)| v.is_empty())
            .map(|(s, _)| s)
            .collect()
    }

    /// Whether every section has content.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.sections().all(|(_, v)| !v.is_empty())
    }
}

/// Split raw model output into the four package sections.
///
/// Lines are scanned in order. A line whose trimmed start is a section
/// header switches the current section; anything after the header on the
/// same line, and every following line up to the next header, belongs to
/// that section. A leading `Description:` marker is dropped from each line.
/// Text before the first header is ignored. A header that appears twice
/// keeps appending to the same section.
#[must_use]
pub fn parse_package(raw: &str) -> ParsedPackage {
    let mut buckets: [Vec<&str>; 4] = Default::default();
    let mut current: Option<Section> = None;

    for line in raw.lines() {
        let body = match Section::match_header(line) {
            Some((section, rest)) => {
                current = Some(section);
                if rest.trim().is_empty() {
                    continue;
                }
                rest
            }
            None => line,
        };

        let Some(section) = current else {
            continue;
        };

        let body = body.trim();
        let body = body
            .strip_prefix(DESCRIPTION_MARKER)
            .map_or(body, str::trim_start);
        buckets[section.index()].push(body);
    }

    let join = |lines: &[&str]| lines.join("\n").trim().to_string();
    let parsed = ParsedPackage {
        caption: join(&buckets[0]),
        post_idea: join(&buckets[1]),
        hashtags: join(&buckets[2]),
        visual: join(&buckets[3]),
    };

    if !parsed.is_complete() {
        let missing: Vec<&str> = parsed.missing().into_iter().map(Section::key).collect();
        warn!(?missing, "Content package is missing sections");
    }

    parsed
}

/// Render a package back into the numbered template shape.
#[must_use]
pub fn render_package(package: &ParsedPackage) -> String {
    package
        .sections()
        .map(|(s, v)| format!("{}\n   {DESCRIPTION_MARKER} {v}", s.header()))
        .collect::<Vec<_>>()
        .join("\n")
}
