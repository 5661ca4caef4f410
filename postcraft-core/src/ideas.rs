//! Clean-up of image/photo idea lists.

/// Separators tried, in order, when splitting an idea into title and body.
const TITLE_SEPARATORS: &[&str] = &[": ", " - ", " – ", " — ", ". "];

/// A single image idea.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageIdea {
    /// Short title.
    pub title: String,
    /// Longer description, if the line had one.
    pub description: Option<String>,
}

impl ImageIdea {
    /// Build an idea from one line of text.
    #[must_use]
    pub fn from_line(line: &str) -> Self {
        let (title, description) = split_title_description(line);
        Self {
            title: title.to_string(),
            description: description.map(str::to_string),
        }
    }
}

/// Split `"Title: Description"` at the first matching separator.
#[must_use]
pub fn split_title_description(line: &str) -> (&str, Option<&str>) {
    for sep in TITLE_SEPARATORS {
        if let Some((title, desc)) = line.split_once(sep) {
            return (title.trim(), Some(desc.trim()));
        }
    }
    (line.trim(), None)
}

/// Pull idea lines out of a numbered or bulleted model reply.
///
/// Blank lines and lines without letters are dropped, leading numbering
/// and bullets are stripped, and anything shorter than three words is
/// treated as noise (headings, stray fragments).
#[must_use]
pub fn clean_idea_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| line.trim_matches(|c: char| c == ' ' || c == '.' || c == '-'))
        .filter(|line| line.chars().any(char::is_alphabetic))
        .map(|line| {
            line.trim_start_matches(|c: char| c.is_ascii_digit() || matches!(c, '.' | ' ' | '-'))
                .trim()
        })
        .filter(|line| line.split_whitespace().count() >= 3)
        .map(str::to_string)
        .collect()
}

/// [`clean_idea_lines`] followed by [`ImageIdea::from_line`].
#[must_use]
pub fn parse_ideas(raw: &str) -> Vec<ImageIdea> {
    clean_idea_lines(raw)
        .iter()
        .map(|line| ImageIdea::from_line(line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_separator_in_priority_order() {
        assert_eq!(
            split_title_description("Sunrise Run: A jogger at dawn. Warm light."),
            ("Sunrise Run", Some("A jogger at dawn. Warm light."))
        );
        assert_eq!(
            split_title_description("Flat-lay - Objects on a table"),
            ("Flat-lay", Some("Objects on a table"))
        );
        assert_eq!(split_title_description("Just a title"), ("Just a title", None));
    }

    #[test]
    fn cleans_numbered_list() {
        let raw = "Here are some ideas:\n\n1. Golden Hour: People laughing outdoors.\n2. **Bold**: Minimal shapes in blue\n---\n3. ok\n";
        let lines = clean_idea_lines(raw);
        assert_eq!(
            lines,
            [
                "Here are some ideas:",
                "Golden Hour: People laughing outdoors",
                "**Bold**: Minimal shapes in blue",
            ]
        );
    }

    #[test]
    fn parse_ideas_splits_titles() {
        let ideas = parse_ideas("1. Team Huddle: Colleagues around a laptop\n2. Skyline at night with neon");
        assert_eq!(ideas[0].title, "Team Huddle");
        assert_eq!(ideas[0].description.as_deref(), Some("Colleagues around a laptop"));
        assert_eq!(ideas[1].title, "Skyline at night with neon");
        assert!(ideas[1].description.is_none());
    }
}
