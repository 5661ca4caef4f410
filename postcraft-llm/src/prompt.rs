//! Prompt templates for postcraft generation requests.
//!
//! Every prompt is a named, versioned template with `{key}` placeholders.
//! The built-in set is compiled in; a directory of TOML files can override
//! any of them.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use postcraft_core::{ContentType, Platform, Tone};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::PromptError;

/// The four-section answer shape the response parser understands.
/// Must stay byte-for-byte in sync with `postcraft_core::parser`.
pub const PACKAGE_TEMPLATE: &str = "1. Caption:
   Description:
2. Post Idea:
   Description:
3. Hashtags:
   Description:
4. Visual/Design Suggestion:
   Description:";

/// Complete content package in the [`PACKAGE_TEMPLATE`] shape.
pub const PACKAGE_PROMPT: &str = "Generate a creative social media package for the topic '{topic}'.
Content type: {content_type}. Tone: {tone}, {tone_modifier}. Call to action: {cta}.
Format the response exactly as follows, writing each answer after its Description: marker:
{package_template}

Caption: short, catchy, max 20 words.
Post Idea: detailed, creative, 2-3 sentences.
Hashtags: 5, comma separated.
Visual/Design Suggestion: describe an image or design to accompany the post.";

/// One post per platform, each on a line starting with the platform name.
pub const PLATFORM_POSTS_PROMPT: &str = "Generate a {content_type} social media post about '{topic}' for the following platforms: {platforms}. Use a {tone} tone. Call to action: {cta}. Return a post for each platform.";

/// Hashtag list.
pub const HASHTAGS_PROMPT: &str = "Generate a list of 7-10 highly relevant, trending, and platform-optimized hashtags for a social media post about '{topic}'. The hashtags should maximize reach, engagement, and discoverability, mixing broad, niche, and branded tags. Avoid banned or overused hashtags. Tailor them for these platforms: {platforms}. Return only the hashtags, each starting with #, separated by spaces or newlines.";

/// Image and photo ideas.
pub const IMAGE_IDEAS_PROMPT: &str = "Given the topic '{topic}', content type '{content_type}', and tone '{tone}', generate 3-5 creative, visually descriptive image or photo ideas that would be perfect to accompany a social media post. Each idea should have a short, catchy title and a detailed, vivid, and actionable description (at least 2 sentences). Format as a numbered list, with each item as 'Title: Description'.";

/// Substitute `{key}` placeholders in one pass.
///
/// Unknown placeholders are left as-is, and substituted values are never
/// re-scanned, so a topic containing `{tone}` stays literal.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after
            .find('}')
            .and_then(|close| {
                let key = &after[..close];
                vars.iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, v)| (*v, close))
            });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

// ---------------------------------------------------------------------------
// PromptId
// ---------------------------------------------------------------------------

/// Identifies a prompt template by purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Four-section content package.
    Package,
    /// One post per requested platform.
    PlatformPosts,
    /// Hashtag suggestions.
    Hashtags,
    /// Image/photo ideas.
    ImageIdeas,
}

impl PromptId {
    /// Every prompt id.
    pub const ALL: [PromptId; 4] = [Self::Package, Self::PlatformPosts, Self::Hashtags, Self::ImageIdeas];

    /// Stable name, also the TOML file stem.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::PlatformPosts => "platform_posts",
            Self::Hashtags => "hashtags",
            Self::ImageIdeas => "image_ideas",
        }
    }

    /// TOML filename (without path) for this prompt.
    #[must_use]
    pub fn filename(self) -> String {
        format!("{}.toml", self.name())
    }

    fn builtin_text(self) -> &'static str {
        match self {
            Self::Package => PACKAGE_PROMPT,
            Self::PlatformPosts => PLATFORM_POSTS_PROMPT,
            Self::Hashtags => HASHTAGS_PROMPT,
            Self::ImageIdeas => IMAGE_IDEAS_PROMPT,
        }
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PromptId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| format!("unknown prompt id: '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// Generation parameters
// ---------------------------------------------------------------------------

/// What the user asked for, as fed into every prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams<'a> {
    /// Subject of the content.
    pub topic: &'a str,
    /// Kind of post.
    pub content_type: ContentType,
    /// Target platforms, in display order.
    pub platforms: &'a [Platform],
    /// Voice.
    pub tone: Tone,
    /// Call to action. Rendered as `None` when absent.
    pub cta: Option<&'a str>,
}

impl GenerationParams<'_> {
    /// Placeholder values: `topic`, `content_type`, `platforms`, `tone`,
    /// `tone_modifier`, `cta`, `package_template`.
    #[must_use]
    pub fn vars(&self) -> Vec<(&'static str, String)> {
        let platforms: Vec<&str> = self.platforms.iter().map(|p| p.label()).collect();
        let cta = self.cta.map(str::trim).filter(|c| !c.is_empty()).unwrap_or("None");
        vec![
            ("topic", self.topic.trim().to_string()),
            ("content_type", self.content_type.label().to_string()),
            ("platforms", platforms.join(", ")),
            ("tone", self.tone.label().to_string()),
            ("tone_modifier", self.tone.modifier().to_string()),
            ("cta", cta.to_string()),
            ("package_template", PACKAGE_TEMPLATE.to_string()),
        ]
    }
}

// ---------------------------------------------------------------------------
// PromptEngine
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TomlPromptFile {
    prompt: TomlPromptData,
}

#[derive(Debug, Deserialize)]
struct TomlPromptData {
    version: String,
    #[serde(default)]
    max_tokens: Option<u32>,
    template: String,
}

/// A loaded, ready-to-render prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Version string (`builtin` for compiled-in templates).
    pub version: String,
    /// Per-prompt override of the configured token limit.
    pub max_tokens: Option<u32>,
    /// Template text with `{key}` placeholders.
    pub template: String,
}

/// A rendered prompt plus its token limit override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    /// Prompt text.
    pub text: String,
    /// Token limit override, if the template sets one.
    pub max_tokens: Option<u32>,
}

/// Holds one template per [`PromptId`] and renders them.
///
/// # Example
///
/// ```
/// use postcraft_core::{ContentType, Platform, Tone};
/// use postcraft_llm::prompt::{GenerationParams, PromptEngine, PromptId};
///
/// let engine = PromptEngine::builtin();
/// let params = GenerationParams {
///     topic: "solar energy",
///     content_type: ContentType::Informative,
///     platforms: &[Platform::Twitter],
///     tone: Tone::Casual,
///     cta: None,
/// };
/// let prompt = engine.render(PromptId::Hashtags, &params);
/// assert!(prompt.text.contains("solar energy"));
/// ```
#[derive(Debug, Clone)]
pub struct PromptEngine {
    templates: HashMap<PromptId, PromptTemplate>,
}

impl Default for PromptEngine {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PromptEngine {
    /// Engine with the compiled-in templates only.
    #[must_use]
    pub fn builtin() -> Self {
        let templates = PromptId::ALL
            .into_iter()
            .map(|id| {
                (
                    id,
                    PromptTemplate {
                        version: "builtin".into(),
                        max_tokens: None,
                        template: id.builtin_text().into(),
                    },
                )
            })
            .collect();
        Self { templates }
    }

    /// Built-in templates, overridden by any `<prompt id>.toml` found in
    /// `dir`. Each file holds a `[prompt]` table with `version`, `template`
    /// and an optional `max_tokens`. Other files are ignored.
    ///
    /// # Errors
    /// Returns [`PromptError`] if `dir` is not a directory or a prompt file
    /// cannot be read or parsed.
    pub fn from_directory(dir: impl AsRef<Path>) -> Result<Self, PromptError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(PromptError::NotADirectory(dir.to_path_buf()));
        }

        let mut engine = Self::builtin();
        let mut overridden = 0usize;
        for id in PromptId::ALL {
            let path = dir.join(id.filename());
            if !path.exists() {
                continue;
            }
            let content = std::fs::read_to_string(&path).map_err(|source| PromptError::Io {
                path: path.clone(),
                source,
            })?;
            let parsed: TomlPromptFile = toml::from_str(&content).map_err(|e| PromptError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?;

            debug!(prompt = %id, version = %parsed.prompt.version, "Loaded prompt override");
            engine.templates.insert(
                id,
                PromptTemplate {
                    version: parsed.prompt.version,
                    max_tokens: parsed.prompt.max_tokens,
                    template: parsed.prompt.template,
                },
            );
            overridden += 1;
        }

        info!(dir = %dir.display(), overridden, "Prompt templates loaded");
        Ok(engine)
    }

    /// The template for `id`.
    #[must_use]
    pub fn get(&self, id: PromptId) -> Option<&PromptTemplate> {
        self.templates.get(&id)
    }

    /// Render the prompt for `id` with `params`.
    #[must_use]
    pub fn render(&self, id: PromptId, params: &GenerationParams<'_>) -> RenderedPrompt {
        let (template, max_tokens) = self
            .get(id)
            .map_or((id.builtin_text(), None), |t| (t.template.as_str(), t.max_tokens));
        let vars = params.vars();
        let borrowed: Vec<(&str, &str)> = vars.iter().map(|(k, v)| (*k, v.as_str())).collect();
        RenderedPrompt {
            text: render_template(template, &borrowed),
            max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GenerationParams<'static> {
        GenerationParams {
            topic: "eco-friendly water bottles",
            content_type: ContentType::Promotional,
            platforms: &[Platform::Facebook, Platform::Twitter],
            tone: Tone::Humorous,
            cta: Some("Shop Now"),
        }
    }

    #[test]
    fn template_rendering_works() {
        let rendered = render_template(
            "Hello {name}, you post on {platform}.",
            &[("name", "Ana"), ("platform", "LinkedIn")],
        );
        assert_eq!(rendered, "Hello Ana, you post on LinkedIn.");
    }

    #[test]
    fn template_keeps_unknown_placeholders() {
        assert_eq!(render_template("Hi {name}, {unknown}.", &[("name", "Ana")]), "Hi Ana, {unknown}.");
        assert_eq!(render_template("open { brace", &[]), "open { brace");
        assert_eq!(render_template("{", &[]), "{");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let rendered = render_template("{topic} in a {tone} tone", &[("topic", "{tone}"), ("tone", "casual")]);
        assert_eq!(rendered, "{tone} in a casual tone");
    }

    #[test]
    fn prompt_id_from_str_round_trip() {
        for id in PromptId::ALL {
            let parsed: PromptId = id.to_string().parse().expect("should parse");
            assert_eq!(id, parsed);
        }
        assert!("nonexistent".parse::<PromptId>().is_err());
    }

    #[test]
    fn platform_posts_prompt_matches_known_wording() {
        let prompt = PromptEngine::builtin().render(PromptId::PlatformPosts, &params());
        assert_eq!(
            prompt.text,
            "Generate a promotional social media post about 'eco-friendly water bottles' for the following platforms: Facebook, Twitter. Use a humorous tone. Call to action: Shop Now. Return a post for each platform."
        );
        assert_eq!(prompt.max_tokens, None);
    }

    #[test]
    fn missing_cta_renders_none() {
        let mut p = params();
        p.cta = None;
        let prompt = PromptEngine::builtin().render(PromptId::PlatformPosts, &p);
        assert!(prompt.text.contains("Call to action: None."));

        p.cta = Some("   ");
        let prompt = PromptEngine::builtin().render(PromptId::Package, &p);
        assert!(prompt.text.contains("Call to action: None."));
    }

    #[test]
    fn package_prompt_embeds_exact_template() {
        let prompt = PromptEngine::builtin().render(PromptId::Package, &params());
        assert!(prompt.text.contains(PACKAGE_TEMPLATE));
        assert!(prompt.text.contains("adding a touch of humor and playfulness"));
        assert!(!prompt.text.contains('{'));
    }

    #[test]
    fn builtin_engine_has_every_prompt() {
        let engine = PromptEngine::builtin();
        for id in PromptId::ALL {
            assert_eq!(engine.get(id).map(|t| t.version.as_str()), Some("builtin"));
        }
    }

    #[test]
    fn directory_overrides_builtin() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("hashtags.toml"),
            "[prompt]\nversion = \"2\"\nmax_tokens = 64\ntemplate = \"Tags for {topic} please\"\n",
        )
        .expect("write");
        std::fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

        let engine = PromptEngine::from_directory(dir.path()).expect("load");
        let prompt = engine.render(PromptId::Hashtags, &params());
        assert_eq!(prompt.text, "Tags for eco-friendly water bottles please");
        assert_eq!(prompt.max_tokens, Some(64));
        assert_eq!(engine.get(PromptId::Package).map(|t| t.version.as_str()), Some("builtin"));
    }

    #[test]
    fn directory_errors() {
        assert!(matches!(
            PromptEngine::from_directory("/tmp/nonexistent_postcraft_prompts_dir"),
            Err(PromptError::NotADirectory(_))
        ));

        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("package.toml"), "[prompt]\nversion = 1\n").expect("write");
        assert!(matches!(
            PromptEngine::from_directory(dir.path()),
            Err(PromptError::Parse { .. })
        ));
    }
}
