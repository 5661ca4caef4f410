//! Content studio: the generate / save / browse workflow.
//!
//! ```text
//! GenerationRequest ─► LLM path (four prompts) ─┐
//!                   └► template path ───────────┴► GeneratedContent ─► save_post ─► PostStore
//! ```

use std::collections::BTreeMap;
use std::fmt;

use postcraft_core::config::LlmConfig;
use postcraft_core::hashtags::{extract_hashtags, DEFAULT_HASHTAG_LIMIT};
use postcraft_core::history::{HistoryFilter, HistoryPage, UsageStats};
use postcraft_core::ideas::{parse_ideas, ImageIdea};
use postcraft_core::parser::{parse_package, ParsedPackage};
use postcraft_core::platform_posts::split_platform_posts;
use postcraft_core::templates::{self, DEFAULT_HASHTAG_COUNT};
use postcraft_core::{ContentType, Platform, PostDraft, PostId, PostStore, Tone, UserSettings};
use postcraft_llm::prompt::{GenerationParams, PromptEngine, PromptId};
use postcraft_llm::{CompletionProvider, LlmRequest};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::error::AppError;

/// Rebuilds the completion provider after settings change.
pub type ProviderFactory<P> = Box<dyn Fn(&UserSettings) -> Result<P, AppError>>;

/// What to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Subject. Must not be blank.
    pub topic: String,
    /// Kind of post.
    pub content_type: ContentType,
    /// Target platforms. Must not be empty.
    pub platforms: Vec<Platform>,
    /// Voice.
    pub tone: Tone,
    /// Optional call to action.
    pub cta: Option<String>,
}

impl GenerationRequest {
    /// Request prefilled from the user's saved defaults.
    #[must_use]
    pub fn from_settings(topic: impl Into<String>, settings: &UserSettings) -> Self {
        Self {
            topic: topic.into(),
            content_type: ContentType::default(),
            platforms: settings.default_platforms.clone(),
            tone: settings.default_tone,
            cta: None,
        }
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.topic.trim().is_empty() {
            return Err(AppError::InvalidInput("topic must not be empty".into()));
        }
        if self.platforms.is_empty() {
            return Err(AppError::InvalidInput("select at least one platform".into()));
        }
        Ok(())
    }

    fn params(&self) -> GenerationParams<'_> {
        GenerationParams {
            topic: self.topic.trim(),
            content_type: self.content_type,
            platforms: &self.platforms,
            tone: self.tone,
            cta: self.cta.as_deref(),
        }
    }
}

/// Which path produced a [`GeneratedContent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationSource {
    /// Remote LLM.
    Llm,
    /// Built-in templates.
    Template,
}

impl fmt::Display for GenerationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Llm => "llm",
            Self::Template => "template",
        })
    }
}

/// Everything one generate action produced.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedContent {
    /// The request this answers.
    pub request: GenerationRequest,
    /// One post per requested platform.
    pub posts: BTreeMap<Platform, String>,
    /// Suggested hashtags, attached to saved posts.
    pub hashtags: Vec<String>,
    /// Image/photo ideas.
    pub image_ideas: Vec<ImageIdea>,
    /// Four-section content package.
    pub package: ParsedPackage,
    /// Path that produced the content.
    pub source: GenerationSource,
}

/// The application service.
pub struct ContentStudio<S, P> {
    store: S,
    provider: P,
    factory: Option<ProviderFactory<P>>,
    prompts: PromptEngine,
    llm: LlmConfig,
    rng: StdRng,
}

impl<S: fmt::Debug, P: fmt::Debug> fmt::Debug for ContentStudio<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentStudio")
            .field("store", &self.store)
            .field("provider", &self.provider)
            .field("model", &self.llm.model)
            .finish_non_exhaustive()
    }
}

impl<S: PostStore, P: CompletionProvider> ContentStudio<S, P> {
    /// Studio over `store` and `provider` with built-in prompts.
    #[must_use]
    pub fn new(store: S, provider: P, llm: LlmConfig) -> Self {
        Self {
            store,
            provider,
            factory: None,
            prompts: PromptEngine::builtin(),
            llm,
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a custom prompt set.
    #[must_use]
    pub fn with_prompts(mut self, prompts: PromptEngine) -> Self {
        self.prompts = prompts;
        self
    }

    /// Rebuild the provider through `factory` whenever the stored key
    /// changes.
    #[must_use]
    pub fn with_provider_factory(mut self, factory: ProviderFactory<P>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Use a fixed RNG for template generation.
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The current provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Generate posts, hashtags, image ideas and a package.
    ///
    /// With `use_llm` and an available provider the LLM answers four
    /// prompts; otherwise the templates are used. LLM failures are returned,
    /// not papered over.
    ///
    /// # Errors
    /// [`AppError::InvalidInput`] for a blank topic or no platforms,
    /// [`AppError::Remote`] when an LLM call fails.
    pub fn generate(&mut self, request: &GenerationRequest, use_llm: bool) -> Result<GeneratedContent, AppError> {
        request.validate()?;

        let content = if use_llm && self.provider.is_available() {
            self.generate_with_llm(request)?
        } else {
            if use_llm {
                warn!("LLM requested but no provider is configured, using templates");
            }
            self.generate_from_templates(request)
        };

        info!(
            source = %content.source,
            platforms = content.posts.len(),
            hashtags = content.hashtags.len(),
            ideas = content.image_ideas.len(),
            "Content generated"
        );
        Ok(content)
    }

    fn ask(&self, id: PromptId, params: &GenerationParams<'_>) -> Result<String, AppError> {
        let prompt = self.prompts.render(id, params);
        let request = LlmRequest::new(
            prompt.text,
            self.llm.model.clone(),
            prompt.max_tokens.unwrap_or(self.llm.max_tokens),
        )
        .with_temperature(self.llm.temperature);

        let response = self.provider.complete(&request)?;
        debug!(prompt = %id, latency_ms = response.latency_ms, "Prompt answered");
        Ok(response.text)
    }

    fn generate_with_llm(&mut self, request: &GenerationRequest) -> Result<GeneratedContent, AppError> {
        let params = request.params();

        let posts_raw = self.ask(PromptId::PlatformPosts, &params)?;
        let posts = split_platform_posts(&posts_raw, &request.platforms);

        let hashtags_raw = self.ask(PromptId::Hashtags, &params)?;
        let mut hashtags = extract_hashtags(&hashtags_raw, DEFAULT_HASHTAG_LIMIT);
        if hashtags.is_empty() {
            warn!("LLM returned no hashtags, using suggestions");
            hashtags = templates::suggest_hashtags(sample_text(&posts, request), DEFAULT_HASHTAG_COUNT, &mut self.rng);
        }

        let ideas_raw = self.ask(PromptId::ImageIdeas, &params)?;
        let image_ideas = parse_ideas(&ideas_raw);

        let package_raw = self.ask(PromptId::Package, &params)?;
        let package = parse_package(&package_raw);

        Ok(GeneratedContent {
            request: request.clone(),
            posts,
            hashtags,
            image_ideas,
            package,
            source: GenerationSource::Llm,
        })
    }

    fn generate_from_templates(&mut self, request: &GenerationRequest) -> GeneratedContent {
        let topic = request.topic.trim();
        let cta = request.cta.as_deref();

        let posts: BTreeMap<Platform, String> = request
            .platforms
            .iter()
            .map(|&platform| {
                let text = templates::generate_text_post(
                    topic,
                    request.content_type,
                    platform,
                    request.tone,
                    cta,
                    &mut self.rng,
                );
                (platform, text)
            })
            .collect();

        let hashtags = templates::suggest_hashtags(sample_text(&posts, request), DEFAULT_HASHTAG_COUNT, &mut self.rng);
        let image_ideas = templates::image_ideas(topic, request.tone);
        let package = parse_package(&templates::fallback_package(topic, request.tone, &mut self.rng));

        GeneratedContent {
            request: request.clone(),
            posts,
            hashtags,
            image_ideas,
            package,
            source: GenerationSource::Template,
        }
    }

    /// Save the generated post for `platform` with the generated hashtags.
    ///
    /// # Errors
    /// [`AppError::InvalidInput`] if nothing was generated for `platform`,
    /// [`AppError::Persistence`] if the write fails.
    pub fn save_post(&self, content: &GeneratedContent, platform: Platform) -> Result<PostId, AppError> {
        let text = content
            .posts
            .get(&platform)
            .ok_or_else(|| AppError::InvalidInput(format!("no generated post for {platform}")))?;

        let draft = PostDraft::new(
            text.clone(),
            platform,
            content.request.tone,
            content.request.content_type,
        )
        .with_hashtags(content.hashtags.iter().cloned());
        Ok(self.store.save_post(&draft)?)
    }

    /// Saved posts, newest first, narrowed by `filter`. The page keeps the
    /// unfiltered count for the "Showing N of M" line.
    ///
    /// # Errors
    /// [`AppError::Persistence`] if the posts cannot be read.
    pub fn history(&self, filter: &HistoryFilter) -> Result<HistoryPage, AppError> {
        Ok(filter.page(self.store.get_all_posts()?))
    }

    /// Delete a saved post. Unknown ids are not an error.
    ///
    /// # Errors
    /// [`AppError::Persistence`] on storage failure.
    pub fn delete_post(&self, id: PostId) -> Result<bool, AppError> {
        Ok(self.store.delete_post(id)?)
    }

    /// Counts over all saved posts.
    ///
    /// # Errors
    /// [`AppError::Persistence`] if the posts cannot be read.
    pub fn usage_stats(&self) -> Result<UsageStats, AppError> {
        Ok(UsageStats::from_posts(&self.store.get_all_posts()?))
    }

    /// Saved settings, or defaults.
    ///
    /// # Errors
    /// [`AppError::Persistence`] if the row cannot be read.
    pub fn settings(&self) -> Result<UserSettings, AppError> {
        Ok(self.store.load_settings()?)
    }

    /// Store `settings`. When the API key changed and a provider factory is
    /// installed, the provider is rebuilt.
    ///
    /// # Errors
    /// [`AppError::Persistence`] if the row cannot be written, or whatever
    /// the factory returns.
    pub fn save_settings(&mut self, settings: &UserSettings) -> Result<(), AppError> {
        let previous = self.store.load_settings()?;
        self.store.save_settings(settings)?;

        if previous.api_key != settings.api_key {
            if let Some(factory) = &self.factory {
                self.provider = factory(settings)?;
                info!(available = self.provider.is_available(), "LLM provider rebuilt after key change");
            }
        }
        Ok(())
    }
}

fn sample_text<'a>(posts: &'a BTreeMap<Platform, String>, request: &'a GenerationRequest) -> &'a str {
    request
        .platforms
        .first()
        .and_then(|p| posts.get(p))
        .map_or(request.topic.as_str(), String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_from_settings_uses_defaults() {
        let settings = UserSettings {
            default_tone: Tone::Humorous,
            default_platforms: vec![Platform::Instagram],
            ..UserSettings::default()
        };
        let req = GenerationRequest::from_settings("cats", &settings);
        assert_eq!(req.tone, Tone::Humorous);
        assert_eq!(req.platforms, [Platform::Instagram]);
        assert_eq!(req.content_type, ContentType::Informative);
        assert!(req.cta.is_none());
    }

    #[test]
    fn validation() {
        let mut req = GenerationRequest::from_settings("  ", &UserSettings::default());
        assert!(matches!(req.validate(), Err(AppError::InvalidInput(_))));
        req.topic = "ok".into();
        assert!(req.validate().is_ok());
        req.platforms.clear();
        assert!(matches!(req.validate(), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn sample_text_prefers_first_platform_post() {
        let req = GenerationRequest::from_settings("topic", &UserSettings::default());
        let mut posts = BTreeMap::new();
        assert_eq!(sample_text(&posts, &req), "topic");
        posts.insert(Platform::Facebook, "facebook post".to_string());
        assert_eq!(sample_text(&posts, &req), "facebook post");
    }
}
