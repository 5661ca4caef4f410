//! Rule-based content generation.
//!
//! Used whenever no LLM is configured or the caller opts out of it. Output
//! is built from fixed template tables and keyword lookups; anything random
//! draws from the caller's RNG so tests can seed it.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::hashtags::{dedup, extract_keywords, keyword_to_hashtag};
use crate::ideas::ImageIdea;
use crate::parser::{render_package, ParsedPackage};
use crate::types::{ContentType, Platform, Tone};

/// Default number of hashtags suggested per post.
pub const DEFAULT_HASHTAG_COUNT: usize = 10;

const PROMOTIONAL: &[&str] = &[
    "🚀 Exciting news! {topic} is here to revolutionize your experience. Don't miss out on this amazing opportunity!",
    "✨ Discover the power of {topic}! Join thousands of satisfied customers who have already transformed their lives.",
    "🎯 Ready to take your {topic} to the next level? Our solution is exactly what you've been looking for!",
];

const INFORMATIVE: &[&str] = &[
    "Did you know that {topic} can significantly impact your daily routine? Here are some key insights to consider.",
    "Understanding {topic} is crucial in today's world. Let's explore the facts and benefits together.",
    "📊 Research shows that {topic} plays a vital role in modern business. Here's what you need to know.",
];

const QUESTION: &[&str] = &[
    "What's your experience with {topic}? We'd love to hear your thoughts and stories!",
    "How has {topic} changed your perspective? Share your insights in the comments below!",
    "🤔 What would you do if {topic} wasn't available? Let's discuss the alternatives!",
];

/// Category keyword → hashtags suggested when the keyword appears.
const CATEGORY_HASHTAGS: &[(&str, &[&str])] = &[
    ("business", &["#business", "#entrepreneur", "#startup", "#success", "#growth"]),
    ("technology", &["#tech", "#innovation", "#digital", "#AI", "#future"]),
    ("marketing", &["#marketing", "#socialmedia", "#branding", "#content", "#strategy"]),
    ("health", &["#health", "#wellness", "#fitness", "#lifestyle", "#selfcare"]),
    ("education", &["#education", "#learning", "#knowledge", "#skills", "#development"]),
];

const TRENDING_HASHTAGS: &[&str] = &["#trending", "#viral", "#popular", "#2025", "#new"];

const CURATED_HASHTAGS: &[&str] = &[
    "#Viral", "#TrendingNow", "#MustSee", "#Inspiration", "#SocialMedia",
    "#GrowthHacks", "#BrandAwareness", "#Engage", "#ContentStrategy", "#ExplorePage",
];

const GENERIC_HASHTAGS: &[&str] = &["#content", "#social", "#post", "#share", "#engage"];

const PACKAGE_HASHTAGS: &[&str] = &[
    "#Inspire", "#Growth", "#Now", "#SocialTips", "#Engage",
    "#Trendy", "#Viral", "#Success", "#Create", "#Share",
];

const CAPTION_TAGLINES: &[&str] = &["Unleash the Possibilities!", "Your Next Big Move!", "Level Up Today!"];

const MAX_PER_CATEGORY: usize = 3;
const MAX_KEYWORD_TAGS: usize = 5;
const TRENDING_PICKS: usize = 2;

fn templates_for(content_type: ContentType) -> &'static [&'static str] {
    match content_type {
        ContentType::Promotional => PROMOTIONAL,
        ContentType::Informative => INFORMATIVE,
        ContentType::Question => QUESTION,
    }
}

/// Write a post for one platform from the template tables.
///
/// Humorous posts get a trailing emoji, professional ones swap `!` for `.`.
/// The call to action, if any, is appended. The result never exceeds the
/// platform's character limit.
pub fn generate_text_post<R: Rng + ?Sized>(
    topic: &str,
    content_type: ContentType,
    platform: Platform,
    tone: Tone,
    cta: Option<&str>,
    rng: &mut R,
) -> String {
    let template = templates_for(content_type)
        .choose(rng)
        .copied()
        .unwrap_or_default();
    let mut text = template.replace("{topic}", topic.trim());

    match tone {
        Tone::Humorous => text.push_str(" 😄"),
        Tone::Professional => text = text.replace('!', "."),
        Tone::Casual | Tone::Empathetic => {}
    }

    if let Some(cta) = cta.map(str::trim).filter(|c| !c.is_empty()) {
        text.push(' ');
        text.push_str(cta);
    }

    truncate_to_limit(&text, platform.char_limit())
}

/// Cut `text` to at most `limit` characters, ending in `...` when cut.
#[must_use]
pub fn truncate_to_limit(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let keep = limit.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out.chars().take(limit).collect()
}

/// Suggest up to `count` hashtags for `text`.
///
/// Order of preference: tags of categories mentioned in the text, tags made
/// from the text's own keywords, two trending tags, then curated and
/// generic filler.
pub fn suggest_hashtags<R: Rng + ?Sized>(text: &str, count: usize, rng: &mut R) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut tags: Vec<String> = Vec::new();

    for (category, category_tags) in CATEGORY_HASHTAGS {
        if lower.contains(category) {
            tags.extend(category_tags.iter().take(MAX_PER_CATEGORY).map(ToString::to_string));
        }
    }

    tags.extend(
        extract_keywords(text)
            .iter()
            .take(MAX_KEYWORD_TAGS)
            .map(|k| keyword_to_hashtag(k)),
    );

    tags.extend(
        TRENDING_HASHTAGS
            .choose_multiple(rng, TRENDING_PICKS)
            .map(ToString::to_string),
    );

    let mut curated: Vec<&str> = CURATED_HASHTAGS.to_vec();
    curated.shuffle(rng);
    tags.extend(curated.into_iter().map(str::to_string));
    tags.extend(GENERIC_HASHTAGS.iter().map(ToString::to_string));

    let mut tags = dedup(tags);
    tags.truncate(count);
    tags
}

/// Five image ideas built around the topic and tone.
#[must_use]
pub fn image_ideas(topic: &str, tone: Tone) -> Vec<ImageIdea> {
    let topic = topic.trim();
    vec![
        ImageIdea {
            title: "Engaging Group".into(),
            description: Some(format!(
                "A high-quality photo of people actively engaging with {topic} in a {tone} setting, showing real emotions and dynamic interaction. The background should be lively and relevant to the topic, with natural lighting and candid expressions."
            )),
        },
        ImageIdea {
            title: "Modern Minimalist".into(),
            description: Some(format!(
                "A modern, minimalist illustration representing {topic} and its impact, using bold colors and simple shapes. The design should highlight the core message and be easily shareable on social media."
            )),
        },
        ImageIdea {
            title: "Vivid Infographic".into(),
            description: Some(format!(
                "A vibrant infographic showing key facts about {topic}, with icons, charts, and concise text. The layout should be visually balanced and easy to read, drawing attention to the most important data."
            )),
        },
        ImageIdea {
            title: "Creative Flat-lay".into(),
            description: Some(format!(
                "A creative flat-lay of objects or symbols related to {topic}, arranged neatly on a contrasting background. The photo should use top-down perspective and include props that reinforce the message."
            )),
        },
        ImageIdea {
            title: "Dynamic Scene".into(),
            description: Some(format!(
                "A dynamic scene showing the benefits of {topic} for the audience, with people in action, expressive gestures, and a clear focal point. The setting should be aspirational and relatable."
            )),
        },
    ]
}

/// A complete content package, rendered in the same numbered grammar the
/// LLM is asked for so that it flows through the same parser.
pub fn fallback_package<R: Rng + ?Sized>(topic: &str, tone: Tone, rng: &mut R) -> String {
    let topic = topic.trim();
    let tagline = CAPTION_TAGLINES.choose(rng).copied().unwrap_or_default();
    let hashtags: Vec<&str> = PACKAGE_HASHTAGS.choose_multiple(rng, 5).copied().collect();

    render_package(&ParsedPackage {
        caption: format!("{} - {tagline}", title_case(topic)),
        post_idea: format!(
            "Share insights about {topic} in a {tone} way. Encourage your audience to engage and take action."
        ),
        hashtags: hashtags.join(", "),
        visual: format!("A vibrant, eye-catching graphic featuring {topic} and a call-to-action button."),
    })
}

/// Capitalize the first letter of every word, lowercase the rest.
#[must_use]
pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_package;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn post_mentions_topic_and_cta() {
        let text = generate_text_post(
            "solar panels",
            ContentType::Promotional,
            Platform::Facebook,
            Tone::Casual,
            Some("Shop Now"),
            &mut rng(),
        );
        assert!(text.contains("solar panels"));
        assert!(text.ends_with("Shop Now"));
    }

    #[test]
    fn professional_tone_has_no_exclamations() {
        for seed in 0..10 {
            let text = generate_text_post(
                "yoga",
                ContentType::Question,
                Platform::LinkedIn,
                Tone::Professional,
                None,
                &mut StdRng::seed_from_u64(seed),
            );
            assert!(!text.contains('!'), "{text}");
        }
    }

    #[test]
    fn humorous_tone_adds_emoji() {
        let text = generate_text_post(
            "coffee",
            ContentType::Informative,
            Platform::Instagram,
            Tone::Humorous,
            None,
            &mut rng(),
        );
        assert!(text.ends_with('😄'));
    }

    #[test]
    fn twitter_posts_are_truncated() {
        let topic = "a very long topic ".repeat(40);
        let text = generate_text_post(
            &topic,
            ContentType::Informative,
            Platform::Twitter,
            Tone::Casual,
            None,
            &mut rng(),
        );
        assert_eq!(text.chars().count(), 280);
        assert!(text.ends_with("..."));
    }

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate_to_limit("short", 280), "short");
        assert_eq!(truncate_to_limit("abcdef", 5), "ab...");
        assert_eq!(truncate_to_limit("abcdef", 2), "..");
    }

    #[test]
    fn hashtags_prefer_matching_categories() {
        let tags = suggest_hashtags("New technology for small business owners", 10, &mut rng());
        assert_eq!(tags.len(), 10);
        assert_eq!(&tags[..3], ["#business", "#entrepreneur", "#startup"]);
        assert!(tags.contains(&"#tech".to_string()));
        let mut unique = tags.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), tags.len());
    }

    #[test]
    fn hashtags_fill_up_without_keywords() {
        let tags = suggest_hashtags("", 5, &mut rng());
        assert_eq!(tags.len(), 5);
        assert!(tags.iter().all(|t| t.starts_with('#')));
    }

    #[test]
    fn five_image_ideas_with_topic() {
        let ideas = image_ideas("remote work", Tone::Empathetic);
        assert_eq!(ideas.len(), 5);
        assert!(ideas.iter().all(|i| i
            .description
            .as_deref()
            .is_some_and(|d| d.contains("remote work"))));
        assert!(ideas[0].description.as_deref().is_some_and(|d| d.contains("empathetic")));
    }

    #[test]
    fn fallback_package_parses_completely() {
        let raw = fallback_package("green energy", Tone::Casual, &mut rng());
        let parsed = parse_package(&raw);
        assert!(parsed.is_complete(), "{raw}");
        assert!(parsed.caption.starts_with("Green Energy - "));
        assert!(parsed.post_idea.contains("casual"));
        assert_eq!(parsed.hashtags.split(", ").count(), 5);
    }

    #[test]
    fn title_case_matches_expectations() {
        assert_eq!(title_case("hello WORLD"), "Hello World");
        assert_eq!(title_case(""), "");
    }
}
