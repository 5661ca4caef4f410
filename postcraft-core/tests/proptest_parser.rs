//! Property tests for response parsing and rule-based generation.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use postcraft_core::hashtags::extract_hashtags;
use postcraft_core::parser::{parse_package, render_package, ParsedPackage, Section};
use postcraft_core::templates::{generate_text_post, suggest_hashtags, truncate_to_limit};
use postcraft_core::types::{ContentType, Platform, Tone};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Single-line section text that cannot be mistaken for a header.
fn arb_section_text() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ,!?#']{0,60}".prop_map(|s| s.trim().to_string())
}

fn arb_platform() -> impl Strategy<Value = Platform> {
    prop::sample::select(Platform::ALL.to_vec())
}

fn arb_tone() -> impl Strategy<Value = Tone> {
    prop::sample::select(Tone::ALL.to_vec())
}

fn arb_content_type() -> impl Strategy<Value = ContentType> {
    prop::sample::select(ContentType::ALL.to_vec())
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn parser_never_panics(raw in "\\PC{0,400}") {
        let parsed = parse_package(&raw);
        for (_, text) in parsed.sections() {
            prop_assert_eq!(text, text.trim());
        }
    }

    #[test]
    fn parser_never_panics_on_header_soup(
        lines in prop::collection::vec(
            prop_oneof![
                Just("1. Caption:".to_string()),
                Just("2. Post Idea:".to_string()),
                Just("3. Hashtags:".to_string()),
                Just("4. Visual/Design Suggestion:".to_string()),
                Just("Description:".to_string()),
                Just(String::new()),
                "[ a-z]{0,20}",
            ],
            0..30,
        )
    ) {
        let _ = parse_package(&lines.join("\n"));
    }

    #[test]
    fn well_formed_packages_parse_back(
        caption in arb_section_text(),
        post_idea in arb_section_text(),
        hashtags in arb_section_text(),
        visual in arb_section_text(),
    ) {
        prop_assume!(!caption.is_empty() && !post_idea.is_empty());
        prop_assume!(!hashtags.is_empty() && !visual.is_empty());

        let package = ParsedPackage { caption, post_idea, hashtags, visual };
        let parsed = parse_package(&render_package(&package));
        prop_assert!(parsed.missing().is_empty());
        for section in Section::ALL {
            prop_assert_eq!(parsed.get(section), package.get(section));
        }
    }
}

// ---------------------------------------------------------------------------
// Rule-based generation
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn template_posts_fit_platform_limit(
        topic in "\\PC{0,3000}",
        cta in proptest::option::of("\\PC{0,200}"),
        platform in arb_platform(),
        tone in arb_tone(),
        content_type in arb_content_type(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let text = generate_text_post(&topic, content_type, platform, tone, cta.as_deref(), &mut rng);
        prop_assert!(text.chars().count() <= platform.char_limit());
    }

    #[test]
    fn truncation_respects_any_limit(text in "\\PC{0,500}", limit in 0usize..600) {
        prop_assert!(truncate_to_limit(&text, limit).chars().count() <= limit);
    }

    #[test]
    fn suggested_hashtags_are_unique_and_bounded(text in "\\PC{0,300}", count in 0usize..20, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let tags = suggest_hashtags(&text, count, &mut rng);
        prop_assert!(tags.len() <= count);
        let mut sorted = tags.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), tags.len());
    }

    #[test]
    fn extracted_hashtags_start_with_hash(text in "\\PC{0,300}", limit in 0usize..15) {
        let tags = extract_hashtags(&text, limit);
        prop_assert!(tags.len() <= limit);
        prop_assert!(tags.iter().all(|t| t.starts_with('#')));
    }
}
