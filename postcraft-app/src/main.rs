//! `postcraft`: generate social media content from the command line.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use postcraft_app::credentials::resolve_credential;
use postcraft_app::{telemetry, AppError, ContentStudio, GeneratedContent, GenerationRequest};
use postcraft_core::history::HistoryFilter;
use postcraft_core::{
    ContentType, Credential, Platform, PostId, PostStore, PostcraftConfig, SqliteStore, Tone,
    UserSettings,
};
use postcraft_llm::{LlmClient, PromptEngine};

#[derive(Debug, Parser)]
#[command(name = "postcraft", version, about = "Generate, save and browse social media posts")]
struct Cli {
    /// Path to postcraft.toml.
    #[arg(long, global = true, env = "POSTCRAFT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate posts, hashtags, image ideas and a content package.
    Generate(GenerateArgs),
    /// List saved posts, newest first.
    History {
        /// Only this platform.
        #[arg(long)]
        platform: Option<Platform>,
        /// Only this tone.
        #[arg(long)]
        tone: Option<Tone>,
    },
    /// Delete a saved post.
    Delete {
        /// Post id, as shown by `history`.
        id: PostId,
    },
    /// Usage statistics over saved posts.
    Stats,
    /// Show or change saved defaults.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// What the content is about.
    #[arg(long)]
    topic: String,
    /// promotional, informative or question.
    #[arg(long, default_value_t = ContentType::default())]
    content_type: ContentType,
    /// Target platform; repeat for several. Saved defaults when omitted.
    #[arg(long = "platform")]
    platforms: Vec<Platform>,
    /// Voice. Saved default when omitted.
    #[arg(long)]
    tone: Option<Tone>,
    /// Call to action appended to posts.
    #[arg(long)]
    cta: Option<String>,
    /// Use the configured LLM instead of templates.
    #[arg(long)]
    llm: bool,
    /// Save the post generated for this platform.
    #[arg(long)]
    save: Option<Platform>,
}

#[derive(Debug, Subcommand)]
enum SettingsAction {
    /// Print saved settings. The API key is masked.
    Show,
    /// Change saved settings.
    Set {
        /// Default tone.
        #[arg(long)]
        tone: Option<Tone>,
        /// Default platform; repeat for several. Replaces the saved list.
        #[arg(long = "platform")]
        platforms: Vec<Platform>,
        /// API key to store.
        #[arg(long, conflicts_with = "clear_api_key")]
        api_key: Option<String>,
        /// Remove the stored API key.
        #[arg(long)]
        clear_api_key: bool,
    },
}

type Studio = ContentStudio<SqliteStore, LlmClient>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = PostcraftConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    telemetry::init(&config.general).context("failed to install logging")?;

    let store = SqliteStore::open(&config.storage.database_path, &config.storage).with_context(|| {
        format!(
            "cannot start: post database {} is unavailable",
            config.storage.database_path.display()
        )
    })?;
    let settings = store.load_settings().context("failed to read saved settings")?;

    let llm_config = config.llm.clone();
    let factory = move |settings: &UserSettings| -> Result<LlmClient, AppError> {
        let resolved = resolve_credential(&llm_config, settings)?;
        Ok(LlmClient::from_config(&llm_config, resolved.credential)?)
    };
    let provider = factory(&settings)?;

    let prompts = match &config.llm.prompts_dir {
        Some(dir) => PromptEngine::from_directory(dir)?,
        None => PromptEngine::builtin(),
    };

    let mut studio = ContentStudio::new(store, provider, config.llm.clone())
        .with_prompts(prompts)
        .with_provider_factory(Box::new(factory));

    match cli.command {
        Command::Generate(args) => generate(&mut studio, &settings, args),
        Command::History { platform, tone } => history(&studio, HistoryFilter { platform, tone }),
        Command::Delete { id } => {
            if studio.delete_post(id)? {
                println!("Deleted post {id}.");
            } else {
                println!("No post with id {id}.");
            }
            Ok(())
        }
        Command::Stats => stats(&studio),
        Command::Settings { action } => settings_command(&mut studio, &config, action),
    }
}

fn generate(studio: &mut Studio, settings: &UserSettings, args: GenerateArgs) -> Result<()> {
    let mut request = GenerationRequest::from_settings(args.topic, settings);
    request.content_type = args.content_type;
    if !args.platforms.is_empty() {
        request.platforms = args.platforms;
    }
    if let Some(tone) = args.tone {
        request.tone = tone;
    }
    request.cta = args.cta;

    if let Some(platform) = args.save {
        if !request.platforms.contains(&platform) {
            bail!("--save {platform} requires {platform} among the target platforms");
        }
    }

    let content = match studio.generate(&request, args.llm) {
        Ok(content) => content,
        Err(e) if e.is_retryable() => {
            return Err(anyhow::Error::new(e).context("generation failed, please try again"));
        }
        Err(e) => return Err(e.into()),
    };
    print_content(&content);

    if let Some(platform) = args.save {
        let id = studio
            .save_post(&content, platform)
            .context("saving failed, the generated content above was not stored")?;
        println!("\nSaved {platform} post with id {id}.");
    }
    Ok(())
}

fn print_content(content: &GeneratedContent) {
    println!("Generated with: {}", content.source);

    println!("\n== Posts ==");
    for (platform, text) in &content.posts {
        println!("[{platform}] ({}/{} chars)", text.chars().count(), platform.char_limit());
        println!("{text}\n");
    }

    println!("== Hashtags ==");
    println!("{}", content.hashtags.join(" "));

    println!("\n== Image ideas ==");
    for idea in &content.image_ideas {
        println!("- {}", idea.title);
        if let Some(description) = &idea.description {
            println!("    {description}");
        }
    }

    println!("\n== Content package ==");
    for (section, value) in content.package.sections() {
        let value = if value.is_empty() { "(missing)" } else { value };
        println!("{}: {value}", section.title());
    }
}

fn history(studio: &Studio, filter: HistoryFilter) -> Result<()> {
    let page = studio.history(&filter)?;
    if page.total == 0 {
        println!("No saved posts yet. Generate some content first!");
        return Ok(());
    }
    if let Some(summary) = page.summary() {
        println!("{summary}\n");
    }
    for post in page.posts {
        println!(
            "#{} {} | {} | {} | {}",
            post.id,
            post.timestamp.format("%Y-%m-%d %H:%M"),
            post.platform,
            post.tone,
            post.content_type
        );
        println!("{}", post.text);
        if !post.hashtags.is_empty() {
            println!("{}", post.hashtag_line());
        }
        println!();
    }
    Ok(())
}

fn stats(studio: &Studio) -> Result<()> {
    let stats = studio.usage_stats()?;
    println!("Total posts: {}", stats.total);
    if let Some(top) = stats.top_platform() {
        println!("Most used platform: {top}");
    }
    println!("\nBy platform:");
    for (platform, count) in &stats.by_platform {
        println!("  {:<10} {count}", platform.label());
    }
    println!("\nBy tone:");
    for (tone, count) in &stats.by_tone {
        println!("  {:<12} {count}", tone.label());
    }
    Ok(())
}

fn settings_command(studio: &mut Studio, config: &PostcraftConfig, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show => {
            let settings = studio.settings()?;
            let resolved = resolve_credential(&config.llm, &settings)?;
            let platforms: Vec<&str> = settings.default_platforms.iter().map(|p| p.label()).collect();
            println!("Default tone:      {}", settings.default_tone);
            println!("Default platforms: {}", platforms.join(", "));
            println!("Stored API key:    {}", settings.api_key);
            println!("Active API key:    {} ({})", resolved.credential, resolved.source);
            println!("Model:             {}", config.llm.model);
        }
        SettingsAction::Set {
            tone,
            platforms,
            api_key,
            clear_api_key,
        } => {
            let mut settings = studio.settings()?;
            if let Some(tone) = tone {
                settings.default_tone = tone;
            }
            if !platforms.is_empty() {
                settings.default_platforms = platforms;
            }
            if let Some(key) = api_key {
                settings.api_key = Credential::new(key);
            }
            if clear_api_key {
                settings.api_key = Credential::default();
            }
            studio.save_settings(&settings)?;
            println!("Settings saved. API key: {}", settings.api_key);
        }
    }
    Ok(())
}
