//! Generator binary entry point

use anyhow::{Context, bail};
use clap::{ArgAction, Parser};

use generator::{ContentService, GeneratorConfig};
use shared::logging::{self, init_tracing};
use shared::{ContentType, Customization, GenerationProfile, HumanLikeProfile, Priority, ProviderId, Tone};

/// Generate LinkedIn content through the queued primary/fallback pipeline
#[derive(Parser)]
#[command(name = "generator")]
#[command(about = "Generates LinkedIn content variations with OpenAI models")]
struct Args {
    /// Content type (linkedin-post, article, story, carousel, list, quote, before-after, tips, insights, question, topics, rewrite)
    #[arg(long, default_value = "linkedin-post")]
    content_type: ContentType,

    /// Topic to write about, or the draft to improve for `rewrite`
    #[arg(long)]
    topic: String,

    #[arg(long, default_value = "professional")]
    tone: Tone,

    #[arg(long, default_value = "English")]
    language: String,

    /// Target length in words (defaults per content type)
    #[arg(long)]
    word_count: Option<u32>,

    #[arg(long)]
    audience: Option<String>,

    #[arg(long)]
    goal: Option<String>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    hashtags: bool,

    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    emojis: bool,

    /// End with a call to action
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    cta: bool,

    /// Sampling temperature (honoured by the fallback model only)
    #[arg(long)]
    temperature: Option<f32>,

    #[arg(long)]
    max_tokens: Option<u32>,

    /// Enable human-like writing directives with default slider values
    #[arg(long)]
    human_like: bool,

    /// Human-like sliders (0-100); setting any enables the profile
    #[arg(long)]
    ambiguity: Option<u8>,
    #[arg(long)]
    randomness: Option<u8>,
    #[arg(long)]
    personal_touch: Option<u8>,
    #[arg(long)]
    storytelling: Option<u8>,
    #[arg(long)]
    emotional_depth: Option<u8>,
    #[arg(long)]
    conversational_style: Option<u8>,

    /// OpenAI-compatible API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Admission priority (low, normal, high)
    #[arg(long, default_value = "normal")]
    priority: Priority,

    /// Caller identifier recorded on the request
    #[arg(long)]
    user_id: Option<String>,

    /// Print the full response as JSON
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn customization(&self) -> Customization {
        let profile = GenerationProfile {
            tone: self.tone,
            language: self.language.clone(),
            word_count: self.word_count,
            target_audience: self.audience.clone(),
            goal: self.goal.clone(),
            include_hashtags: self.hashtags,
            include_emojis: self.emojis,
            include_call_to_action: self.cta,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let customization = Customization::new(profile);
        match self.human_like_profile() {
            Some(human_like) => customization.with_human_like(human_like),
            None => customization,
        }
    }

    fn human_like_profile(&self) -> Option<HumanLikeProfile> {
        let sliders = [
            self.ambiguity,
            self.randomness,
            self.personal_touch,
            self.storytelling,
            self.emotional_depth,
            self.conversational_style,
        ];
        if !self.human_like && sliders.iter().all(Option::is_none) {
            return None;
        }

        let defaults = HumanLikeProfile::default();
        let profile = HumanLikeProfile {
            ambiguity: self.ambiguity.unwrap_or(defaults.ambiguity),
            randomness: self.randomness.unwrap_or(defaults.randomness),
            personal_touch: self.personal_touch.unwrap_or(defaults.personal_touch),
            storytelling: self.storytelling.unwrap_or(defaults.storytelling),
            emotional_depth: self.emotional_depth.unwrap_or(defaults.emotional_depth),
            conversational_style: self.conversational_style.unwrap_or(defaults.conversational_style),
        };
        Some(profile.clamped())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load .env before reading the credential
    let _ = dotenvy::dotenv();

    init_tracing(Some(&args.log_level));
    logging::log_startup("generator", &format!("{} generation for \"{}\"", args.content_type, args.topic));

    let mut config = GeneratorConfig::from_env();
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url.as_str());
    }

    let service = ContentService::from_config(&config).context("Failed to build content service")?;

    let result = service
        .generate_with_priority(
            args.content_type,
            args.topic.as_str(),
            ProviderId::OpenAI,
            args.customization(),
            args.user_id.as_deref(),
            args.priority,
        )
        .await;

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            logging::log_error("generator", "Content generation", &e);
            return Err(e.into());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else if response.is_success() {
        let items = response.content().as_slice();
        for (index, item) in items.iter().enumerate() {
            if items.len() > 1 {
                println!("--- Variation {} ---", index + 1);
            }
            println!("{item}\n");
        }
    }

    if let Some(error) = response.error() {
        bail!("Generation failed: {error}");
    }

    let metadata = response.metadata();
    logging::log_success(
        "generator",
        &format!(
            "{} items from {} ({} tokens, ${:.4}, {} ms)",
            response.content().len(),
            metadata.model,
            metadata.tokens_used,
            metadata.cost,
            metadata.processing_time_ms
        ),
    );
    Ok(())
}
