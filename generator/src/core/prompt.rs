//! Prompt construction from a content type and the caller's customization
//!
//! Every content type owns one entry in [`TEMPLATES`]; the entry supplies the
//! content-specific brief while [`build_prompt`] appends the shared directives
//! (tone, language, length, audience, goal, feature toggles, human-like style)
//! and the output-format instruction the response parser relies on.

use shared::{ContentType, Customization, GenerationProfile, HumanLikeProfile};

use crate::types::OutputFormat;

/// Number of independent variations requested for multi-variation content
pub const VARIATION_COUNT: usize = 6;

/// Delimiter the model is told to place between variations
pub const POST_SEPARATOR: &str = "---POST_SEPARATOR---";

/// Number of titles requested for topic suggestions
pub const TOPIC_COUNT: usize = 10;

/// Prompt template for one content type
#[derive(Debug, Clone, Copy)]
pub struct ContentTemplate {
    pub content_type: ContentType,
    pub output: OutputFormat,
    pub default_word_count: u32,
    /// Content-specific brief for a topic
    pub instructions: fn(&str) -> String,
}

/// Indexed by `ContentType as usize`, in `ContentType::ALL` order
pub const TEMPLATES: [ContentTemplate; 12] = [
    ContentTemplate {
        content_type: ContentType::LinkedinPost,
        output: OutputFormat::Variations,
        default_word_count: 150,
        instructions: linkedin_post,
    },
    ContentTemplate {
        content_type: ContentType::Article,
        output: OutputFormat::Variations,
        default_word_count: 600,
        instructions: article,
    },
    ContentTemplate {
        content_type: ContentType::Story,
        output: OutputFormat::Variations,
        default_word_count: 250,
        instructions: story,
    },
    ContentTemplate {
        content_type: ContentType::Carousel,
        output: OutputFormat::Variations,
        default_word_count: 200,
        instructions: carousel,
    },
    ContentTemplate {
        content_type: ContentType::List,
        output: OutputFormat::Variations,
        default_word_count: 180,
        instructions: list,
    },
    ContentTemplate {
        content_type: ContentType::Quote,
        output: OutputFormat::Variations,
        default_word_count: 120,
        instructions: quote,
    },
    ContentTemplate {
        content_type: ContentType::BeforeAfter,
        output: OutputFormat::Variations,
        default_word_count: 180,
        instructions: before_after,
    },
    ContentTemplate {
        content_type: ContentType::Tips,
        output: OutputFormat::Variations,
        default_word_count: 180,
        instructions: tips,
    },
    ContentTemplate {
        content_type: ContentType::Insights,
        output: OutputFormat::Variations,
        default_word_count: 200,
        instructions: insights,
    },
    ContentTemplate {
        content_type: ContentType::Question,
        output: OutputFormat::Variations,
        default_word_count: 100,
        instructions: question,
    },
    ContentTemplate {
        content_type: ContentType::Topics,
        output: OutputFormat::JsonList,
        default_word_count: 0,
        instructions: topics,
    },
    ContentTemplate {
        content_type: ContentType::Rewrite,
        output: OutputFormat::Single,
        default_word_count: 150,
        instructions: rewrite,
    },
];

/// Template registered for a content type
pub fn template_for(content_type: ContentType) -> &'static ContentTemplate {
    &TEMPLATES[content_type as usize]
}

fn linkedin_post(topic: &str) -> String {
    format!(
        "Write a LinkedIn post about \"{topic}\". Open with a strong hook in the first line, \
develop one clear idea, and keep paragraphs short so the post reads well on mobile."
    )
}

fn article(topic: &str) -> String {
    format!(
        "Write a LinkedIn article about \"{topic}\". Include a compelling headline, a short \
introduction, three to five sections with subheadings, and a conclusion with a key takeaway."
    )
}

fn story(topic: &str) -> String {
    format!(
        "Write a LinkedIn storytelling post about \"{topic}\". Describe the situation, the \
challenge, the turning point and the lesson learned, in that order."
    )
}

fn carousel(topic: &str) -> String {
    format!(
        "Write the text for a LinkedIn carousel about \"{topic}\". Use six to eight slides, \
label each one \"Slide N:\", make the first slide a title hook and the last slide a summary."
    )
}

fn list(topic: &str) -> String {
    format!(
        "Write a list-style LinkedIn post about \"{topic}\". Introduce the list in one line, \
then give five to seven points, each with a one-sentence explanation."
    )
}

fn quote(topic: &str) -> String {
    format!(
        "Write a LinkedIn post built around an inspiring quote related to \"{topic}\". Start \
with the quote and its attribution, then explain why it matters and how to apply it."
    )
}

fn before_after(topic: &str) -> String {
    format!(
        "Write a before-and-after transformation post about \"{topic}\". Describe the \"before\" \
state, what changed, and the \"after\" state with concrete results."
    )
}

fn tips(topic: &str) -> String {
    format!(
        "Write an actionable tips post about \"{topic}\". Share three to five practical tips, \
each specific enough that a reader could apply it today."
    )
}

fn insights(topic: &str) -> String {
    format!(
        "Write an industry insights post about \"{topic}\". Share a non-obvious observation, \
the evidence or trend behind it, and what it means for the reader."
    )
}

fn question(topic: &str) -> String {
    format!(
        "Write an engagement post about \"{topic}\" that poses a thought-provoking question to \
the audience, gives brief context and your own take, and invites replies."
    )
}

fn topics(topic: &str) -> String {
    format!(
        "Suggest {TOPIC_COUNT} distinct LinkedIn post titles about \"{topic}\". Each title \
should be specific, five to twelve words long, and make a busy professional stop scrolling."
    )
}

fn rewrite(draft: &str) -> String {
    format!(
        "Rewrite and improve the following LinkedIn draft. Keep the author's intent and key \
facts, tighten the wording and strengthen the opening hook.\n\nDraft:\n\"\"\"\n{draft}\n\"\"\""
    )
}

/// Render the full prompt for a request
pub fn build_prompt(content_type: ContentType, topic: &str, customization: &Customization) -> String {
    let template = template_for(content_type);
    let profile = &customization.profile;

    let mut prompt = (template.instructions)(topic.trim());

    prompt.push_str("\n\nRequirements:\n");
    for line in profile_directives(template, profile) {
        prompt.push_str("- ");
        prompt.push_str(&line);
        prompt.push('\n');
    }

    if template.output != OutputFormat::JsonList {
        if let Some(human_like) = &customization.human_like {
            prompt.push('\n');
            prompt.push_str(&human_like_section(human_like));
        }
    }

    prompt.push('\n');
    prompt.push_str(&output_instruction(template.output));
    prompt
}

fn profile_directives(template: &ContentTemplate, profile: &GenerationProfile) -> Vec<String> {
    let mut lines = vec![
        format!("Tone: {}.", profile.tone),
        format!("Language: write in {}.", non_blank(&profile.language).unwrap_or("English")),
    ];

    if template.output != OutputFormat::JsonList {
        let words = profile.word_count.unwrap_or(template.default_word_count);
        lines.push(format!("Length: approximately {words} words."));
    }

    if let Some(audience) = profile.target_audience.as_deref().and_then(non_blank) {
        lines.push(format!("Target audience: {audience}."));
    }
    if let Some(goal) = profile.goal.as_deref().and_then(non_blank) {
        lines.push(format!("Goal: {goal}."));
    }

    if template.output == OutputFormat::JsonList {
        return lines;
    }

    lines.push(if profile.include_hashtags {
        "Include 3-5 relevant hashtags at the end.".to_string()
    } else {
        "Do not include hashtags.".to_string()
    });
    lines.push(if profile.include_emojis {
        "Use a few relevant emojis to add personality.".to_string()
    } else {
        "Do not use emojis.".to_string()
    });
    lines.push(if profile.include_call_to_action {
        "End with a clear call to action.".to_string()
    } else {
        "Do not end with an explicit call to action.".to_string()
    });

    lines
}

fn output_instruction(output: OutputFormat) -> String {
    match output {
        OutputFormat::Variations => format!(
            "Write exactly {VARIATION_COUNT} different variations of this content. Each variation \
must be complete and independent. Separate consecutive variations with a line containing only \
{POST_SEPARATOR} and do not number the variations or add any other commentary."
        ),
        OutputFormat::JsonList => format!(
            "Return ONLY a JSON array of {TOPIC_COUNT} strings, for example [\"First title\", \
\"Second title\"]. Do not add any other text."
        ),
        OutputFormat::Single => {
            "Return only the finished text, with no preamble or commentary.".to_string()
        }
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Intensity band of a 0-100 slider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Low,
    Medium,
    High,
}

impl Band {
    pub fn of(value: u8) -> Self {
        if value > 70 {
            Band::High
        } else if value > 40 {
            Band::Medium
        } else {
            Band::Low
        }
    }
}

/// Phrasing for one slider, per band
struct StyleDirective {
    slider: fn(&HumanLikeProfile) -> u8,
    low: &'static str,
    medium: &'static str,
    high: &'static str,
}

const STYLE_DIRECTIVES: [StyleDirective; 6] = [
    StyleDirective {
        slider: |profile: &HumanLikeProfile| profile.ambiguity,
        low: "Be clear and direct; avoid hedging.",
        medium: "Allow a little nuance and the occasional \"it depends\" instead of absolute statements.",
        high: "Leave some thoughts open-ended and admit uncertainty where it is honest; not every point needs a neat conclusion.",
    },
    StyleDirective {
        slider: |profile: &HumanLikeProfile| profile.randomness,
        low: "Keep a consistent, well-organized structure.",
        medium: "Mix short and long sentences so the rhythm does not feel formulaic.",
        high: "Vary sentence length and structure a lot, include an unexpected aside, and avoid predictable patterns.",
    },
    StyleDirective {
        slider: |profile: &HumanLikeProfile| profile.personal_touch,
        low: "Keep the focus on the topic rather than the author.",
        medium: "Add a personal perspective or brief anecdote where it fits.",
        high: "Write in the first person with specific personal experiences, opinions and small details only the author would know.",
    },
    StyleDirective {
        slider: |profile: &HumanLikeProfile| profile.storytelling,
        low: "Present information directly without narrative framing.",
        medium: "Weave in a short example or mini-story to illustrate the main point.",
        high: "Frame the content as a story with a clear setting, tension and resolution.",
    },
    StyleDirective {
        slider: |profile: &HumanLikeProfile| profile.emotional_depth,
        low: "Keep the emotional register measured and factual.",
        medium: "Acknowledge how the topic feels, not just what it is.",
        high: "Express genuine emotions such as doubt, excitement or frustration and connect them to the reader's own experience.",
    },
    StyleDirective {
        slider: |profile: &HumanLikeProfile| profile.conversational_style,
        low: "Use a polished, more formal register.",
        medium: "Use a natural, approachable voice with some contractions.",
        high: "Write the way people talk: contractions, direct questions to the reader and casual transitions like \"here's the thing\".",
    },
];

/// Style directives for a human-like profile, one per slider
pub fn human_like_directives(profile: &HumanLikeProfile) -> Vec<&'static str> {
    let profile = profile.clamped();

    STYLE_DIRECTIVES
        .iter()
        .map(|directive| match Band::of((directive.slider)(&profile)) {
            Band::High => directive.high,
            Band::Medium => directive.medium,
            Band::Low => directive.low,
        })
        .collect()
}

fn human_like_section(profile: &HumanLikeProfile) -> String {
    let mut section = String::from("Make the writing feel authentically human:\n");
    for directive in human_like_directives(profile) {
        section.push_str("- ");
        section.push_str(directive);
        section.push('\n');
    }
    section
}
