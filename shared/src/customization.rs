//! Content shapes and the generation knobs callers attach to a request

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::SharedError;

/// Content shapes the service knows how to prompt for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    LinkedinPost,
    Article,
    Story,
    Carousel,
    List,
    Quote,
    BeforeAfter,
    Tips,
    Insights,
    Question,
    Topics,
    Rewrite,
}

impl ContentType {
    /// Every content type, in declaration order
    pub const ALL: [ContentType; 12] = [
        ContentType::LinkedinPost,
        ContentType::Article,
        ContentType::Story,
        ContentType::Carousel,
        ContentType::List,
        ContentType::Quote,
        ContentType::BeforeAfter,
        ContentType::Tips,
        ContentType::Insights,
        ContentType::Question,
        ContentType::Topics,
        ContentType::Rewrite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::LinkedinPost => "linkedin-post",
            ContentType::Article => "article",
            ContentType::Story => "story",
            ContentType::Carousel => "carousel",
            ContentType::List => "list",
            ContentType::Quote => "quote",
            ContentType::BeforeAfter => "before-after",
            ContentType::Tips => "tips",
            ContentType::Insights => "insights",
            ContentType::Question => "question",
            ContentType::Topics => "topics",
            ContentType::Rewrite => "rewrite",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentType {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            // The dashboard historically sent the bare "post" tag as well
            "post" => Ok(ContentType::LinkedinPost),
            other => ContentType::ALL
                .into_iter()
                .find(|content_type| content_type.as_str() == other)
                .ok_or_else(|| SharedError::UnknownVariant {
                    kind: "content type",
                    value: s.to_string(),
                }),
        }
    }
}

/// Voice the generated content should be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Friendly,
    Authoritative,
    Inspirational,
    Humorous,
    Educational,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Friendly => "friendly",
            Tone::Authoritative => "authoritative",
            Tone::Inspirational => "inspirational",
            Tone::Humorous => "humorous",
            Tone::Educational => "educational",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tone {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "professional" => Ok(Tone::Professional),
            "casual" => Ok(Tone::Casual),
            "friendly" => Ok(Tone::Friendly),
            "authoritative" => Ok(Tone::Authoritative),
            "inspirational" => Ok(Tone::Inspirational),
            "humorous" => Ok(Tone::Humorous),
            "educational" => Ok(Tone::Educational),
            _ => Err(SharedError::UnknownVariant {
                kind: "tone",
                value: s.to_string(),
            }),
        }
    }
}

/// Core generation knobs shared by every content type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationProfile {
    pub tone: Tone,
    pub language: String,
    /// Target length; each content type has its own default when absent
    pub word_count: Option<u32>,
    pub target_audience: Option<String>,
    pub goal: Option<String>,
    pub include_hashtags: bool,
    pub include_emojis: bool,
    pub include_call_to_action: bool,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl Default for GenerationProfile {
    fn default() -> Self {
        Self {
            tone: Tone::default(),
            language: "English".to_string(),
            word_count: None,
            target_audience: None,
            goal: None,
            include_hashtags: true,
            include_emojis: false,
            include_call_to_action: true,
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Stylistic naturalness sliders, each on a 0-100 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HumanLikeProfile {
    #[serde(deserialize_with = "deserialize_slider")]
    pub ambiguity: u8,
    #[serde(deserialize_with = "deserialize_slider")]
    pub randomness: u8,
    #[serde(deserialize_with = "deserialize_slider")]
    pub personal_touch: u8,
    #[serde(deserialize_with = "deserialize_slider")]
    pub storytelling: u8,
    #[serde(deserialize_with = "deserialize_slider")]
    pub emotional_depth: u8,
    #[serde(deserialize_with = "deserialize_slider")]
    pub conversational_style: u8,
}

/// Accept any JSON number, rounded and clamped into 0-100
fn deserialize_slider<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() {
        return Err(de::Error::custom("slider value must be a finite number"));
    }
    Ok(value.round().clamp(0.0, f64::from(HumanLikeProfile::MAX)) as u8)
}

impl HumanLikeProfile {
    pub const MAX: u8 = 100;

    /// Copy of the profile with every slider limited to 0-100
    pub fn clamped(&self) -> Self {
        Self {
            ambiguity: self.ambiguity.min(Self::MAX),
            randomness: self.randomness.min(Self::MAX),
            personal_touch: self.personal_touch.min(Self::MAX),
            storytelling: self.storytelling.min(Self::MAX),
            emotional_depth: self.emotional_depth.min(Self::MAX),
            conversational_style: self.conversational_style.min(Self::MAX),
        }
    }
}

impl Default for HumanLikeProfile {
    fn default() -> Self {
        Self {
            ambiguity: 30,
            randomness: 30,
            personal_touch: 50,
            storytelling: 50,
            emotional_depth: 50,
            conversational_style: 50,
        }
    }
}

/// Everything a caller can tune about a single generation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customization {
    pub profile: GenerationProfile,
    pub human_like: Option<HumanLikeProfile>,
}

impl Customization {
    pub fn new(profile: GenerationProfile) -> Self {
        Self {
            profile,
            human_like: None,
        }
    }

    pub fn with_human_like(mut self, human_like: HumanLikeProfile) -> Self {
        self.human_like = Some(human_like);
        self
    }
}
