use std::fmt;

use serde::{Deserialize, Serialize};

/// Output domain of a task. Informational only: dispatch is decided by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Image,
    Video,
    Audio,
    Text,
    Research,
}

impl TaskKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            "text" => Some(Self::Text),
            "research" => Some(Self::Research),
            _ => None,
        }
    }
}

/// Every third-party service the orchestrator knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Provider {
    Stability,
    Luma,
    Runway,
    ElevenLabs,
    Anthropic,
    OpenAi,
    Perplexity,
    Google,
}

impl Provider {
    pub const ALL: [Provider; 8] = [
        Provider::Stability,
        Provider::Luma,
        Provider::Runway,
        Provider::ElevenLabs,
        Provider::Anthropic,
        Provider::OpenAi,
        Provider::Perplexity,
        Provider::Google,
    ];

    /// Services accepted by the orchestrator endpoint, in status-probe order.
    pub const SERVICES: [Provider; 7] = [
        Provider::Stability,
        Provider::Luma,
        Provider::Runway,
        Provider::ElevenLabs,
        Provider::Anthropic,
        Provider::OpenAi,
        Provider::Perplexity,
    ];

    /// Human-readable name used in error messages ("OpenAI API key not configured").
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Stability => "Stability",
            Self::Luma => "Luma",
            Self::Runway => "Runway",
            Self::ElevenLabs => "ElevenLabs",
            Self::Anthropic => "Anthropic",
            Self::OpenAi => "OpenAI",
            Self::Perplexity => "Perplexity",
            Self::Google => "Google",
        }
    }

    /// Identifier used by the orchestrator's `service` field.
    pub fn service_id(self) -> &'static str {
        match self {
            Self::Stability => "stability",
            Self::Luma => "luma",
            Self::Runway => "runway",
            Self::ElevenLabs => "elevenlabs",
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
            Self::Perplexity => "perplexity",
            Self::Google => "google",
        }
    }

    /// Environment variables consulted for the credential, first non-empty wins.
    pub fn env_vars(self) -> &'static [&'static str] {
        match self {
            Self::Stability => &["STABILITY_API_KEY"],
            Self::Luma => &["LUMA_API_KEY"],
            Self::Runway => &["RUNWAY_API_KEY"],
            Self::ElevenLabs => &["ELEVENLABS_API_KEY"],
            Self::Anthropic => &["ANTHROPIC_API_KEY"],
            Self::OpenAi => &["OPENAI_API_KEY"],
            Self::Perplexity => &["PERPLEXITY_API_KEY"],
            Self::Google => &["GOOGLE_API_KEY", "GEMINI_API_KEY"],
        }
    }

    /// The kind of output this provider natively produces.
    pub fn native_kind(self) -> TaskKind {
        match self {
            Self::Stability => TaskKind::Image,
            Self::Luma | Self::Runway => TaskKind::Video,
            Self::ElevenLabs => TaskKind::Audio,
            Self::Perplexity => TaskKind::Research,
            Self::Anthropic | Self::OpenAi | Self::Google => TaskKind::Text,
        }
    }

    /// Parse an orchestrator `service` value.
    pub fn from_service(value: &str) -> Option<Self> {
        Self::SERVICES
            .into_iter()
            .find(|p| p.service_id() == value)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Sub-agents exposed by the sub-agent endpoint. Each one is backed by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Agent {
    Claude,
    Perplexity,
    Google,
    OpenAi,
}

impl Agent {
    pub const ALL: [Agent; 4] = [Agent::Claude, Agent::Perplexity, Agent::Google, Agent::OpenAi];

    pub fn id(self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Perplexity => "perplexity",
            Self::Google => "google",
            Self::OpenAi => "openai",
        }
    }

    pub fn provider(self) -> Provider {
        match self {
            Self::Claude => Provider::Anthropic,
            Self::Perplexity => Provider::Perplexity,
            Self::Google => Provider::Google,
            Self::OpenAi => Provider::OpenAi,
        }
    }

    pub fn from_id(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.id() == value)
    }
}
