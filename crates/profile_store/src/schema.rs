use serde::{Deserialize, Serialize};

/// What a model profile is configured to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    #[default]
    Chat,
    Voice,
    Image,
}

impl Purpose {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Voice => "voice",
            Self::Image => "image",
        }
    }
}

/// Provider family a configured endpoint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndpointPreset {
    OpenaiCompatible,
    OpenrouterCompatible,
    Litellm,
    Custom,
}

impl EndpointPreset {
    /// Base URL implied by the preset when the caller supplies none.
    #[must_use]
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenaiCompatible => "https://api.openai.com/v1",
            Self::OpenrouterCompatible => "https://openrouter.ai/api/v1",
            Self::Litellm => "http://localhost:4000",
            Self::Custom => "",
        }
    }
}

/// A provider endpoint the user configured. Base URL carries no trailing
/// slash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointProfile {
    pub id: String,
    pub name: String,
    pub preset: EndpointPreset,
    pub base_url: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A named model configuration referencing an endpoint plus sampling
/// parameters. At most one chat-purpose profile carries the default flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelProfile {
    pub id: String,
    pub label: String,
    pub model_id: String,
    pub endpoint_profile_id: String,
    #[serde(default)]
    pub purpose: Purpose,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Registry document: one JSON file per install, rewritten whole on mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDocument {
    #[serde(default)]
    pub endpoint_profiles: Vec<EndpointProfile>,
    #[serde(default)]
    pub model_profiles: Vec<ModelProfile>,
}

/// Input for [`crate::ProfileStore::create_endpoint`].
#[derive(Debug, Clone)]
pub struct NewEndpointProfile {
    pub name: String,
    pub preset: EndpointPreset,
    /// Falls back to the preset's default URL when absent or blank.
    pub base_url: Option<String>,
}

/// Input for [`crate::ProfileStore::add_model`].
#[derive(Debug, Clone)]
pub struct NewModelProfile {
    /// Display label; defaults to the model id.
    pub label: Option<String>,
    pub model_id: String,
    pub endpoint_profile_id: String,
    pub purpose: Purpose,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

/// Partial update for an endpoint; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct EndpointPatch {
    pub name: Option<String>,
    pub preset: Option<EndpointPreset>,
    pub base_url: Option<String>,
}

/// Partial update for a model profile; outer `None` leaves the field
/// unchanged, inner `None` clears it.
#[derive(Debug, Clone, Default)]
pub struct ModelPatch {
    pub label: Option<String>,
    pub model_id: Option<String>,
    pub purpose: Option<Purpose>,
    pub temperature: Option<Option<f64>>,
    pub max_tokens: Option<Option<u32>>,
}
