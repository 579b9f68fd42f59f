use std::fs;
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ProfileStoreError;
use crate::lookup::ProfileLookup;
use crate::schema::{
    EndpointPatch, EndpointProfile, ModelPatch, ModelProfile, NewEndpointProfile, NewModelProfile,
    ProfileDocument, Purpose,
};
use crate::validation::{
    validate_endpoint_patch, validate_model_patch, validate_new_endpoint, validate_new_model,
    MAX_ENDPOINTS, MAX_MODELS,
};

/// File name of the profile document inside the install's data directory.
pub const PROFILES_FILE_NAME: &str = "boson-settings.json";

/// File-backed endpoint/model profile registry.
///
/// Same durability contract as the thread store: every mutation re-reads the
/// document and rewrites it whole.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(PROFILES_FILE_NAME),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list_endpoints(&self) -> Result<Vec<EndpointProfile>, ProfileStoreError> {
        Ok(self.read()?.endpoint_profiles)
    }

    pub fn get_endpoint(&self, id: &str) -> Result<Option<EndpointProfile>, ProfileStoreError> {
        Ok(self
            .read()?
            .endpoint_profiles
            .into_iter()
            .find(|endpoint| endpoint.id == id))
    }

    pub fn create_endpoint(
        &self,
        input: NewEndpointProfile,
    ) -> Result<EndpointProfile, ProfileStoreError> {
        validate_new_endpoint(&input)?;
        let mut document = self.read()?;
        if document.endpoint_profiles.len() >= MAX_ENDPOINTS {
            return Err(ProfileStoreError::LimitExceeded {
                what: "providers",
                max: MAX_ENDPOINTS,
            });
        }
        let base_url = input
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| value.trim_end_matches('/').to_string())
            .unwrap_or_else(|| input.preset.default_base_url().to_string());
        let now = now_millis();
        let endpoint = EndpointProfile {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            preset: input.preset,
            base_url,
            created_at: now,
            updated_at: now,
        };
        document.endpoint_profiles.push(endpoint.clone());
        self.write(&document)?;
        Ok(endpoint)
    }

    pub fn update_endpoint(
        &self,
        id: &str,
        patch: EndpointPatch,
    ) -> Result<EndpointProfile, ProfileStoreError> {
        validate_endpoint_patch(&patch)?;
        let mut document = self.read()?;
        let endpoint = document
            .endpoint_profiles
            .iter_mut()
            .find(|endpoint| endpoint.id == id)
            .ok_or_else(|| ProfileStoreError::not_found("endpoint", id))?;
        if let Some(name) = patch.name {
            endpoint.name = name.trim().to_string();
        }
        if let Some(preset) = patch.preset {
            endpoint.preset = preset;
        }
        if let Some(base_url) = patch.base_url {
            endpoint.base_url = base_url.trim().trim_end_matches('/').to_string();
        }
        endpoint.updated_at = now_millis();
        let updated = endpoint.clone();
        self.write(&document)?;
        Ok(updated)
    }

    /// Remove an endpoint and every model profile referencing it. Clearing
    /// the endpoint's stored secret is the caller's responsibility; the
    /// removed id is returned for that purpose.
    pub fn delete_endpoint(&self, id: &str) -> Result<String, ProfileStoreError> {
        let mut document = self.read()?;
        document.endpoint_profiles.retain(|endpoint| endpoint.id != id);
        let removed_default = document
            .model_profiles
            .iter()
            .any(|model| model.endpoint_profile_id == id && model.is_default);
        document
            .model_profiles
            .retain(|model| model.endpoint_profile_id != id);
        if removed_default {
            promote_next_default(&mut document.model_profiles);
        }
        self.write(&document)?;
        Ok(id.to_string())
    }

    pub fn list_models(&self) -> Result<Vec<ModelProfile>, ProfileStoreError> {
        Ok(self.read()?.model_profiles)
    }

    pub fn get_model(&self, id: &str) -> Result<Option<ModelProfile>, ProfileStoreError> {
        Ok(self
            .read()?
            .model_profiles
            .into_iter()
            .find(|model| model.id == id))
    }

    pub fn add_model(&self, input: NewModelProfile) -> Result<ModelProfile, ProfileStoreError> {
        validate_new_model(&input)?;
        let mut document = self.read()?;
        let endpoint_id = input.endpoint_profile_id.trim();
        if !document
            .endpoint_profiles
            .iter()
            .any(|endpoint| endpoint.id == endpoint_id)
        {
            return Err(ProfileStoreError::not_found("endpoint", endpoint_id));
        }
        if document.model_profiles.len() >= MAX_MODELS {
            return Err(ProfileStoreError::LimitExceeded {
                what: "models",
                max: MAX_MODELS,
            });
        }
        let has_chat_default = document
            .model_profiles
            .iter()
            .any(|model| model.purpose == Purpose::Chat && model.is_default);
        let now = now_millis();
        let model = ModelProfile {
            id: Uuid::new_v4().to_string(),
            label: input
                .label
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .unwrap_or(input.model_id.trim())
                .to_string(),
            model_id: input.model_id.trim().to_string(),
            endpoint_profile_id: endpoint_id.to_string(),
            purpose: input.purpose,
            is_default: input.purpose == Purpose::Chat && !has_chat_default,
            temperature: input.temperature,
            max_tokens: input.max_tokens,
            created_at: now,
            updated_at: now,
        };
        document.model_profiles.push(model.clone());
        self.write(&document)?;
        Ok(model)
    }

    pub fn update_model(
        &self,
        id: &str,
        patch: ModelPatch,
    ) -> Result<ModelProfile, ProfileStoreError> {
        validate_model_patch(&patch)?;
        let mut document = self.read()?;
        let index = document
            .model_profiles
            .iter()
            .position(|model| model.id == id)
            .ok_or_else(|| ProfileStoreError::not_found("model", id))?;

        // A default chat model moved to another purpose hands the flag to the
        // next remaining chat model.
        if let Some(purpose) = patch.purpose {
            let current = &document.model_profiles[index];
            if purpose != current.purpose && current.is_default {
                document.model_profiles[index].is_default = false;
                promote_next_default_except(&mut document.model_profiles, id);
            }
        }

        let model = &mut document.model_profiles[index];
        if let Some(label) = patch.label {
            model.label = label;
        }
        if let Some(model_id) = patch.model_id {
            model.model_id = model_id.trim().to_string();
        }
        if let Some(purpose) = patch.purpose {
            model.purpose = purpose;
        }
        if let Some(temperature) = patch.temperature {
            model.temperature = temperature;
        }
        if let Some(max_tokens) = patch.max_tokens {
            model.max_tokens = max_tokens;
        }
        model.updated_at = now_millis();
        let updated = model.clone();
        self.write(&document)?;
        Ok(updated)
    }

    pub fn delete_model(&self, id: &str) -> Result<(), ProfileStoreError> {
        let mut document = self.read()?;
        let removed_default = document
            .model_profiles
            .iter()
            .any(|model| model.id == id && model.is_default);
        document.model_profiles.retain(|model| model.id != id);
        if removed_default {
            promote_next_default(&mut document.model_profiles);
        }
        self.write(&document)
    }

    /// Make a chat-purpose model the single default.
    pub fn set_default_model(&self, id: &str) -> Result<(), ProfileStoreError> {
        let mut document = self.read()?;
        let target = document
            .model_profiles
            .iter()
            .find(|model| model.id == id)
            .ok_or_else(|| ProfileStoreError::not_found("model", id))?;
        if target.purpose != Purpose::Chat {
            return Err(ProfileStoreError::validation(
                "only chat models can be set as default",
            ));
        }
        let now = now_millis();
        for model in &mut document.model_profiles {
            if model.purpose == Purpose::Chat {
                model.is_default = model.id == id;
                if model.is_default {
                    model.updated_at = now;
                }
            }
        }
        self.write(&document)
    }

    /// Load the full document; a missing file reads as empty collections.
    pub fn read(&self) -> Result<ProfileDocument, ProfileStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ProfileDocument::default());
            }
            Err(source) => {
                return Err(ProfileStoreError::io(
                    "reading profile document",
                    &self.path,
                    source,
                ));
            }
        };
        serde_json::from_str(&raw).map_err(|source| ProfileStoreError::parse(&self.path, source))
    }

    fn write(&self, document: &ProfileDocument) -> Result<(), ProfileStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| {
                ProfileStoreError::io("creating profile document directory", parent, source)
            })?;
        }
        let raw = serde_json::to_string(document)
            .map_err(|source| ProfileStoreError::serialize(&self.path, source))?;
        fs::write(&self.path, raw)
            .map_err(|source| ProfileStoreError::io("writing profile document", &self.path, source))
    }
}

impl ProfileLookup for ProfileStore {
    fn model(&self, id: &str) -> Option<ModelProfile> {
        match self.get_model(id) {
            Ok(model) => model,
            Err(error) => {
                tracing::warn!(%error, "model profile lookup failed");
                None
            }
        }
    }

    fn endpoint(&self, id: &str) -> Option<EndpointProfile> {
        match self.get_endpoint(id) {
            Ok(endpoint) => endpoint,
            Err(error) => {
                tracing::warn!(%error, "endpoint profile lookup failed");
                None
            }
        }
    }
}

fn promote_next_default(models: &mut [ModelProfile]) {
    promote_next_default_except(models, "");
}

fn promote_next_default_except(models: &mut [ModelProfile], skip_id: &str) {
    let now = now_millis();
    if let Some(next) = models
        .iter_mut()
        .find(|model| model.purpose == Purpose::Chat && model.id != skip_id)
    {
        next.is_default = true;
        next.updated_at = now;
    }
}

fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
