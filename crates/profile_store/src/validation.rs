use crate::error::ProfileStoreError;
use crate::schema::{EndpointPatch, ModelPatch, NewEndpointProfile, NewModelProfile};

/// Maximum API providers (endpoints) a user can add.
pub const MAX_ENDPOINTS: usize = 100;
/// Maximum models a user can add across all providers.
pub const MAX_MODELS: usize = 500;

pub(crate) fn validate_new_endpoint(input: &NewEndpointProfile) -> Result<(), ProfileStoreError> {
    if input.name.trim().is_empty() {
        return Err(ProfileStoreError::validation("name is required"));
    }
    if let Some(base_url) = input.base_url.as_deref() {
        validate_base_url(base_url)?;
    }
    Ok(())
}

pub(crate) fn validate_endpoint_patch(patch: &EndpointPatch) -> Result<(), ProfileStoreError> {
    if let Some(name) = patch.name.as_deref() {
        if name.trim().is_empty() {
            return Err(ProfileStoreError::validation("name must be non-empty"));
        }
    }
    if let Some(base_url) = patch.base_url.as_deref() {
        if base_url.trim().is_empty() {
            return Err(ProfileStoreError::validation("baseUrl must be non-empty"));
        }
        validate_base_url(base_url)?;
    }
    Ok(())
}

pub(crate) fn validate_new_model(input: &NewModelProfile) -> Result<(), ProfileStoreError> {
    if input.model_id.trim().is_empty() {
        return Err(ProfileStoreError::validation("modelId is required"));
    }
    if input.endpoint_profile_id.trim().is_empty() {
        return Err(ProfileStoreError::validation(
            "endpointProfileId is required",
        ));
    }
    validate_temperature(input.temperature)?;
    validate_max_tokens(input.max_tokens)
}

pub(crate) fn validate_model_patch(patch: &ModelPatch) -> Result<(), ProfileStoreError> {
    if let Some(model_id) = patch.model_id.as_deref() {
        if model_id.trim().is_empty() {
            return Err(ProfileStoreError::validation("modelId must be non-empty"));
        }
    }
    if let Some(temperature) = patch.temperature {
        validate_temperature(temperature)?;
    }
    if let Some(max_tokens) = patch.max_tokens {
        validate_max_tokens(max_tokens)?;
    }
    Ok(())
}

fn validate_base_url(base_url: &str) -> Result<(), ProfileStoreError> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ProfileStoreError::validation(
            "baseUrl must be an http(s) URL",
        ));
    }
    Ok(())
}

fn validate_temperature(temperature: Option<f64>) -> Result<(), ProfileStoreError> {
    match temperature {
        Some(value) if !(0.0..=2.0).contains(&value) => Err(ProfileStoreError::validation(
            "temperature must be absent or between 0 and 2",
        )),
        _ => Ok(()),
    }
}

fn validate_max_tokens(max_tokens: Option<u32>) -> Result<(), ProfileStoreError> {
    match max_tokens {
        Some(0) => Err(ProfileStoreError::validation(
            "maxTokens must be absent or positive",
        )),
        _ => Ok(()),
    }
}
