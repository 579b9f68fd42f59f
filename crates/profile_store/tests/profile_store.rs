use profile_store::{
    EndpointPatch, EndpointPreset, ModelPatch, NewEndpointProfile, NewModelProfile,
    ProfileLookup, ProfileStore, ProfileStoreError, Purpose,
};
use tempfile::TempDir;

fn store() -> (TempDir, ProfileStore) {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let store = ProfileStore::new(dir.path());
    (dir, store)
}

fn endpoint(store: &ProfileStore) -> profile_store::EndpointProfile {
    store
        .create_endpoint(NewEndpointProfile {
            name: "Local".to_string(),
            preset: EndpointPreset::Custom,
            base_url: Some("http://localhost:4000/".to_string()),
        })
        .expect("create endpoint")
}

fn chat_model(store: &ProfileStore, endpoint_id: &str, model_id: &str) -> profile_store::ModelProfile {
    store
        .add_model(NewModelProfile {
            label: None,
            model_id: model_id.to_string(),
            endpoint_profile_id: endpoint_id.to_string(),
            purpose: Purpose::Chat,
            temperature: None,
            max_tokens: None,
        })
        .expect("add model")
}

#[test]
fn create_endpoint_strips_trailing_slash() {
    let (_dir, store) = store();
    let endpoint = endpoint(&store);
    assert_eq!(endpoint.base_url, "http://localhost:4000");
}

#[test]
fn create_endpoint_falls_back_to_preset_url() {
    let (_dir, store) = store();
    let endpoint = store
        .create_endpoint(NewEndpointProfile {
            name: "OpenAI".to_string(),
            preset: EndpointPreset::OpenaiCompatible,
            base_url: None,
        })
        .expect("create endpoint");
    assert_eq!(endpoint.base_url, "https://api.openai.com/v1");
}

#[test]
fn first_chat_model_becomes_default() {
    let (_dir, store) = store();
    let endpoint = endpoint(&store);

    let first = chat_model(&store, &endpoint.id, "llama-3");
    assert!(first.is_default);

    let second = chat_model(&store, &endpoint.id, "qwen-2");
    assert!(!second.is_default);

    let voice = store
        .add_model(NewModelProfile {
            label: Some("Speech".to_string()),
            model_id: "whisper".to_string(),
            endpoint_profile_id: endpoint.id.clone(),
            purpose: Purpose::Voice,
            temperature: None,
            max_tokens: None,
        })
        .expect("add voice model");
    assert!(!voice.is_default);
}

#[test]
fn deleting_default_model_promotes_next_chat_model() {
    let (_dir, store) = store();
    let endpoint = endpoint(&store);
    let first = chat_model(&store, &endpoint.id, "llama-3");
    let second = chat_model(&store, &endpoint.id, "qwen-2");

    store.delete_model(&first.id).expect("delete model");
    let promoted = store
        .get_model(&second.id)
        .expect("get model")
        .expect("model exists");
    assert!(promoted.is_default);
}

#[test]
fn set_default_model_moves_the_flag() {
    let (_dir, store) = store();
    let endpoint = endpoint(&store);
    let first = chat_model(&store, &endpoint.id, "llama-3");
    let second = chat_model(&store, &endpoint.id, "qwen-2");

    store.set_default_model(&second.id).expect("set default");
    let models = store.list_models().expect("list models");
    let defaults: Vec<&str> = models
        .iter()
        .filter(|model| model.is_default)
        .map(|model| model.id.as_str())
        .collect();
    assert_eq!(defaults, vec![second.id.as_str()]);
    assert!(!store
        .get_model(&first.id)
        .expect("get")
        .expect("exists")
        .is_default);
}

#[test]
fn set_default_rejects_non_chat_purpose() {
    let (_dir, store) = store();
    let endpoint = endpoint(&store);
    let voice = store
        .add_model(NewModelProfile {
            label: None,
            model_id: "whisper".to_string(),
            endpoint_profile_id: endpoint.id.clone(),
            purpose: Purpose::Voice,
            temperature: None,
            max_tokens: None,
        })
        .expect("add model");

    let error = store
        .set_default_model(&voice.id)
        .expect_err("voice model cannot be default");
    assert!(matches!(error, ProfileStoreError::Validation(_)));
}

#[test]
fn add_model_requires_known_endpoint() {
    let (_dir, store) = store();
    let error = store
        .add_model(NewModelProfile {
            label: None,
            model_id: "llama-3".to_string(),
            endpoint_profile_id: "missing".to_string(),
            purpose: Purpose::Chat,
            temperature: None,
            max_tokens: None,
        })
        .expect_err("unknown endpoint must be rejected");
    assert!(matches!(error, ProfileStoreError::NotFound { .. }));
}

#[test]
fn delete_endpoint_cascades_to_models() {
    let (_dir, store) = store();
    let endpoint = endpoint(&store);
    chat_model(&store, &endpoint.id, "llama-3");

    store.delete_endpoint(&endpoint.id).expect("delete endpoint");
    assert!(store.list_endpoints().expect("list").is_empty());
    assert!(store.list_models().expect("list").is_empty());
}

#[test]
fn update_model_patch_semantics() {
    let (_dir, store) = store();
    let endpoint = endpoint(&store);
    let model = store
        .add_model(NewModelProfile {
            label: None,
            model_id: "llama-3".to_string(),
            endpoint_profile_id: endpoint.id.clone(),
            purpose: Purpose::Chat,
            temperature: Some(0.7),
            max_tokens: Some(2048),
        })
        .expect("add model");

    let updated = store
        .update_model(
            &model.id,
            ModelPatch {
                label: Some("Llama".to_string()),
                temperature: Some(None),
                ..ModelPatch::default()
            },
        )
        .expect("update model");
    assert_eq!(updated.label, "Llama");
    assert_eq!(updated.temperature, None);
    assert_eq!(updated.max_tokens, Some(2048));
    assert_eq!(updated.model_id, "llama-3");
}

#[test]
fn changing_default_model_purpose_reassigns_flag() {
    let (_dir, store) = store();
    let endpoint = endpoint(&store);
    let first = chat_model(&store, &endpoint.id, "llama-3");
    let second = chat_model(&store, &endpoint.id, "qwen-2");

    store
        .update_model(
            &first.id,
            ModelPatch {
                purpose: Some(Purpose::Voice),
                ..ModelPatch::default()
            },
        )
        .expect("update model");

    assert!(!store
        .get_model(&first.id)
        .expect("get")
        .expect("exists")
        .is_default);
    assert!(store
        .get_model(&second.id)
        .expect("get")
        .expect("exists")
        .is_default);
}

#[test]
fn update_endpoint_trims_base_url() {
    let (_dir, store) = store();
    let created = endpoint(&store);
    let updated = store
        .update_endpoint(
            &created.id,
            EndpointPatch {
                base_url: Some("https://openrouter.ai/api/v1/".to_string()),
                ..EndpointPatch::default()
            },
        )
        .expect("update endpoint");
    assert_eq!(updated.base_url, "https://openrouter.ai/api/v1");
}

#[test]
fn lookup_trait_resolves_profiles() {
    let (_dir, store) = store();
    let endpoint = endpoint(&store);
    let model = chat_model(&store, &endpoint.id, "llama-3");

    let lookup: &dyn ProfileLookup = &store;
    assert_eq!(
        lookup.model(&model.id).map(|model| model.model_id),
        Some("llama-3".to_string())
    );
    assert_eq!(
        lookup.endpoint(&endpoint.id).map(|endpoint| endpoint.name),
        Some("Local".to_string())
    );
    assert!(lookup.model("missing").is_none());
}

#[test]
fn document_survives_reopen() {
    let (dir, store) = store();
    let endpoint = endpoint(&store);
    chat_model(&store, &endpoint.id, "llama-3");

    let reopened = ProfileStore::new(dir.path());
    assert_eq!(reopened.list_endpoints().expect("list").len(), 1);
    assert_eq!(reopened.list_models().expect("list").len(), 1);
}
