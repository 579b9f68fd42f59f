use chat_client::payload::{completion_body, ChatSendRequest};
use chat_protocol::{ChatErrorKind, ChatMessage};
use profile_store::{ModelProfile, Purpose};
use serde_json::json;

fn profile(temperature: Option<f64>, max_tokens: Option<u32>) -> ModelProfile {
    ModelProfile {
        id: "profile-1".to_string(),
        label: "Llama".to_string(),
        model_id: "llama-3".to_string(),
        endpoint_profile_id: "endpoint-1".to_string(),
        purpose: Purpose::Chat,
        is_default: true,
        temperature,
        max_tokens,
        created_at: 0,
        updated_at: 0,
    }
}

#[test]
fn body_strips_messages_to_role_and_content() {
    let messages = vec![
        ChatMessage::system("be brief"),
        ChatMessage::user("fix the bug in parser.js"),
    ];
    let profile = profile(Some(0.7), Some(2048));
    let body = completion_body(&profile, &messages, true);
    let value = serde_json::to_value(&body).expect("serialize body");

    assert_eq!(
        value,
        json!({
            "model": "llama-3",
            "messages": [
                {"role": "system", "content": "be brief"},
                {"role": "user", "content": "fix the bug in parser.js"},
            ],
            "temperature": 0.7,
            "max_tokens": 2048,
            "stream": true,
        })
    );
}

#[test]
fn absent_sampling_fields_are_omitted() {
    let messages = vec![ChatMessage::user("hello")];
    let profile = profile(None, None);
    let body = completion_body(&profile, &messages, false);
    let value = serde_json::to_value(&body).expect("serialize body");

    assert!(value.get("temperature").is_none());
    assert!(value.get("max_tokens").is_none());
    assert_eq!(value["stream"], false);
}

#[test]
fn validate_rejects_blank_profile_id() {
    let request = ChatSendRequest::new("   ", vec![ChatMessage::user("hello")]);
    let error = request.validate().expect_err("blank profile id is invalid");
    assert_eq!(error.kind, ChatErrorKind::ValidationError);
}

#[test]
fn validate_rejects_empty_history() {
    let request = ChatSendRequest::new("profile-1", Vec::new());
    let error = request.validate().expect_err("empty history is invalid");
    assert_eq!(error.kind, ChatErrorKind::ValidationError);
}

#[test]
fn validate_accepts_well_formed_input() {
    let request = ChatSendRequest::new("profile-1", vec![ChatMessage::user("hello")]);
    assert!(request.validate().is_ok());
}
