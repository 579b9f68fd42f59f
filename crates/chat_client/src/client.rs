use std::sync::Arc;

use chat_protocol::{ChatMessage, ChatStreamEvent, Role, StreamPhase};
use futures_util::StreamExt;
use profile_store::{CredentialLookup, EndpointProfile, ModelProfile, ProfileLookup};
use reqwest::{Client, Response};
use serde_json::Value;

use crate::config::ChatClientConfig;
use crate::error::{error_for_status, parse_error_message, ChatError};
use crate::model_list::{normalize_model_list, ModelEntry};
use crate::payload::{completion_body, ChatSendRequest};
use crate::sse::{SseLineDecoder, StreamDelta};
use crate::url::{chat_completions_url, models_url};

/// Final result of a successful non-streaming completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletion {
    pub role: Role,
    pub content: String,
}

struct ResolvedProfile {
    model: ModelProfile,
    endpoint: EndpointProfile,
    secret: Option<String>,
}

/// Transport client for OpenAI-compatible chat completion endpoints.
///
/// Profile and secret resolution are injected; the client owns only HTTP,
/// request building, and stream decoding.
pub struct ChatClient {
    http: Client,
    profiles: Arc<dyn ProfileLookup>,
    credentials: Arc<dyn CredentialLookup>,
}

impl ChatClient {
    pub fn new(
        profiles: Arc<dyn ProfileLookup>,
        credentials: Arc<dyn CredentialLookup>,
    ) -> Result<Self, ChatError> {
        Self::with_config(ChatClientConfig::default(), profiles, credentials)
    }

    pub fn with_config(
        config: ChatClientConfig,
        profiles: Arc<dyn ProfileLookup>,
        credentials: Arc<dyn CredentialLookup>,
    ) -> Result<Self, ChatError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let http = builder.build().map_err(ChatError::from)?;
        Ok(Self {
            http,
            profiles,
            credentials,
        })
    }

    /// One-shot completion call sharing the streaming path's resolution and
    /// error mapping. Used by title inference and non-streaming callers.
    pub async fn send(&self, request: &ChatSendRequest) -> Result<ChatCompletion, ChatError> {
        request.validate()?;
        let resolved = self.resolve(&request.model_profile_id)?;

        let response = self
            .completion_request(&resolved, &request.messages, false)
            .send()
            .await?;
        let response = check_status(response).await?;
        let value = response
            .json::<Value>()
            .await
            .map_err(|_| ChatError::network("Invalid response body"))?;

        let content = value
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_owned();

        Ok(ChatCompletion {
            role: Role::Assistant,
            content,
        })
    }

    /// Drive one streaming completion call, translating every exit path into
    /// exactly one terminal event. This function never fails past its event
    /// boundary.
    pub async fn stream_with_events<F>(&self, request: &ChatSendRequest, mut emit: F)
    where
        F: FnMut(ChatStreamEvent),
    {
        if let Err(error) = self.stream_inner(request, &mut emit).await {
            tracing::debug!(kind = error.kind.as_str(), "stream terminated with error");
            emit(ChatStreamEvent::Error {
                kind: error.kind,
                message: error.message,
            });
        }
    }

    async fn stream_inner<F>(
        &self,
        request: &ChatSendRequest,
        emit: &mut F,
    ) -> Result<(), ChatError>
    where
        F: FnMut(ChatStreamEvent),
    {
        request.validate()?;
        let resolved = self.resolve(&request.model_profile_id)?;

        emit(ChatStreamEvent::Start {
            status: StreamPhase::Thinking,
        });

        let response = self
            .completion_request(&resolved, &request.messages, true)
            .send()
            .await?;
        let response = check_status(response).await?;

        emit(ChatStreamEvent::Status {
            status: StreamPhase::Writing,
        });

        let mut bytes = response.bytes_stream();
        let mut decoder = SseLineDecoder::default();
        let mut content = String::new();
        let mut saw_reasoning = false;

        while let Some(chunk) = bytes.next().await {
            let chunk = chunk?;
            for delta in decoder.feed(&chunk) {
                forward_delta(delta, emit, &mut content, &mut saw_reasoning);
            }
        }
        for delta in decoder.finish() {
            forward_delta(delta, emit, &mut content, &mut saw_reasoning);
        }

        if saw_reasoning {
            emit(ChatStreamEvent::ReasoningDone);
        }
        emit(ChatStreamEvent::Done {
            role: Role::Assistant,
            content,
        });
        Ok(())
    }

    /// Models advertised by an endpoint's `/models` route. An unparseable
    /// body normalizes to an empty list, not an error.
    pub async fn fetch_models(&self, endpoint_id: &str) -> Result<Vec<ModelEntry>, ChatError> {
        let (endpoint, secret) = self.resolve_endpoint(endpoint_id)?;
        let response = self
            .models_request(&endpoint, secret.as_deref())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::network(format!(
                "Failed to fetch models: {}",
                status.as_u16()
            )));
        }
        let Ok(value) = response.json::<Value>().await else {
            return Ok(Vec::new());
        };
        Ok(normalize_model_list(&value))
    }

    /// Probe an endpoint's `/models` route with the stored credential.
    pub async fn test_connection(&self, endpoint_id: &str) -> Result<(), ChatError> {
        let (endpoint, secret) = self.resolve_endpoint(endpoint_id)?;
        let response = self
            .models_request(&endpoint, secret.as_deref())
            .send()
            .await?;
        let status = response.status();
        if let Some(error) = error_for_status(status) {
            return Err(error);
        }
        if !status.is_success() {
            return Err(ChatError::network(format!(
                "Request failed: {}",
                status.as_u16()
            )));
        }
        Ok(())
    }

    fn resolve(&self, model_profile_id: &str) -> Result<ResolvedProfile, ChatError> {
        let model = self
            .profiles
            .model(model_profile_id.trim())
            .ok_or_else(|| ChatError::model_not_found("Model profile not found"))?;
        let endpoint = self
            .profiles
            .endpoint(&model.endpoint_profile_id)
            .ok_or_else(|| ChatError::model_not_found("Endpoint not found"))?;
        let secret = self.lookup_secret(&model.endpoint_profile_id);
        Ok(ResolvedProfile {
            model,
            endpoint,
            secret,
        })
    }

    fn resolve_endpoint(
        &self,
        endpoint_id: &str,
    ) -> Result<(EndpointProfile, Option<String>), ChatError> {
        let endpoint = self
            .profiles
            .endpoint(endpoint_id)
            .ok_or_else(|| ChatError::model_not_found("Endpoint not found"))?;
        Ok((endpoint, self.lookup_secret(endpoint_id)))
    }

    // Authorization is sent only when a non-blank secret exists; local and
    // optional-auth endpoints work without one.
    fn lookup_secret(&self, endpoint_id: &str) -> Option<String> {
        self.credentials
            .get(endpoint_id)
            .map(|secret| secret.trim().to_string())
            .filter(|secret| !secret.is_empty())
    }

    fn completion_request(
        &self,
        resolved: &ResolvedProfile,
        messages: &[ChatMessage],
        stream: bool,
    ) -> reqwest::RequestBuilder {
        let body = completion_body(&resolved.model, messages, stream);
        let mut request = self
            .http
            .post(chat_completions_url(&resolved.endpoint.base_url))
            .json(&body);
        if let Some(secret) = &resolved.secret {
            request = request.bearer_auth(secret);
        }
        request
    }

    fn models_request(
        &self,
        endpoint: &EndpointProfile,
        secret: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let mut request = self.http.get(models_url(&endpoint.base_url));
        if let Some(secret) = secret {
            request = request.bearer_auth(secret);
        }
        request
    }
}

/// Map a non-success status to the client error taxonomy. The well-known
/// statuses are classified before any body read; only the generic fallback
/// reads the body for a best-effort server message.
async fn check_status(response: Response) -> Result<Response, ChatError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if let Some(error) = error_for_status(status) {
        return Err(error);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ChatError::network(parse_error_message(status, &body)))
}

fn forward_delta<F>(delta: StreamDelta, emit: &mut F, content: &mut String, saw_reasoning: &mut bool)
where
    F: FnMut(ChatStreamEvent),
{
    match delta {
        StreamDelta::Content(chunk) => {
            content.push_str(&chunk);
            emit(ChatStreamEvent::Delta { chunk });
        }
        StreamDelta::Reasoning(chunk) => {
            *saw_reasoning = true;
            emit(ChatStreamEvent::Reasoning { chunk });
        }
    }
}
