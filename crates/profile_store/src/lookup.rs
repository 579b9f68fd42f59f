use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::schema::{EndpointProfile, ModelProfile};

/// Read-only profile resolution consumed by the transport layer.
pub trait ProfileLookup: Send + Sync {
    fn model(&self, id: &str) -> Option<ModelProfile>;
    fn endpoint(&self, id: &str) -> Option<EndpointProfile>;
}

/// Secret lookup keyed by endpoint id. How secrets are physically stored is a
/// host concern; this is only the contract the pipeline needs.
pub trait CredentialLookup: Send + Sync {
    fn get(&self, endpoint_id: &str) -> Option<String>;
    fn set(&self, endpoint_id: &str, secret: &str);
    fn delete(&self, endpoint_id: &str);
}

/// In-process credential store for tests and hosts without an OS keychain.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    secrets: Mutex<BTreeMap<String, String>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialLookup for MemoryCredentialStore {
    fn get(&self, endpoint_id: &str) -> Option<String> {
        self.secrets
            .lock()
            .expect("credential store lock poisoned")
            .get(endpoint_id)
            .cloned()
    }

    fn set(&self, endpoint_id: &str, secret: &str) {
        self.secrets
            .lock()
            .expect("credential store lock poisoned")
            .insert(endpoint_id.to_string(), secret.to_string());
    }

    fn delete(&self, endpoint_id: &str) {
        self.secrets
            .lock()
            .expect("credential store lock poisoned")
            .remove(endpoint_id);
    }
}
