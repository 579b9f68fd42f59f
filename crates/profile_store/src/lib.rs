mod error;
mod lookup;
mod schema;
mod store;
mod validation;

pub use error::ProfileStoreError;
pub use lookup::{CredentialLookup, MemoryCredentialStore, ProfileLookup};
pub use schema::{
    EndpointPatch, EndpointPreset, EndpointProfile, ModelPatch, ModelProfile, NewEndpointProfile,
    NewModelProfile, ProfileDocument, Purpose,
};
pub use store::{ProfileStore, PROFILES_FILE_NAME};
pub use validation::{MAX_ENDPOINTS, MAX_MODELS};
