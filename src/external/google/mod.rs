//! Google Cloud plumbing: service account credentials and OAuth2 access
//! tokens shared by the FCM provider and the Firestore delivery log.

mod auth;
mod credentials;

pub use auth::{AuthError, ServiceAccountTokenSource, TokenSource};
pub use credentials::{CredentialError, ServiceAccountKey};

/// OAuth2 scopes requested for every access token
pub const SCOPES: &str =
    "https://www.googleapis.com/auth/firebase.messaging https://www.googleapis.com/auth/datastore";
