//! Service account key decoding and validation

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Deserialize;
use thiserror::Error;

use crate::config::FirebaseConfig;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const SERVICE_ACCOUNT_TYPE: &str = "service_account";

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Reasons a service account cannot be turned into a working client.
/// All of them stop the process at startup.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error(
        "No service account configured. Set FIREBASE_CRED_JSON or firebase.credentials_file"
    )]
    Missing,

    #[error("Service account blob is not valid base64")]
    Base64(#[source] base64::DecodeError),

    #[error("Failed to read service account file '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Service account JSON is malformed")]
    Json(#[source] serde_json::Error),

    #[error("Unsupported credential type '{0}', expected 'service_account'")]
    WrongType(String),

    #[error("Service account is missing '{0}'")]
    MissingField(&'static str),

    #[error("Service account private key cannot be parsed")]
    PrivateKey(#[source] jsonwebtoken::errors::Error),
}

/// The subset of a Google service account JSON key pushnote needs
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub credential_type: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub private_key_id: String,
    #[serde(default)]
    pub private_key: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountKey {
    /// Resolve the key from configuration.
    ///
    /// Uses the base64 blob when present, otherwise the key file. A
    /// configured `token_uri` replaces the one embedded in the key.
    pub fn from_config(config: &FirebaseConfig) -> Result<Self, CredentialError> {
        let blob = config
            .credentials
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty());

        let mut key = match (blob, config.credentials_file.as_deref()) {
            (Some(blob), _) => Self::from_base64(blob)?,
            (None, Some(path)) => Self::from_file(Path::new(path))?,
            (None, None) => return Err(CredentialError::Missing),
        };

        if let Some(token_uri) = &config.token_uri {
            key.token_uri = token_uri.clone();
        }

        Ok(key)
    }

    /// Decode a base64-encoded JSON key. Embedded whitespace is ignored.
    pub fn from_base64(blob: &str) -> Result<Self, CredentialError> {
        let cleaned: String = blob.chars().filter(|c| !c.is_whitespace()).collect();
        let json = STANDARD.decode(cleaned).map_err(CredentialError::Base64)?;
        Self::from_json(&json)
    }

    pub fn from_file(path: &Path) -> Result<Self, CredentialError> {
        let json = std::fs::read(path).map_err(|source| CredentialError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &[u8]) -> Result<Self, CredentialError> {
        let key: Self = serde_json::from_slice(json).map_err(CredentialError::Json)?;
        key.validate()?;
        Ok(key)
    }

    fn validate(&self) -> Result<(), CredentialError> {
        if self.credential_type != SERVICE_ACCOUNT_TYPE {
            return Err(CredentialError::WrongType(self.credential_type.clone()));
        }

        let required = [
            ("project_id", &self.project_id),
            ("client_email", &self.client_email),
            ("private_key", &self.private_key),
        ];
        if let Some((name, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(CredentialError::MissingField(*name));
        }

        // PEM decoding alone accepts structurally broken keys; signing does not
        let key = self.encoding_key()?;
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &serde_json::json!({}), &key)
            .map(|_| ())
            .map_err(CredentialError::PrivateKey)
    }

    /// RS256 signing key from the PEM-encoded private key
    pub fn encoding_key(&self) -> Result<EncodingKey, CredentialError> {
        EncodingKey::from_rsa_pem(self.private_key.as_bytes()).map_err(CredentialError::PrivateKey)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const FIXTURE: &str = include_str!("../../../tests/fixtures/service-account.json");

    fn fixture_value() -> serde_json::Value {
        serde_json::from_str(FIXTURE).unwrap()
    }

    fn encode(value: &serde_json::Value) -> String {
        STANDARD.encode(serde_json::to_vec(value).unwrap())
    }

    #[test]
    fn test_decodes_base64_service_account() {
        let key = ServiceAccountKey::from_base64(&STANDARD.encode(FIXTURE)).unwrap();
        assert_eq!(key.project_id, "pushnote-test");
        assert_eq!(key.client_email, "pushnote@pushnote-test.iam.gserviceaccount.com");
        assert_eq!(key.token_uri, "https://oauth2.googleapis.com/token");
    }

    #[test]
    fn test_whitespace_in_blob_is_ignored() {
        let encoded = STANDARD.encode(FIXTURE);
        let (head, tail) = encoded.split_at(40);
        let wrapped = format!("  {}\n{}\n", head, tail);
        assert!(ServiceAccountKey::from_base64(&wrapped).is_ok());
    }

    #[test]
    fn test_bad_base64() {
        assert!(matches!(
            ServiceAccountKey::from_base64("not base64 at all!"),
            Err(CredentialError::Base64(_))
        ));
    }

    #[test]
    fn test_bad_json() {
        let blob = STANDARD.encode("{not json");
        assert!(matches!(
            ServiceAccountKey::from_base64(&blob),
            Err(CredentialError::Json(_))
        ));
    }

    #[test]
    fn test_wrong_credential_type() {
        let mut value = fixture_value();
        value["type"] = "authorized_user".into();
        match ServiceAccountKey::from_base64(&encode(&value)) {
            Err(CredentialError::WrongType(t)) => assert_eq!(t, "authorized_user"),
            other => panic!("Expected WrongType, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_project_id() {
        let mut value = fixture_value();
        value.as_object_mut().unwrap().remove("project_id");
        assert!(matches!(
            ServiceAccountKey::from_base64(&encode(&value)),
            Err(CredentialError::MissingField("project_id"))
        ));
    }

    #[test]
    fn test_unparsable_private_key() {
        let mut value = fixture_value();
        value["private_key"] = "not a pem encoded key".into();
        assert!(matches!(
            ServiceAccountKey::from_base64(&encode(&value)),
            Err(CredentialError::PrivateKey(_))
        ));
    }

    #[test]
    fn test_from_config_prefers_blob_and_applies_token_uri() {
        let config = FirebaseConfig {
            credentials: Some(STANDARD.encode(FIXTURE)),
            token_uri: Some("http://127.0.0.1:9/token".to_string()),
            ..Default::default()
        };
        let key = ServiceAccountKey::from_config(&config).unwrap();
        assert_eq!(key.token_uri, "http://127.0.0.1:9/token");
    }

    #[test]
    fn test_from_config_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("key.json");
        std::fs::write(&path, FIXTURE).unwrap();

        let config = FirebaseConfig {
            credentials_file: Some(path.display().to_string()),
            ..Default::default()
        };
        assert_eq!(
            ServiceAccountKey::from_config(&config).unwrap().project_id,
            "pushnote-test"
        );
    }

    #[test]
    fn test_from_config_without_credentials() {
        let config = FirebaseConfig {
            credentials: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ServiceAccountKey::from_config(&config),
            Err(CredentialError::Missing)
        ));
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let key = ServiceAccountKey::from_json(FIXTURE.as_bytes()).unwrap();
        let rendered = format!("{:?}", key);
        assert!(!rendered.contains("BEGIN PRIVATE KEY"));
    }
}
