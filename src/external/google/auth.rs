//! OAuth2 access tokens via the JWT bearer grant

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

use super::SCOPES;
use super::credentials::{CredentialError, ServiceAccountKey};
use crate::external::client::HTTP_CLIENT;

/// Lifetime requested for each signed assertion, in seconds
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Cached tokens are replaced this many seconds before they expire
const REFRESH_MARGIN_SECS: i64 = 60;

const GRANT_TYPE: &str = "urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to sign token assertion")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("Token endpoint request failed")]
    Transport(#[source] reqwest::Error),

    #[error("Token endpoint returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Supplies bearer tokens for Google APIs
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, AuthError>;
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    /// Unix seconds
    expires_at: i64,
}

impl CachedToken {
    fn is_fresh(&self, now: i64) -> bool {
        now + REFRESH_MARGIN_SECS < self.expires_at
    }
}

/// Token source backed by a service account key.
///
/// Tokens are cached behind an async `RwLock`; concurrent callers share one
/// token and only one of them refreshes it.
pub struct ServiceAccountTokenSource {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    cache: RwLock<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    pub fn new(key: ServiceAccountKey) -> Result<Self, CredentialError> {
        let encoding_key = key.encoding_key()?;
        Ok(Self {
            key,
            encoding_key,
            cache: RwLock::new(None),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.key.project_id
    }

    fn assertion(&self, now: i64) -> Result<String, AuthError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.key.private_key_id.clone()).filter(|k| !k.is_empty());

        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: SCOPES,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(AuthError::Signing)
    }

    async fn fetch(&self) -> Result<CachedToken, AuthError> {
        let now = jiff::Timestamp::now().as_second();
        let body = format!("grant_type={}&assertion={}", GRANT_TYPE, self.assertion(now)?);

        let response = HTTP_CLIENT
            .post(&self.key.token_uri)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body)
            .send()
            .await
            .map_err(AuthError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().await.map_err(AuthError::Transport)?;
        tracing::debug!(expires_in = token.expires_in, "Access token refreshed");

        Ok(CachedToken {
            token: token.access_token,
            expires_at: now + token.expires_in,
        })
    }
}

#[async_trait]
impl TokenSource for ServiceAccountTokenSource {
    async fn access_token(&self) -> Result<String, AuthError> {
        let now = jiff::Timestamp::now().as_second();

        if let Some(cached) = self.cache.read().await.as_ref()
            && cached.is_fresh(now)
        {
            return Ok(cached.token.clone());
        }

        let mut cache = self.cache.write().await;
        // Another caller may have refreshed while we waited for the lock
        if let Some(cached) = cache.as_ref()
            && cached.is_fresh(now)
        {
            return Ok(cached.token.clone());
        }

        let fresh = self.fetch().await?;
        let token = fresh.token.clone();
        *cache = Some(fresh);
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::google::credentials::tests::FIXTURE;
    use axum::{Router, extract::State, http::StatusCode, routing::post};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone)]
    struct FakeTokenEndpoint {
        hits: Arc<AtomicUsize>,
        expires_in: i64,
        status: StatusCode,
        last_body: Arc<std::sync::Mutex<String>>,
    }

    async fn issue(State(fake): State<FakeTokenEndpoint>, body: String) -> (StatusCode, String) {
        let n = fake.hits.fetch_add(1, Ordering::SeqCst) + 1;
        *fake.last_body.lock().unwrap() = body;
        let payload = serde_json::json!({
            "access_token": format!("token-{}", n),
            "expires_in": fake.expires_in,
            "token_type": "Bearer",
        });
        (fake.status, payload.to_string())
    }

    async fn spawn(fake: FakeTokenEndpoint) -> String {
        let app = Router::new().route("/token", post(issue)).with_state(fake);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/token", addr)
    }

    fn fake(expires_in: i64, status: StatusCode) -> FakeTokenEndpoint {
        FakeTokenEndpoint {
            hits: Arc::new(AtomicUsize::new(0)),
            expires_in,
            status,
            last_body: Arc::new(std::sync::Mutex::new(String::new())),
        }
    }

    fn source(token_uri: String) -> ServiceAccountTokenSource {
        let mut key = ServiceAccountKey::from_json(FIXTURE.as_bytes()).unwrap();
        key.token_uri = token_uri;
        ServiceAccountTokenSource::new(key).unwrap()
    }

    #[test]
    fn test_assertion_claims() {
        let source = source("https://oauth2.googleapis.com/token".to_string());
        let jwt = source.assertion(1_700_000_000).unwrap();

        let header = jsonwebtoken::decode_header(&jwt).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);
        assert_eq!(
            header.kid.as_deref(),
            Some("0123456789abcdef0123456789abcdef01234567")
        );

        let payload = jwt.split('.').nth(1).unwrap();
        let decoded = base64::Engine::decode(
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
            payload,
        )
        .unwrap();
        let claims: serde_json::Value = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(claims["iss"], "pushnote@pushnote-test.iam.gserviceaccount.com");
        assert_eq!(claims["aud"], "https://oauth2.googleapis.com/token");
        assert_eq!(claims["scope"], SCOPES);
        assert_eq!(claims["exp"], 1_700_003_600);
    }

    #[tokio::test]
    async fn test_token_is_cached() {
        let endpoint = fake(3600, StatusCode::OK);
        let hits = endpoint.hits.clone();
        let last_body = endpoint.last_body.clone();
        let source = source(spawn(endpoint).await);

        assert_eq!(source.access_token().await.unwrap(), "token-1");
        assert_eq!(source.access_token().await.unwrap(), "token-1");
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let body = last_body.lock().unwrap().clone();
        assert!(body.starts_with(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer&assertion="
        ));
    }

    #[tokio::test]
    async fn test_token_near_expiry_is_refreshed() {
        // Inside the refresh margin from the start
        let endpoint = fake(30, StatusCode::OK);
        let hits = endpoint.hits.clone();
        let source = source(spawn(endpoint).await);

        assert_eq!(source.access_token().await.unwrap(), "token-1");
        assert_eq!(source.access_token().await.unwrap(), "token-2");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_rejected_token_request() {
        let source = source(spawn(fake(3600, StatusCode::BAD_REQUEST)).await);
        match source.access_token().await {
            Err(AuthError::Rejected { status, .. }) => assert_eq!(status, 400),
            other => panic!("Expected Rejected, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_unreachable_token_endpoint() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = source(format!("http://{}/token", addr));
        assert!(matches!(
            source.access_token().await,
            Err(AuthError::Transport(_))
        ));
    }
}
