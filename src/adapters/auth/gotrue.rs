//! GoTrue-compatible HTTP adapter for the auth sub-service.
//!
//! Implements the `AuthGateway` port against a GoTrue-style REST API
//! (password-grant sign-in, user fetch, logout). The adapter caches the
//! session it obtains and broadcasts lifecycle changes so the session
//! store can follow along.
//!
//! The access token's `exp` claim is read locally without verifying the
//! signature. The claim is only used to judge local expiry; the backend
//! re-validates every request anyway.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::foundation::{AuthError, Session, Timestamp, UserId, UserMetadata};
use crate::ports::{AuthGateway, SessionChange};

const CHANNEL_CAPACITY: usize = 16;

/// Configuration for the GoTrue adapter.
#[derive(Clone)]
pub struct GoTrueConfig {
    /// Base URL of the auth service (e.g. "https://auth.brandreach.io").
    pub base_url: String,

    /// Public API key sent as the `apikey` header.
    pub api_key: SecretString,

    /// How close to expiry a token is still considered current.
    pub expiry_margin: Duration,
}

impl GoTrueConfig {
    /// Create a new configuration with required fields.
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            expiry_margin: Duration::from_secs(60),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl From<&crate::config::AuthConfig> for GoTrueConfig {
    fn from(config: &crate::config::AuthConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            expiry_margin: Duration::from_secs(config.refresh_margin_secs),
        }
    }
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: UserPayload,
}

/// GoTrue user object.
#[derive(Debug, Deserialize)]
struct UserPayload {
    id: Uuid,
    email: String,
    #[serde(default)]
    email_confirmed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    user_metadata: MetadataPayload,
}

#[derive(Debug, Default, Deserialize)]
struct MetadataPayload {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
}

impl UserPayload {
    fn into_session(self, access_token: String) -> Session {
        Session::new(
            UserId::from_uuid(self.id),
            self.email,
            self.email_confirmed_at.map(Timestamp::from_datetime),
            access_token,
        )
        .with_metadata(UserMetadata {
            display_name: self.user_metadata.display_name,
            avatar_url: self.user_metadata.avatar_url,
        })
    }
}

/// Expiry-only claim view of an access token.
#[derive(Debug, Deserialize)]
struct ExpClaims {
    exp: i64,
}

/// Reads the `exp` claim without verifying the signature.
fn token_expiry(access_token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<ExpClaims>(access_token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    Utc.timestamp_opt(data.claims.exp, 0).single()
}

/// HTTP `AuthGateway` against a GoTrue-compatible endpoint.
pub struct GoTrueGateway {
    http: reqwest::Client,
    config: GoTrueConfig,
    session: RwLock<Option<Session>>,
    changes: broadcast::Sender<SessionChange>,
}

impl GoTrueGateway {
    /// Creates a gateway with nobody signed in.
    pub fn new(config: GoTrueConfig) -> Self {
        let (changes, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            http: reqwest::Client::new(),
            config,
            session: RwLock::new(None),
            changes,
        }
    }

    /// Signs in with the password grant and caches the resulting session.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let response = self
            .http
            .post(self.config.endpoint("/token?grant_type=password"))
            .header("apikey", self.config.api_key.expose_secret())
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::service_unavailable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::BAD_REQUEST
            || response.status() == reqwest::StatusCode::UNAUTHORIZED
        {
            return Err(AuthError::SignInRejected);
        }
        let token: TokenResponse = response
            .error_for_status()
            .map_err(|e| AuthError::service_unavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::service_unavailable(e.to_string()))?;

        let session = token.user.into_session(token.access_token);
        *self.session.write().await = Some(session.clone());
        let _ = self.changes.send(SessionChange::SignedIn(session.clone()));
        Ok(session)
    }

    /// Re-fetches the user behind an access token and replaces the cached
    /// session (token refresh path).
    pub async fn refresh_user(&self, access_token: &str) -> Result<Session, AuthError> {
        let user: UserPayload = self
            .http
            .get(self.config.endpoint("/user"))
            .header("apikey", self.config.api_key.expose_secret())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::service_unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|_| AuthError::InvalidSession)?
            .json()
            .await
            .map_err(|e| AuthError::service_unavailable(e.to_string()))?;

        let session = user.into_session(access_token.to_string());
        *self.session.write().await = Some(session.clone());
        let _ = self
            .changes
            .send(SessionChange::TokenRefreshed(session.clone()));
        Ok(session)
    }

    fn is_current(&self, session: &Session) -> bool {
        match token_expiry(&session.access_token) {
            Some(expiry) => {
                let margin = chrono::Duration::from_std(self.config.expiry_margin)
                    .unwrap_or_else(|_| chrono::Duration::seconds(60));
                expiry - margin > Utc::now()
            }
            // Opaque token: let the backend be the judge.
            None => true,
        }
    }
}

#[async_trait]
impl AuthGateway for GoTrueGateway {
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        let cached = self.session.read().await.clone();
        match cached {
            Some(session) if self.is_current(&session) => Ok(Some(session)),
            Some(_) => {
                debug!("cached session expired locally, dropping it");
                *self.session.write().await = None;
                let _ = self.changes.send(SessionChange::SignedOut);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.changes.subscribe()
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let token = self
            .session
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone());

        if let Some(token) = token {
            let result = self
                .http
                .post(self.config.endpoint("/logout"))
                .header("apikey", self.config.api_key.expose_secret())
                .bearer_auth(token)
                .send()
                .await;
            if let Err(error) = result {
                // The local session is destroyed regardless; the server
                // token will age out.
                warn!(%error, "logout request failed");
            }
        }

        *self.session.write().await = None;
        let _ = self.changes.send(SessionChange::SignedOut);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        exp: i64,
    }

    fn signed_token(exp: i64) -> String {
        encode(
            &Header::default(),
            &TestClaims {
                sub: "user-1".to_string(),
                exp,
            },
            &EncodingKey::from_secret(b"test-secret"),
        )
        .expect("sign test token")
    }

    #[test]
    fn token_expiry_reads_exp_without_the_signing_key() {
        let exp = Utc::now().timestamp() + 3600;
        let expiry = token_expiry(&signed_token(exp)).expect("expiry");
        assert_eq!(expiry.timestamp(), exp);
    }

    #[test]
    fn token_expiry_rejects_garbage() {
        assert!(token_expiry("not-a-jwt").is_none());
    }

    #[test]
    fn user_payload_maps_to_a_verified_session() {
        let json = serde_json::json!({
            "id": "7f1d6ad0-5f9a-4c39-9f3f-0d6b3a3d2b11",
            "email": "casey@example.com",
            "email_confirmed_at": "2024-03-01T10:00:00Z",
            "user_metadata": { "display_name": "Casey", "avatar_url": null }
        });
        let payload: UserPayload = serde_json::from_value(json).unwrap();
        let session = payload.into_session("tok".to_string());

        assert!(session.is_verified());
        assert_eq!(session.email, "casey@example.com");
        assert_eq!(session.metadata.display_name.as_deref(), Some("Casey"));
    }

    #[test]
    fn missing_confirmation_maps_to_an_unverified_session() {
        let json = serde_json::json!({
            "id": "7f1d6ad0-5f9a-4c39-9f3f-0d6b3a3d2b11",
            "email": "new@example.com"
        });
        let payload: UserPayload = serde_json::from_value(json).unwrap();
        let session = payload.into_session("tok".to_string());

        assert!(!session.is_verified());
        assert!(!session.can_read_rows());
    }

    #[test]
    fn token_response_parses_the_grant_shape() {
        let json = serde_json::json!({
            "access_token": "jwt-here",
            "token_type": "bearer",
            "expires_in": 3600,
            "user": {
                "id": "7f1d6ad0-5f9a-4c39-9f3f-0d6b3a3d2b11",
                "email": "casey@example.com",
                "email_confirmed_at": "2024-03-01T10:00:00Z"
            }
        });
        let token: TokenResponse = serde_json::from_value(json).unwrap();
        assert_eq!(token.access_token, "jwt-here");
        assert_eq!(token.user.email, "casey@example.com");
    }

    #[tokio::test]
    async fn expired_cached_session_resolves_to_none() {
        let config = GoTrueConfig::new(
            "http://localhost:9999",
            SecretString::new("anon".to_string()),
        );
        let gateway = GoTrueGateway::new(config);

        let expired = Session::new(
            UserId::new(),
            "old@example.com",
            Some(Timestamp::now()),
            signed_token(Utc::now().timestamp() - 10),
        );
        *gateway.session.write().await = Some(expired);

        assert!(gateway.current_session().await.unwrap().is_none());
    }
}
