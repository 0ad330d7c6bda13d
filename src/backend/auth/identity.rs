/**
 * Identity Verification
 *
 * The identity provider owns sign-in. What reaches this backend is a session
 * credential (a JWT issued by the provider) that must be checked before the
 * request is trusted. `IdentityVerifier` is the seam; `JwtIdentityVerifier`
 * checks provider session tokens locally with the provider's public key (or
 * a shared secret in development).
 *
 * Verification never rejects a request by itself. The identity layer records
 * the outcome as a `VerifiedIdentity` and the credential mediator decides.
 */

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

/// Result of checking a request's credential
///
/// `user_id` is only meaningful when `is_authenticated` is true.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub is_authenticated: bool,
    pub user_id: Option<String>,
}

impl VerifiedIdentity {
    /// Identity of a request with no valid credential
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Identity of a request whose credential verified as `user_id`
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            is_authenticated: true,
            user_id: Some(user_id.into()),
        }
    }
}

/// Identity verification errors
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The credential is malformed or its signature does not verify
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// The credential has expired
    #[error("credential expired")]
    Expired,

    /// The credential was issued for a party this backend does not serve
    #[error("unauthorized party: {0}")]
    UnauthorizedParty(String),

    /// The verifier is misconfigured
    #[error("identity verifier misconfigured: {0}")]
    Config(String),
}

impl From<jsonwebtoken::errors::Error> for IdentityError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::InvalidCredential(err.to_string()),
        }
    }
}

/// Checks a session credential and yields the caller's identity
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, IdentityError>;
}

/// Key material used to check provider session tokens
#[derive(Debug, Clone)]
pub enum IdentityKey {
    /// PEM-encoded RSA public key (RS256)
    RsaPem(String),
    /// Shared secret (HS256)
    Secret(String),
}

/// Settings for `JwtIdentityVerifier`
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub key: IdentityKey,
    /// Expected `iss` claim, if any
    pub issuer: Option<String>,
    /// Allowed `azp` (authorized party) values; empty allows any
    pub authorized_parties: Vec<String>,
    /// Clock skew tolerance in seconds
    pub leeway_secs: u64,
}

impl IdentityConfig {
    pub fn new(key: IdentityKey) -> Self {
        Self {
            key,
            issuer: None,
            authorized_parties: Vec::new(),
            leeway_secs: 60,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_authorized_parties(mut self, parties: Vec<String>) -> Self {
        self.authorized_parties = parties;
        self
    }
}

#[derive(Debug, Deserialize)]
struct SessionClaims {
    sub: String,
    #[serde(default)]
    azp: Option<String>,
}

/// Verifies identity-provider session JWTs without a network round trip
pub struct JwtIdentityVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    authorized_parties: Vec<String>,
}

impl JwtIdentityVerifier {
    pub fn new(config: IdentityConfig) -> Result<Self, IdentityError> {
        let (decoding_key, algorithm) = match &config.key {
            IdentityKey::RsaPem(pem) => (
                DecodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|e| IdentityError::Config(format!("invalid public key: {}", e)))?,
                Algorithm::RS256,
            ),
            IdentityKey::Secret(secret) => {
                if secret.is_empty() {
                    return Err(IdentityError::Config("empty secret".to_string()));
                }
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = config.leeway_secs;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }

        Ok(Self {
            decoding_key,
            validation,
            authorized_parties: config.authorized_parties,
        })
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, IdentityError> {
        let claims = decode::<SessionClaims>(credential, &self.decoding_key, &self.validation)?.claims;

        if !self.authorized_parties.is_empty() {
            let azp = claims.azp.as_deref().unwrap_or_default();
            if !self.authorized_parties.iter().any(|party| party == azp) {
                return Err(IdentityError::UnauthorizedParty(azp.to_string()));
            }
        }

        if claims.sub.trim().is_empty() {
            return Ok(VerifiedIdentity::anonymous());
        }
        Ok(VerifiedIdentity::authenticated(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn sign(claims: serde_json::Value, secret: &str) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn verifier(config: IdentityConfig) -> JwtIdentityVerifier {
        JwtIdentityVerifier::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_valid_session_token() {
        let exp = Utc::now().timestamp() + 300;
        let token = sign(serde_json::json!({ "sub": "u_123", "exp": exp }), "idp-secret");

        let identity = verifier(IdentityConfig::new(IdentityKey::Secret("idp-secret".into())))
            .verify(&token)
            .await
            .unwrap();
        assert_eq!(identity, VerifiedIdentity::authenticated("u_123"));
    }

    #[tokio::test]
    async fn test_wrong_secret_rejected() {
        let exp = Utc::now().timestamp() + 300;
        let token = sign(serde_json::json!({ "sub": "u_123", "exp": exp }), "other");

        let result = verifier(IdentityConfig::new(IdentityKey::Secret("idp-secret".into())))
            .verify(&token)
            .await;
        assert!(matches!(result, Err(IdentityError::InvalidCredential(_))));
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let exp = Utc::now().timestamp() - 3600;
        let token = sign(serde_json::json!({ "sub": "u_123", "exp": exp }), "idp-secret");

        let result = verifier(IdentityConfig::new(IdentityKey::Secret("idp-secret".into())))
            .verify(&token)
            .await;
        assert!(matches!(result, Err(IdentityError::Expired)));
    }

    #[tokio::test]
    async fn test_issuer_mismatch_rejected() {
        let exp = Utc::now().timestamp() + 300;
        let token = sign(
            serde_json::json!({ "sub": "u_123", "exp": exp, "iss": "https://evil.example" }),
            "idp-secret",
        );

        let config = IdentityConfig::new(IdentityKey::Secret("idp-secret".into()))
            .with_issuer("https://idp.example");
        assert!(verifier(config).verify(&token).await.is_err());
    }

    #[tokio::test]
    async fn test_authorized_party_enforced() {
        let exp = Utc::now().timestamp() + 300;
        let token = sign(
            serde_json::json!({ "sub": "u_123", "exp": exp, "azp": "https://other.app" }),
            "idp-secret",
        );

        let config = IdentityConfig::new(IdentityKey::Secret("idp-secret".into()))
            .with_authorized_parties(vec!["https://fullslack.app".to_string()]);
        let result = verifier(config).verify(&token).await;
        assert!(matches!(result, Err(IdentityError::UnauthorizedParty(_))));
    }

    #[test]
    fn test_bad_pem_is_config_error() {
        let result = JwtIdentityVerifier::new(IdentityConfig::new(IdentityKey::RsaPem(
            "not a pem".into(),
        )));
        assert!(matches!(result, Err(IdentityError::Config(_))));
    }
}
