//! Bearer-token verification capability.
//!
//! The API trusts an external identity provider for authentication. Any
//! type that can turn a bearer token into stable claims plugs in through
//! [`TokenVerifier`], so the CRUD core never learns which provider sits in
//! front of it. Token issuance, refresh and OAuth flows stay with the
//! provider.

use std::collections::HashMap;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

/// Claims the API needs from a verified token.
#[derive(Clone, Debug)]
pub struct Claims {
    /// Stable user identifier issued by the provider.
    pub subject: String,
    pub email: Option<String>,
}

#[derive(Debug)]
pub struct VerifyError(pub String);

impl std::fmt::Display for VerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "token verification failed: {}", self.0)
    }
}

impl std::error::Error for VerifyError {}

pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Claims, VerifyError>;
}

#[derive(Deserialize)]
struct ProviderClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

/// Verifies RS256-signed provider tokens against the provider public key.
pub struct RsaTokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl RsaTokenVerifier {
    /// Build a verifier from a PEM-encoded RSA public key.
    pub fn from_rsa_pem(pem: &[u8]) -> Result<Self, VerifyError> {
        let key = DecodingKey::from_rsa_pem(pem).map_err(|err| VerifyError(err.to_string()))?;
        let mut validation = Validation::new(Algorithm::RS256);
        // The audience is provider-specific and not part of this API's contract.
        validation.validate_aud = false;
        Ok(Self { key, validation })
    }
}

impl TokenVerifier for RsaTokenVerifier {
    fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        let data = jsonwebtoken::decode::<ProviderClaims>(token, &self.key, &self.validation)
            .map_err(|err| VerifyError(err.to_string()))?;
        Ok(Claims {
            subject: data.claims.sub,
            email: data.claims.email,
        })
    }
}

/// Fixed token→claims map, for tests and local development.
#[derive(Debug, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, Claims>,
}

impl StaticTokenVerifier {
    pub fn with_token(mut self, token: &str, subject: &str, email: Option<&str>) -> Self {
        self.tokens.insert(
            token.to_string(),
            Claims {
                subject: subject.to_string(),
                email: email.map(str::to_string),
            },
        );
        self
    }
}

impl TokenVerifier for StaticTokenVerifier {
    fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| VerifyError("unknown token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_verifier_resolves_known_tokens() {
        let verifier =
            StaticTokenVerifier::default().with_token("tok", "user_1", Some("a@example.com"));
        let claims = verifier.verify("tok").unwrap();
        assert_eq!(claims.subject, "user_1");
        assert_eq!(claims.email.as_deref(), Some("a@example.com"));
    }

    #[test]
    fn static_verifier_rejects_unknown_tokens() {
        let verifier = StaticTokenVerifier::default();
        assert!(verifier.verify("nope").is_err());
    }
}
