//! Verification of the access tokens presented to protected routes.
//!
//! Tokens are checked offline against the realm's public key: the signature
//! must verify with an RSA algorithm, and `exp`/`nbf` are enforced when the
//! token carries them. No claim is required and the audience is not checked.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::jwt::AccessTokenVerifier;
//!
//! let verifier = AccessTokenVerifier::from_public_key(&realm_public_key, 0)?;
//! let claims = verifier.verify(&access_token)?;
//! println!("Verified token for {:?}", claims.preferred_username);
//! ```

use crate::error::{DomainErrorKind, Error, InternalErrorKind, VerificationErrorKind};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use log::*;
use service::config::Config;
use std::collections::HashSet;

pub use claims::AccessClaims;

mod claims;

/// The RSA family the realm may sign with.
const ALLOWED_ALGORITHMS: [Algorithm; 6] = [
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
];

const PEM_HEADER: &str = "-----BEGIN PUBLIC KEY-----";
const PEM_FOOTER: &str = "-----END PUBLIC KEY-----";

/// Verifies access tokens against one realm public key.
#[derive(Clone)]
pub struct AccessTokenVerifier {
    key: DecodingKey,
    leeway_secs: u64,
}

impl std::fmt::Debug for AccessTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenVerifier")
            .field("leeway_secs", &self.leeway_secs)
            .finish_non_exhaustive()
    }
}

impl AccessTokenVerifier {
    /// Builds a verifier from the configured realm public key and leeway.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let public_key = config.keycloak_realm_public_key().ok_or_else(|| {
            warn!("KEYCLOAK_REALM_PUBLIC_KEY is not set");
            Error::config("missing realm public key")
        })?;
        Self::from_public_key(&public_key, config.token_leeway_secs)
    }

    /// Builds a verifier from a PEM encoded public key, or from the bare base64
    /// body the Keycloak admin console shows.
    pub fn from_public_key(public_key: &str, leeway_secs: u64) -> Result<Self, Error> {
        let pem = normalize_public_key(public_key);
        let key = DecodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| {
            warn!("Failed to load realm public key: {:?}", e);
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
            }
        })?;

        Ok(Self { key, leeway_secs })
    }

    /// Verifies `token` and returns its claims.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, Error> {
        let header = decode_header(token)?;
        if !ALLOWED_ALGORITHMS.contains(&header.alg) {
            debug!("Rejecting access token signed with {:?}", header.alg);
            return Err(Error {
                source: None,
                error_kind: DomainErrorKind::Verification(
                    VerificationErrorKind::UnsupportedAlgorithm,
                ),
            });
        }

        let mut validation = Validation::new(header.alg);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.leeway = self.leeway_secs;

        let data = decode::<AccessClaims>(token, &self.key, &validation)?;
        Ok(data.claims)
    }
}

/// Wraps a bare base64 key body in PEM armor. Literal `\n` sequences, as they
/// often arrive from `.env` files, are turned into line breaks first.
fn normalize_public_key(public_key: &str) -> String {
    let key = public_key.trim().replace("\\n", "\n");
    if key.starts_with("-----BEGIN") {
        return key;
    }

    let body: String = key.chars().filter(|c| !c.is_whitespace()).collect();
    let lines: Vec<&str> = body
        .as_bytes()
        .chunks(64)
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
        .collect();

    format!("{PEM_HEADER}\n{}\n{PEM_FOOTER}\n", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;
    use std::time::{SystemTime, UNIX_EPOCH};

    const PRIVATE_KEY: &str = include_str!("../../tests/fixtures/rsa_private.pem");
    const PUBLIC_KEY: &str = include_str!("../../tests/fixtures/rsa_public.pem");
    const PUBLIC_KEY_BASE64: &str = include_str!("../../tests/fixtures/rsa_public.b64");
    const OTHER_PUBLIC_KEY: &str = include_str!("../../tests/fixtures/other_public.pem");

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64
    }

    fn sign(alg: Algorithm, claims: serde_json::Value) -> String {
        let key = EncodingKey::from_rsa_pem(PRIVATE_KEY.as_bytes()).unwrap();
        encode(&Header::new(alg), &claims, &key).unwrap()
    }

    fn verifier() -> AccessTokenVerifier {
        AccessTokenVerifier::from_public_key(PUBLIC_KEY, 0).unwrap()
    }

    fn verification_kind(result: Result<AccessClaims, Error>) -> VerificationErrorKind {
        match result.unwrap_err().error_kind {
            DomainErrorKind::Verification(kind) => kind,
            other => panic!("expected a verification error, got {other:?}"),
        }
    }

    #[test]
    fn test_verify_accepts_valid_token() {
        let token = sign(
            Algorithm::RS256,
            json!({
                "sub": "user-1",
                "preferred_username": "alice",
                "exp": now() + 300,
                "realm_access": { "roles": ["user"] }
            }),
        );

        let claims = verifier().verify(&token).unwrap();

        assert_eq!(claims.sub.as_deref(), Some("user-1"));
        assert_eq!(claims.preferred_username.as_deref(), Some("alice"));
        assert_eq!(claims.extra["realm_access"], json!({ "roles": ["user"] }));
    }

    #[test]
    fn test_verify_accepts_token_without_registered_claims() {
        let token = sign(Algorithm::RS256, json!({ "name": "no exp" }));
        let claims = verifier().verify(&token).unwrap();
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn test_verify_accepts_other_rsa_algorithms() {
        for alg in [Algorithm::RS384, Algorithm::RS512, Algorithm::PS256] {
            let token = sign(alg, json!({ "exp": now() + 300 }));
            assert!(verifier().verify(&token).is_ok(), "{alg:?}");
        }
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let token = sign(Algorithm::RS256, json!({ "exp": now() - 120 }));
        assert_eq!(
            verification_kind(verifier().verify(&token)),
            VerificationErrorKind::Expired
        );
    }

    #[test]
    fn test_leeway_tolerates_recent_expiry() {
        let token = sign(Algorithm::RS256, json!({ "exp": now() - 5 }));
        let lenient = AccessTokenVerifier::from_public_key(PUBLIC_KEY, 60).unwrap();
        assert!(lenient.verify(&token).is_ok());
    }

    #[test]
    fn test_verify_rejects_token_not_yet_valid() {
        let token = sign(
            Algorithm::RS256,
            json!({ "nbf": now() + 600, "exp": now() + 1200 }),
        );
        assert_eq!(
            verification_kind(verifier().verify(&token)),
            VerificationErrorKind::NotYetValid
        );
    }

    #[test]
    fn test_verify_rejects_signature_from_other_key() {
        let token = sign(Algorithm::RS256, json!({ "exp": now() + 300 }));
        let other = AccessTokenVerifier::from_public_key(OTHER_PUBLIC_KEY, 0).unwrap();
        assert_eq!(
            verification_kind(other.verify(&token)),
            VerificationErrorKind::InvalidSignature
        );
    }

    #[test]
    fn test_verify_rejects_hmac_token() {
        let token = encode(
            &Header::new(Algorithm::HS256),
            &json!({ "exp": now() + 300 }),
            &EncodingKey::from_secret(PUBLIC_KEY.as_bytes()),
        )
        .unwrap();
        assert_eq!(
            verification_kind(verifier().verify(&token)),
            VerificationErrorKind::UnsupportedAlgorithm
        );
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert_eq!(
            verification_kind(verifier().verify("not-a-jwt")),
            VerificationErrorKind::Malformed
        );
    }

    #[test]
    fn test_bare_base64_key_is_accepted() {
        let token = sign(Algorithm::RS256, json!({ "exp": now() + 300 }));
        let verifier = AccessTokenVerifier::from_public_key(PUBLIC_KEY_BASE64, 0).unwrap();
        assert!(verifier.verify(&token).is_ok());
    }

    #[test]
    fn test_escaped_newlines_are_accepted() {
        let escaped = PUBLIC_KEY.trim().replace('\n', "\\n");
        assert!(AccessTokenVerifier::from_public_key(&escaped, 0).is_ok());
    }

    #[test]
    fn test_invalid_key_is_a_config_error() {
        let err = AccessTokenVerifier::from_public_key("not a key", 0).unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Config)
        );
    }

    #[test]
    fn test_normalize_wraps_body_in_64_char_lines() {
        let pem = normalize_public_key(PUBLIC_KEY_BASE64);
        let mut lines = pem.lines();
        assert_eq!(lines.next(), Some(PEM_HEADER));
        assert!(lines.clone().all(|l| l.len() <= 64));
        assert_eq!(pem.lines().last(), Some(PEM_FOOTER));
    }
}
