//! Identity tokens
//!
//! An [`IdToken`] wraps the encoded JWT issued by the user pool. The encoded
//! string is what goes on the wire; the claims can be inspected locally but
//! are never verified here (that is the API gateway's job).

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Number of leading characters shown when a token is logged or debug-printed
const PREVIEW_CHARS: usize = 8;

/// Claims carried by a user pool ID token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdTokenClaims {
    pub sub: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(
        rename = "cognito:username",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_use: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiry as seconds since the epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Any other claims (custom attributes, groups, ...)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// An encoded ID token
#[derive(Clone, PartialEq, Eq)]
pub struct IdToken {
    jwt: String,
}

impl IdToken {
    pub fn new(jwt: impl Into<String>) -> Self {
        Self { jwt: jwt.into() }
    }

    /// The encoded token string, exactly as issued
    pub fn jwt_token(&self) -> &str {
        &self.jwt
    }

    /// Decode the payload claims without verifying the signature
    pub fn decode_payload(&self) -> Result<IdTokenClaims, TokenError> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<IdTokenClaims>(
            &self.jwt,
            &DecodingKey::from_secret(&[]),
            &validation,
        )?;

        Ok(data.claims)
    }

    /// Expiry time, if the token decodes and carries an `exp` claim
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        let exp = self.decode_payload().ok()?.exp?;
        Utc.timestamp_opt(exp, 0).single()
    }

    /// A short, log-safe prefix of the encoded token
    pub fn preview(&self) -> String {
        match self.jwt.char_indices().nth(PREVIEW_CHARS) {
            Some((idx, _)) => format!("{}...", &self.jwt[..idx]),
            None => self.jwt.clone(),
        }
    }
}

impl fmt::Debug for IdToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IdToken").field(&self.preview()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header};

    fn claims(exp: Option<i64>) -> IdTokenClaims {
        IdTokenClaims {
            sub: "3f1c2a4e-user".to_string(),
            email: Some("user@example.com".to_string()),
            username: Some("user1".to_string()),
            iss: Some(
                "https://cognito-idp.ap-northeast-1.amazonaws.com/ap-northeast-1_abc".to_string(),
            ),
            aud: Some("client-id".to_string()),
            token_use: Some("id".to_string()),
            iat: Some(1_700_000_000),
            exp,
            extra: HashMap::from([(
                "cognito:groups".to_string(),
                serde_json::json!(["admins"]),
            )]),
        }
    }

    fn encode(claims: &IdTokenClaims) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(b"any-key"),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_payload_ignores_signature_and_expiry() {
        // Expired long ago; decoding must still succeed
        let original = claims(Some(1_000));
        let token = IdToken::new(encode(&original));

        let decoded = token.decode_payload().unwrap();
        assert_eq!(decoded, original);
        assert_eq!(decoded.username.as_deref(), Some("user1"));
        assert_eq!(decoded.extra["cognito:groups"], serde_json::json!(["admins"]));
    }

    #[test]
    fn test_expiration() {
        let token = IdToken::new(encode(&claims(Some(1_900_000_000))));
        assert_eq!(token.expiration().unwrap().timestamp(), 1_900_000_000);

        let no_exp = IdToken::new(encode(&claims(None)));
        assert!(no_exp.expiration().is_none());
    }

    #[test]
    fn test_malformed_token() {
        let token = IdToken::new("abc.def.ghi");
        assert!(matches!(token.decode_payload(), Err(TokenError::Malformed(_))));
        assert!(token.expiration().is_none());
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let token = IdToken::new("eyJhbGciOiJIUzI1NiJ9.secret-payload.signature");
        let printed = format!("{:?}", token);
        assert_eq!(printed, "IdToken(\"eyJhbGci...\")");
        assert!(!printed.contains("secret-payload"));

        assert_eq!(IdToken::new("short").preview(), "short");
    }
}
