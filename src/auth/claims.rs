/// JWT claims structure
///
/// Payload carried by both access and refresh tokens: standard
/// registered claims (RFC 7519) plus the granted roles and a `typ`
/// discriminator separating the two token kinds.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Distinguishes access tokens from refresh tokens.
///
/// A refresh token must never authorize a resource request and an
/// access token must never mint new tokens; the validator enforces
/// this by comparing `typ` against the kind it expects.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// JWT claims for access and refresh tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Granted roles (empty for refresh tokens)
    #[serde(default)]
    pub roles: Vec<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
    /// Token kind
    pub typ: TokenKind,
    /// Unique token identifier
    pub jti: String,
}

impl Claims {
    /// Create new claims for a subject.
    ///
    /// `iat` is the current time and `exp` is `expiry_seconds` from
    /// now; `jti` is a fresh UUID so no two issued tokens are ever
    /// byte-identical, even within the same second.
    pub fn new(
        subject: String,
        roles: Vec<String>,
        expiry_seconds: i64,
        issuer: String,
        kind: TokenKind,
    ) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: subject,
            roles,
            exp: now + expiry_seconds,
            iat: now,
            iss: issuer,
            typ: kind,
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        self.exp < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_creation() {
        let claims = Claims::new(
            "alice".to_string(),
            vec!["user".to_string()],
            3600,
            "person-api".to_string(),
            TokenKind::Access,
        );

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.roles, vec!["user".to_string()]);
        assert_eq!(claims.iss, "person-api");
        assert_eq!(claims.typ, TokenKind::Access);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn expired_claims_are_detected() {
        let mut claims = Claims::new(
            "alice".to_string(),
            vec![],
            3600,
            "person-api".to_string(),
            TokenKind::Refresh,
        );
        claims.exp = claims.iat - 1;

        assert!(claims.is_expired());
    }

    #[test]
    fn token_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TokenKind::Access).unwrap(),
            "\"access\""
        );
        assert_eq!(
            serde_json::to_string(&TokenKind::Refresh).unwrap(),
            "\"refresh\""
        );
    }

    #[test]
    fn missing_roles_deserialize_to_empty() {
        let json = r#"{
            "sub": "alice",
            "exp": 2000000000,
            "iat": 1000000000,
            "iss": "person-api",
            "typ": "refresh",
            "jti": "abc"
        }"#;

        let claims: Claims = serde_json::from_str(json).unwrap();
        assert!(claims.roles.is_empty());
        assert_eq!(claims.typ, TokenKind::Refresh);
    }

    #[test]
    fn jti_is_unique_per_claims() {
        let a = Claims::new(
            "alice".to_string(),
            vec![],
            60,
            "person-api".to_string(),
            TokenKind::Access,
        );
        let b = Claims::new(
            "alice".to_string(),
            vec![],
            60,
            "person-api".to_string(),
            TokenKind::Access,
        );

        assert_ne!(a.jti, b.jti);
    }
}
