/// Token issuance and validation
///
/// Mints HS256-signed access/refresh token pairs and checks presented
/// tokens: signature first, then expiry, then token kind. Claims from
/// a token whose signature did not verify are never inspected.

use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::{Claims, TokenKind};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};
use crate::identity::Identity;

/// An access token and the refresh token minted alongside it.
///
/// The access token carries the identity's roles and expires first;
/// the refresh token carries no roles and outlives it.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issue a new access/refresh token pair for an authenticated identity.
///
/// # Errors
/// Returns an error if signing fails.
pub fn issue_token_pair(identity: &Identity, config: &JwtSettings) -> Result<TokenPair, AppError> {
    let access_claims = Claims::new(
        identity.username.clone(),
        identity.roles.clone(),
        config.access_token_expiry,
        config.issuer.clone(),
        TokenKind::Access,
    );

    let refresh_claims = Claims::new(
        identity.username.clone(),
        Vec::new(),
        config.refresh_token_expiry,
        config.issuer.clone(),
        TokenKind::Refresh,
    );

    Ok(TokenPair {
        access_token: sign(&access_claims, config)?,
        refresh_token: sign(&refresh_claims, config)?,
    })
}

fn sign(claims: &Claims, config: &JwtSettings) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
}

/// Validate a presented token and extract its claims.
///
/// Checks, in order: structure, signature, expiry, and finally that
/// the token kind matches `expected_kind` (an access token cannot be
/// used to refresh and a refresh token cannot authorize a resource).
///
/// # Errors
/// `Malformed`, `BadSignature`, `Expired`, or `WrongTokenKind`.
pub fn validate_token(
    token: &str,
    expected_kind: TokenKind,
    config: &JwtSettings,
) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);
    // Strict expiry: no clock-skew grace window
    validation.leeway = 0;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        let reason = match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidSignature => AuthError::BadSignature,
            // Anything else is structural: not a token this process minted
            _ => AuthError::Malformed,
        };
        tracing::warn!(error = %e, "Token validation failed");
        AppError::Auth(reason)
    })?;

    if claims.typ != expected_kind {
        tracing::warn!(
            subject = %claims.sub,
            presented = %claims.typ,
            expected = %expected_kind,
            "Token kind mismatch"
        );
        return Err(AppError::Auth(AuthError::WrongTokenKind));
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_config() -> JwtSettings {
        JwtSettings {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604800,
            issuer: "person-api".to_string(),
        }
    }

    fn test_identity() -> Identity {
        Identity {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            password_hash: "unused".to_string(),
            roles: vec!["user".to_string()],
            enabled: true,
        }
    }

    fn assert_auth_error(result: Result<Claims, AppError>, expected: AuthError) {
        match result {
            Err(AppError::Auth(e)) => assert_eq!(e, expected),
            other => panic!("expected {:?}, got {:?}", expected, other),
        }
    }

    #[test]
    fn issued_access_token_round_trips() {
        let config = test_config();
        let pair = issue_token_pair(&test_identity(), &config).unwrap();

        let claims = validate_token(&pair.access_token, TokenKind::Access, &config).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.roles, vec!["user".to_string()]);
        assert_eq!(claims.typ, TokenKind::Access);
    }

    #[test]
    fn issued_refresh_token_round_trips() {
        let config = test_config();
        let pair = issue_token_pair(&test_identity(), &config).unwrap();

        let claims = validate_token(&pair.refresh_token, TokenKind::Refresh, &config).unwrap();
        assert_eq!(claims.sub, "alice");
        assert!(claims.roles.is_empty());
        assert_eq!(claims.typ, TokenKind::Refresh);
    }

    #[test]
    fn access_token_expires_before_refresh_token() {
        let config = test_config();
        let pair = issue_token_pair(&test_identity(), &config).unwrap();

        let access = validate_token(&pair.access_token, TokenKind::Access, &config).unwrap();
        let refresh = validate_token(&pair.refresh_token, TokenKind::Refresh, &config).unwrap();

        assert!(access.exp < refresh.exp);
    }

    #[test]
    fn consecutive_pairs_are_distinct() {
        let config = test_config();
        let identity = test_identity();

        let first = issue_token_pair(&identity, &config).unwrap();
        let second = issue_token_pair(&identity, &config).unwrap();

        assert_ne!(first.access_token, second.access_token);
        assert_ne!(first.refresh_token, second.refresh_token);
    }

    #[test]
    fn garbage_is_malformed() {
        let config = test_config();
        assert_auth_error(
            validate_token("not.a.token", TokenKind::Access, &config),
            AuthError::Malformed,
        );
        assert_auth_error(
            validate_token("", TokenKind::Access, &config),
            AuthError::Malformed,
        );
    }

    #[test]
    fn token_signed_with_other_secret_fails_signature_check() {
        let config = test_config();
        let mut other = test_config();
        other.secret = "a-completely-different-secret-also-32-chars!".to_string();

        let pair = issue_token_pair(&test_identity(), &other).unwrap();

        assert_auth_error(
            validate_token(&pair.access_token, TokenKind::Access, &config),
            AuthError::BadSignature,
        );
    }

    #[test]
    fn tampered_payload_fails_signature_check() {
        let config = test_config();
        let pair = issue_token_pair(&test_identity(), &config).unwrap();

        // Swap the payload segment for one from a differently-signed token
        let mut other = test_config();
        other.secret = "a-completely-different-secret-also-32-chars!".to_string();
        let foreign = issue_token_pair(&test_identity(), &other).unwrap();

        let original: Vec<&str> = pair.access_token.split('.').collect();
        let donor: Vec<&str> = foreign.access_token.split('.').collect();
        let tampered = format!("{}.{}.{}", original[0], donor[1], original[2]);

        assert_auth_error(
            validate_token(&tampered, TokenKind::Access, &config),
            AuthError::BadSignature,
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config();

        let mut claims = Claims::new(
            "alice".to_string(),
            vec![],
            900,
            config.issuer.clone(),
            TokenKind::Access,
        );
        claims.iat -= 1000;
        claims.exp = claims.iat + 900; // already past

        let token = sign(&claims, &config).unwrap();

        assert_auth_error(
            validate_token(&token, TokenKind::Access, &config),
            AuthError::Expired,
        );
    }

    #[test]
    fn wrong_kind_is_rejected_both_ways() {
        let config = test_config();
        let pair = issue_token_pair(&test_identity(), &config).unwrap();

        assert_auth_error(
            validate_token(&pair.refresh_token, TokenKind::Access, &config),
            AuthError::WrongTokenKind,
        );
        assert_auth_error(
            validate_token(&pair.access_token, TokenKind::Refresh, &config),
            AuthError::WrongTokenKind,
        );
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let config = test_config();
        let mut other = test_config();
        other.issuer = "someone-else".to_string();

        let pair = issue_token_pair(&test_identity(), &other).unwrap();

        assert_auth_error(
            validate_token(&pair.access_token, TokenKind::Access, &config),
            AuthError::Malformed,
        );
    }
}
