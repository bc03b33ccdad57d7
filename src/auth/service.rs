/// Authentication service
///
/// Ties credential verification, token issuance, and token refresh
/// together over an identity store. Stateless apart from the read-only
/// store and the immutable signing settings: nothing is written on
/// signin or refresh, and no token is tracked server-side.

use std::sync::Arc;

use crate::auth::claims::TokenKind;
use crate::auth::password::verify_password;
use crate::auth::token::{issue_token_pair, validate_token, TokenPair};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};
use crate::identity::{Identity, IdentityStore};

// bcrypt hash of an unused throwaway password; verified against when a
// username does not exist so the unknown-user path costs as much as the
// wrong-password path.
const DUMMY_HASH: &str = "$2b$12$GhvMmNVjRW29ulnudl.LbuAnUtN/LRfe1JsBm1Xu6LE3059z5Tr8m";

pub struct AuthService {
    store: Arc<dyn IdentityStore>,
    jwt: JwtSettings,
}

impl AuthService {
    pub fn new(store: Arc<dyn IdentityStore>, jwt: JwtSettings) -> Self {
        Self { store, jwt }
    }

    pub fn jwt_settings(&self) -> &JwtSettings {
        &self.jwt
    }

    /// Verify a username/password pair and issue a token pair.
    ///
    /// Unknown user, disabled account, and wrong password all fail
    /// with `InvalidCredentials` so responses cannot be used to
    /// enumerate usernames.
    pub async fn signin(&self, username: &str, password: &str) -> Result<TokenPair, AppError> {
        let identity = match self.store.find_by_username(username).await? {
            Some(identity) => identity,
            None => {
                let _ = verify_password(password, DUMMY_HASH);
                return Err(AppError::Auth(AuthError::InvalidCredentials));
            }
        };

        if !identity.enabled {
            tracing::warn!(username = %username, "Disabled account attempted signin");
            return Err(AppError::Auth(AuthError::InvalidCredentials));
        }

        if !verify_password(password, &identity.password_hash)? {
            tracing::warn!(username = %username, "Password mismatch on signin");
            return Err(AppError::Auth(AuthError::InvalidCredentials));
        }

        tracing::info!(username = %identity.username, "User signed in");
        issue_token_pair(&identity, &self.jwt)
    }

    /// Exchange a refresh token for a fresh token pair.
    ///
    /// The presented token must be a valid refresh token whose subject
    /// matches `username`, and the identity must still exist and be
    /// enabled. The password is not re-checked. A full new pair is
    /// minted (rotation); the old refresh token simply ages out.
    pub async fn refresh(
        &self,
        username: &str,
        refresh_token: &str,
    ) -> Result<TokenPair, AppError> {
        let claims = validate_token(refresh_token, TokenKind::Refresh, &self.jwt)?;

        if claims.sub != username {
            tracing::warn!(
                claimed = %username,
                subject = %claims.sub,
                "Refresh token subject mismatch"
            );
            return Err(AppError::Auth(AuthError::SubjectMismatch));
        }

        let identity = self.lookup_active(username).await?;

        tracing::info!(username = %identity.username, "Token refreshed");
        issue_token_pair(&identity, &self.jwt)
    }

    async fn lookup_active(&self, username: &str) -> Result<Identity, AppError> {
        let identity = self
            .store
            .find_by_username(username)
            .await?
            .ok_or(AppError::Auth(AuthError::InvalidCredentials))?;

        if !identity.enabled {
            tracing::warn!(username = %username, "Disabled account attempted authentication");
            return Err(AppError::Auth(AuthError::InvalidCredentials));
        }

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::InMemoryIdentityStore;
    use uuid::Uuid;

    fn test_jwt() -> JwtSettings {
        JwtSettings {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604800,
            issuer: "person-api".to_string(),
        }
    }

    // Low bcrypt cost keeps the test suite fast
    fn seeded_identity(username: &str, password: &str, enabled: bool) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: bcrypt::hash(password, 4).unwrap(),
            roles: vec!["user".to_string()],
            enabled,
        }
    }

    fn service_with(identities: Vec<Identity>) -> (AuthService, Arc<InMemoryIdentityStore>) {
        let store = Arc::new(InMemoryIdentityStore::new());
        for identity in identities {
            store.insert(identity);
        }
        (AuthService::new(store.clone(), test_jwt()), store)
    }

    fn assert_auth_error(result: Result<TokenPair, AppError>, expected: AuthError) {
        match result {
            Err(AppError::Auth(e)) => assert_eq!(e, expected),
            Err(other) => panic!("expected {:?}, got {:?}", expected, other),
            Ok(_) => panic!("expected {:?}, got a token pair", expected),
        }
    }

    #[tokio::test]
    async fn signin_with_correct_password_issues_valid_tokens() {
        let (service, _) = service_with(vec![seeded_identity("alice", "s3cret", true)]);

        let pair = service.signin("alice", "s3cret").await.unwrap();

        let claims = validate_token(&pair.access_token, TokenKind::Access, &test_jwt()).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.roles, vec!["user".to_string()]);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_indistinguishable() {
        let (service, _) = service_with(vec![seeded_identity("alice", "s3cret", true)]);

        assert_auth_error(
            service.signin("alice", "wrong").await,
            AuthError::InvalidCredentials,
        );
        assert_auth_error(
            service.signin("nobody", "s3cret").await,
            AuthError::InvalidCredentials,
        );
    }

    #[tokio::test]
    async fn disabled_account_cannot_sign_in() {
        let (service, _) = service_with(vec![seeded_identity("alice", "s3cret", false)]);

        assert_auth_error(
            service.signin("alice", "s3cret").await,
            AuthError::InvalidCredentials,
        );
    }

    #[tokio::test]
    async fn refresh_mints_a_new_pair() {
        let (service, _) = service_with(vec![seeded_identity("alice", "s3cret", true)]);

        let pair = service.signin("alice", "s3cret").await.unwrap();
        let renewed = service.refresh("alice", &pair.refresh_token).await.unwrap();

        assert_ne!(renewed.access_token, pair.access_token);
        assert_ne!(renewed.refresh_token, pair.refresh_token);

        let claims =
            validate_token(&renewed.access_token, TokenKind::Access, &test_jwt()).unwrap();
        assert_eq!(claims.sub, "alice");
    }

    #[tokio::test]
    async fn refresh_under_wrong_username_is_rejected() {
        let (service, _) = service_with(vec![
            seeded_identity("alice", "s3cret", true),
            seeded_identity("bob", "hunter2", true),
        ]);

        let pair = service.signin("alice", "s3cret").await.unwrap();

        assert_auth_error(
            service.refresh("bob", &pair.refresh_token).await,
            AuthError::SubjectMismatch,
        );
    }

    #[tokio::test]
    async fn access_token_cannot_be_used_to_refresh() {
        let (service, _) = service_with(vec![seeded_identity("alice", "s3cret", true)]);

        let pair = service.signin("alice", "s3cret").await.unwrap();

        assert_auth_error(
            service.refresh("alice", &pair.access_token).await,
            AuthError::WrongTokenKind,
        );
    }

    #[tokio::test]
    async fn tampered_refresh_token_is_rejected() {
        let (service, _) = service_with(vec![seeded_identity("alice", "s3cret", true)]);

        // Signed by someone who does not hold our secret
        let mut foreign_jwt = test_jwt();
        foreign_jwt.secret = "a-completely-different-secret-also-32-chars!".to_string();
        let forged =
            issue_token_pair(&seeded_identity("alice", "s3cret", true), &foreign_jwt).unwrap();

        assert_auth_error(
            service.refresh("alice", &forged.refresh_token).await,
            AuthError::BadSignature,
        );
    }

    #[tokio::test]
    async fn refresh_fails_once_identity_disappears() {
        let (service, store) = service_with(vec![seeded_identity("alice", "s3cret", true)]);

        let pair = service.signin("alice", "s3cret").await.unwrap();
        store.remove("alice");

        assert_auth_error(
            service.refresh("alice", &pair.refresh_token).await,
            AuthError::InvalidCredentials,
        );
    }

    #[tokio::test]
    async fn refresh_fails_for_disabled_identity() {
        let (service, store) = service_with(vec![seeded_identity("alice", "s3cret", true)]);

        let pair = service.signin("alice", "s3cret").await.unwrap();

        store.insert(seeded_identity("alice", "s3cret", false));

        assert_auth_error(
            service.refresh("alice", &pair.refresh_token).await,
            AuthError::InvalidCredentials,
        );
    }
}
