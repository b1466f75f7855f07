//! Password hashing and signed session tokens.
//!
//! Tokens are HS256 JWTs carrying the user id, email, role and department.
//! Resolving a token never fails for the "no session" case: malformed,
//! tampered and expired tokens all resolve to `None`.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{
    config::SESSION_TTL_HOURS_RANGE,
    error::AppError,
    models::user::{User, UserRole},
    repositories::IdentityStore,
    types::{DepartmentId, UserId},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: UserId,
    pub email: String,
    pub role: UserRole,
    pub department_id: Option<DepartmentId>,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

#[derive(Clone)]
pub struct CredentialService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_ttl_hours: u64,
}

impl fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialService")
            .field("session_ttl_hours", &self.session_ttl_hours)
            .finish_non_exhaustive()
    }
}

impl CredentialService {
    /// The lifetime is clamped to `SESSION_TTL_HOURS_RANGE`.
    pub fn new(secret: &str, session_ttl_hours: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            session_ttl_hours: session_ttl_hours.clamp(
                *SESSION_TTL_HOURS_RANGE.start(),
                *SESSION_TTL_HOURS_RANGE.end(),
            ),
        }
    }

    /// How long a freshly issued session stays valid; also the cookie max-age.
    pub fn session_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.session_ttl_hours * 60 * 60)
    }

    pub fn claims_for(&self, user: &User) -> SessionClaims {
        let now = Utc::now();
        let exp = now + Duration::hours(self.session_ttl_hours as i64);
        SessionClaims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            department_id: user.department_id,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn sign_claims(&self, claims: &SessionClaims) -> anyhow::Result<String> {
        let token = encode(&Header::default(), claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Issues a session token bound to `user`.
    pub fn sign_token(&self, user: &User) -> anyhow::Result<String> {
        self.sign_claims(&self.claims_for(user))
    }

    pub fn verify_token(&self, token: &str) -> Option<SessionClaims> {
        match decode::<SessionClaims>(token, &self.decoding_key, &Validation::default()) {
            Ok(data) => Some(data.claims),
            Err(err) => {
                tracing::debug!(error = %err, "Rejected session token");
                None
            }
        }
    }

    /// Resolves the user behind an optional session token.
    ///
    /// Returns `Ok(None)` when there is no token, the token does not verify, or
    /// the user it names no longer exists. Only store failures are errors.
    pub async fn resolve_identity(
        &self,
        store: &dyn IdentityStore,
        token: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        let Some(claims) = token.and_then(|token| self.verify_token(token)) else {
            return Ok(None);
        };
        store.find_user_by_id(claims.sub).await
    }
}

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("Password verification error: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockIdentityStore;

    fn officer() -> User {
        User::new(
            "officer@example.edu".into(),
            "hash".into(),
            "Olu Officer".into(),
            UserRole::DeptOfficer,
            Some(DepartmentId::new()),
        )
    }

    #[test]
    fn oversized_session_ttl_is_clamped_instead_of_overflowing() {
        let service = CredentialService::new("ttl-secret", u64::MAX);
        assert_eq!(
            service.session_ttl(),
            std::time::Duration::from_secs(8760 * 60 * 60)
        );
        let claims = service.claims_for(&officer());
        assert_eq!(claims.exp - claims.iat, 8760 * 60 * 60);

        let service = CredentialService::new("ttl-secret", 0);
        assert_eq!(service.session_ttl(), std::time::Duration::from_secs(60 * 60));
    }

    #[test]
    fn hash_and_verify_password() {
        let hash = hash_password("hunter22").expect("hash should succeed");
        assert_ne!(hash, "hunter22");
        assert!(verify_password("hunter22", &hash).unwrap());
        assert!(!verify_password("hunter23", &hash).unwrap());
    }

    #[test]
    fn hashing_is_salted() {
        let first = hash_password("same-password").unwrap();
        let second = hash_password("same-password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn verify_password_errors_on_malformed_hash() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn signed_token_round_trips_claims() {
        let service = CredentialService::new("unit-test-secret", 24);
        let user = officer();
        let claims = service.claims_for(&user);
        let token = service.sign_claims(&claims).unwrap();

        let decoded = service.verify_token(&token).expect("token should verify");
        assert_eq!(decoded, claims);
        assert_eq!(decoded.sub, user.id);
        assert_eq!(decoded.role, UserRole::DeptOfficer);
        assert_eq!(decoded.department_id, user.department_id);
        assert_eq!(decoded.exp - decoded.iat, 24 * 60 * 60);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issuer = CredentialService::new("secret-one", 24);
        let verifier = CredentialService::new("secret-two", 24);
        let token = issuer.sign_token(&officer()).unwrap();
        assert!(verifier.verify_token(&token).is_none());
    }

    #[test]
    fn garbage_token_is_rejected() {
        let service = CredentialService::new("unit-test-secret", 24);
        assert!(service.verify_token("").is_none());
        assert!(service.verify_token("a.b.c").is_none());
    }

    #[tokio::test]
    async fn resolve_identity_without_token_does_not_touch_store() {
        let service = CredentialService::new("unit-test-secret", 24);
        let store = MockIdentityStore::new();
        let resolved = service.resolve_identity(&store, None).await.unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn resolve_identity_loads_user_named_by_token() {
        let service = CredentialService::new("unit-test-secret", 24);
        let user = officer();
        let token = service.sign_token(&user).unwrap();

        let mut store = MockIdentityStore::new();
        let stored = user.clone();
        store
            .expect_find_user_by_id()
            .withf(move |id| *id == stored.id)
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let resolved = service
            .resolve_identity(&store, Some(&token))
            .await
            .unwrap()
            .expect("identity");
        assert_eq!(resolved.email, "officer@example.edu");
    }

    #[tokio::test]
    async fn resolve_identity_for_deleted_user_is_anonymous() {
        let service = CredentialService::new("unit-test-secret", 24);
        let token = service.sign_token(&officer()).unwrap();

        let mut store = MockIdentityStore::new();
        store.expect_find_user_by_id().returning(|_| Ok(None));

        let resolved = service.resolve_identity(&store, Some(&token)).await.unwrap();
        assert!(resolved.is_none());
    }
}
