use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{Algorithm, Header, Validation};
use thiserror::Error;
use tracing::{debug, error};

use crate::services::auth::{
    claims::{Claims, UserId},
    clock::{Clock, SystemClock},
    keys::KeyPair,
};

#[derive(Debug, Error)]
#[error("signing token: {0}")]
pub struct SigningError(#[source] jsonwebtoken::errors::Error);

/// Returned for every validation failure (bad signature, expired, malformed).
///
/// The cause is logged at debug level and never handed to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid token")]
pub struct TokenInvalid;

// Internal reasons, for logs only.
#[derive(Debug, Error)]
enum Rejection {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("token expired")]
    Expired,
    #[error("malformed claims: {0}")]
    Malformed(&'static str),
}

/// What the service puts into freshly issued tokens, and how strict expiry is.
#[derive(Clone, Debug)]
pub struct TokenPolicy {
    pub issuer: String,
    pub audience: Vec<String>,
    pub ttl: Duration,
    pub leeway: Duration,
}

/// RS256 access-token issuer and verifier.
#[derive(Clone)]
pub struct TokenService {
    keys: KeyPair,
    validation: Validation,
    policy: TokenPolicy,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(keys: KeyPair, policy: TokenPolicy) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        // exp is checked against `self.clock` in `validate_token`
        validation.validate_exp = false;
        // issuer/audience are carried, not enforced
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["iss", "sub", "aud", "iat", "exp"]);

        Self {
            keys,
            validation,
            policy,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn policy(&self) -> &TokenPolicy {
        &self.policy
    }

    /// Claims for a user that just proved its credentials.
    pub fn claims_for(&self, user_id: UserId) -> Claims {
        Claims::new(
            self.policy.issuer.clone(),
            user_id,
            self.policy.audience.iter().cloned(),
            self.clock.now(),
            self.policy.ttl,
        )
    }

    /// Signs `claims` with RS256. Timestamps are encoded as whole seconds.
    pub fn issue_token(&self, claims: &Claims) -> Result<String, SigningError> {
        let mut header = Header::new(Algorithm::RS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, claims, self.keys.signing_key()).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            SigningError(e)
        })
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenInvalid> {
        self.verify(token).map_err(|reason| {
            debug!(%reason, "access token rejected");
            TokenInvalid
        })
    }

    fn verify(&self, token: &str) -> Result<Claims, Rejection> {
        let data =
            jsonwebtoken::decode::<Claims>(token, self.keys.verification_key(), &self.validation)?;
        let claims = data.claims;

        if claims.user_id().is_none() {
            return Err(Rejection::Malformed("sub is not a user id"));
        }
        if claims.expires_at <= claims.issued_at {
            return Err(Rejection::Malformed("exp must be after iat"));
        }
        if claims.is_expired_at(self.clock.now(), self.policy.leeway) {
            return Err(Rejection::Expired);
        }

        Ok(claims)
    }
}

/// The one operation the access stage needs from the token service.
pub trait TokenVerifier: Send + Sync {
    fn validate_token(&self, token: &str) -> Result<Claims, TokenInvalid>;
}

impl TokenVerifier for TokenService {
    fn validate_token(&self, token: &str) -> Result<Claims, TokenInvalid> {
        TokenService::validate_token(self, token)
    }
}
