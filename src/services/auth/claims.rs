//! Claim set carried inside access tokens.
//!
//! Field names on the wire follow RFC 7519 (`iss`, `sub`, `aud`, `iat`,
//! `exp`); timestamps are NumericDate (whole seconds).

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Internal user identifier. `sub` is its decimal string form.
pub type UserId = i64;

/// `iat`/`exp` travel as whole seconds. Sub-second parts of hand-built values
/// are dropped on signing; `Claims::new` truncates up front so its values
/// survive a sign/verify round trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "iss")]
    pub issuer: String,

    #[serde(rename = "sub")]
    pub subject: String,

    // `aud` may be a single string or an array on the wire.
    #[serde(rename = "aud", deserialize_with = "one_or_many")]
    pub audience: BTreeSet<String>,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    /// Claims for `user_id`, valid from `issued_at` (truncated to seconds) for `ttl`.
    pub fn new<I, A>(
        issuer: impl Into<String>,
        user_id: UserId,
        audience: I,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let issued_at = issued_at.trunc_subsecs(0);
        // Out of range saturates; a negative ttl still fails `is_well_formed`.
        let expires_at = issued_at.checked_add_signed(ttl).unwrap_or(if ttl < Duration::zero() {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        });
        Self {
            issuer: issuer.into(),
            subject: user_id.to_string(),
            audience: audience.into_iter().map(Into::into).collect(),
            issued_at,
            expires_at,
        }
    }

    /// The subject as a user id, if it is a positive integer.
    pub fn user_id(&self) -> Option<UserId> {
        parse_user_id(&self.subject)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway: Duration) -> bool {
        match self.expires_at.checked_add_signed(leeway) {
            Some(deadline) => deadline <= now,
            // Past the representable range: never expires with positive leeway.
            None => leeway < Duration::zero(),
        }
    }

    /// `expires_at > issued_at` and `sub` is a user id.
    pub fn is_well_formed(&self) -> bool {
        self.expires_at > self.issued_at && self.user_id().is_some()
    }
}

pub fn parse_user_id(subject: &str) -> Option<UserId> {
    subject.parse::<UserId>().ok().filter(|id| *id > 0)
}

fn one_or_many<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(BTreeSet<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(aud) => BTreeSet::from([aud]),
        OneOrMany::Many(aud) => aud,
    })
}
