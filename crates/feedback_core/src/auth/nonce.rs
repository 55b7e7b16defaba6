//! Operation-scoped anti-forgery tokens.
//!
//! # Responsibility
//! - Issue short tokens bound to (time window, action, session).
//! - Verify submitted tokens in constant time.
//!
//! # Invariants
//! - A token verifies only for the action and session it was issued for.
//! - Time is split into ticks of half the lifetime; tokens from the current
//!   and the previous tick verify, older ones never do.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

/// Number of MAC bytes carried by a token (hex-encoded on the wire).
const TOKEN_BYTES: usize = 5;
/// Minimum secret length accepted by [`AntiForgery::new`].
pub const MIN_SECRET_LEN: usize = 16;
/// Default token lifetime.
pub const DEFAULT_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Action a token is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NonceAction {
    /// Submitting the public feedback form.
    Submit,
    /// Listing entries and reading entry details.
    Browse,
}

impl NonceAction {
    /// Stable action name mixed into the MAC.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "feedback_submit",
            Self::Browse => "feedback_list",
        }
    }
}

/// Anti-forgery configuration and verification errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonceError {
    SecretTooShort { len: usize, min: usize },
    LifetimeTooShort,
    Missing,
    Malformed,
    Invalid,
}

impl Display for NonceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SecretTooShort { len, min } => {
                write!(f, "anti-forgery secret has {len} bytes; at least {min} required")
            }
            Self::LifetimeTooShort => write!(f, "anti-forgery lifetime must be at least 2 seconds"),
            Self::Missing => write!(f, "anti-forgery token is missing"),
            Self::Malformed => write!(f, "anti-forgery token is malformed"),
            Self::Invalid => write!(f, "anti-forgery token is invalid or expired"),
        }
    }
}

impl Error for NonceError {}

/// Issues and verifies anti-forgery tokens with one server secret.
#[derive(Clone)]
pub struct AntiForgery {
    secret: Vec<u8>,
    half_life_secs: u64,
}

impl std::fmt::Debug for AntiForgery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AntiForgery")
            .field("secret", &"<redacted>")
            .field("half_life_secs", &self.half_life_secs)
            .finish()
    }
}

impl AntiForgery {
    /// Creates a token authority.
    ///
    /// # Errors
    /// - `SecretTooShort` when `secret` has fewer than [`MIN_SECRET_LEN`] bytes.
    /// - `LifetimeTooShort` when `lifetime` is under two seconds.
    pub fn new(secret: impl Into<Vec<u8>>, lifetime: Duration) -> Result<Self, NonceError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(NonceError::SecretTooShort {
                len: secret.len(),
                min: MIN_SECRET_LEN,
            });
        }

        let half_life_secs = lifetime.as_secs() / 2;
        if half_life_secs == 0 {
            return Err(NonceError::LifetimeTooShort);
        }

        Ok(Self {
            secret,
            half_life_secs,
        })
    }

    /// Issues a token for `action` bound to `session`, valid from now.
    pub fn issue(&self, action: NonceAction, session: &str) -> String {
        self.issue_at(action, session, unix_now_secs())
    }

    /// Issues a token as of `now_secs` (Unix seconds).
    pub fn issue_at(&self, action: NonceAction, session: &str, now_secs: u64) -> String {
        let tag = self.mac(self.tick(now_secs), action, session).finalize().into_bytes();
        hex::encode(&tag[..TOKEN_BYTES])
    }

    /// Verifies `token` for `action` and `session` against the current time.
    pub fn verify(
        &self,
        action: NonceAction,
        session: &str,
        token: &str,
    ) -> Result<(), NonceError> {
        self.verify_at(action, session, token, unix_now_secs())
    }

    /// Verifies `token` as of `now_secs` (Unix seconds).
    ///
    /// Accepts tokens issued during the current or the previous tick.
    pub fn verify_at(
        &self,
        action: NonceAction,
        session: &str,
        token: &str,
        now_secs: u64,
    ) -> Result<(), NonceError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(NonceError::Missing);
        }
        if token.len() != TOKEN_BYTES * 2 {
            return Err(NonceError::Malformed);
        }
        let submitted = hex::decode(token).map_err(|_| NonceError::Malformed)?;

        let tick = self.tick(now_secs);
        let accepted = [Some(tick), tick.checked_sub(1)]
            .into_iter()
            .flatten()
            .any(|candidate| {
                self.mac(candidate, action, session)
                    .verify_truncated_left(&submitted)
                    .is_ok()
            });
        if accepted {
            return Ok(());
        }

        Err(NonceError::Invalid)
    }

    fn tick(&self, now_secs: u64) -> u64 {
        now_secs.div_ceil(self.half_life_secs)
    }

    fn mac(&self, tick: u64, action: NonceAction, session: &str) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length");
        mac.update(&tick.to_be_bytes());
        mac.update(b"|");
        mac.update(action.as_str().as_bytes());
        mac.update(b"|");
        mac.update(session.as_bytes());
        mac
    }
}

fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{AntiForgery, NonceAction, NonceError, DEFAULT_LIFETIME};
    use std::time::Duration;

    const NOW: u64 = 1_700_000_000;

    fn authority() -> AntiForgery {
        AntiForgery::new("0123456789abcdef-test-secret", DEFAULT_LIFETIME)
            .expect("valid authority")
    }

    #[test]
    fn issued_token_verifies_for_same_scope() {
        let forgery = authority();
        let token = forgery.issue_at(NonceAction::Submit, "session-a", NOW);
        assert_eq!(token.len(), 10);
        assert_eq!(
            forgery.verify_at(NonceAction::Submit, "session-a", &token, NOW),
            Ok(())
        );
    }

    #[test]
    fn token_is_bound_to_action_and_session() {
        let forgery = authority();
        let token = forgery.issue_at(NonceAction::Submit, "session-a", NOW);
        assert_eq!(
            forgery.verify_at(NonceAction::Browse, "session-a", &token, NOW),
            Err(NonceError::Invalid)
        );
        assert_eq!(
            forgery.verify_at(NonceAction::Submit, "session-b", &token, NOW),
            Err(NonceError::Invalid)
        );
    }

    #[test]
    fn token_ages_then_expires() {
        let forgery = authority();
        let half = DEFAULT_LIFETIME.as_secs() / 2;
        let token = forgery.issue_at(NonceAction::Browse, "s", NOW);
        assert_eq!(
            forgery.verify_at(NonceAction::Browse, "s", &token, NOW + half),
            Ok(())
        );
        assert_eq!(
            forgery.verify_at(NonceAction::Browse, "s", &token, NOW + 2 * half + 1),
            Err(NonceError::Invalid)
        );
    }

    #[test]
    fn rejects_missing_and_malformed_tokens() {
        let forgery = authority();
        assert_eq!(
            forgery.verify_at(NonceAction::Submit, "s", "  ", NOW),
            Err(NonceError::Missing)
        );
        assert_eq!(
            forgery.verify_at(NonceAction::Submit, "s", "zzzzzzzzzz", NOW),
            Err(NonceError::Malformed)
        );
        assert_eq!(
            forgery.verify_at(NonceAction::Submit, "s", "abc", NOW),
            Err(NonceError::Malformed)
        );
    }

    #[test]
    fn rejects_weak_configuration() {
        assert!(matches!(
            AntiForgery::new("short", DEFAULT_LIFETIME),
            Err(NonceError::SecretTooShort { len: 5, .. })
        ));
        assert_eq!(
            AntiForgery::new("0123456789abcdef", Duration::from_secs(1)).unwrap_err(),
            NonceError::LifetimeTooShort
        );
    }
}
