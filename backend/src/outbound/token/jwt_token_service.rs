//! HS256 JWT implementation of the [`TokenService`] port.
//!
//! The library's own expiry check reads the system clock, so it is disabled
//! and expiry is checked against the injected [`Clock`] instead. A token is
//! accepted while `now < exp + leeway`.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::UserId;
use crate::domain::ports::{IssuedToken, TokenError, TokenService, VerifiedSession};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Signing secret and lifetime policy.
#[derive(Clone)]
pub struct TokenSettings {
    secret: Zeroizing<Vec<u8>>,
    ttl: TimeDelta,
    leeway: TimeDelta,
}

impl TokenSettings {
    pub fn new(secret: Zeroizing<Vec<u8>>, ttl: TimeDelta) -> Self {
        Self {
            secret,
            ttl,
            leeway: TimeDelta::zero(),
        }
    }

    /// Grace period applied after `exp` when verifying.
    pub fn with_leeway(mut self, leeway: TimeDelta) -> Self {
        self.leeway = leeway;
        self
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .field("leeway", &self.leeway)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Stateless JWT issuer and verifier.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
    leeway: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    pub fn new(settings: &TokenSettings, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(&settings.secret),
            decoding: DecodingKey::from_secret(&settings.secret),
            validation,
            ttl: settings.ttl,
            leeway: settings.leeway,
            clock,
        }
    }
}

fn timestamp(seconds: i64) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| TokenError::malformed(format!("timestamp {seconds} out of range")))
}

fn map_decode_error(error: jsonwebtoken::errors::Error) -> TokenError {
    match error.kind() {
        ErrorKind::InvalidSignature => TokenError::bad_signature(),
        ErrorKind::InvalidAlgorithm => TokenError::wrong_algorithm(),
        ErrorKind::ExpiredSignature => TokenError::expired(),
        _ => TokenError::malformed(error.to_string()),
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, subject: UserId) -> Result<IssuedToken, TokenError> {
        let now = self.clock.utc();
        let expiry = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::signing("token expiry is out of range"))?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))?;
        Ok(IssuedToken {
            token,
            expires_at: timestamp(claims.exp)?,
        })
    }

    fn verify(&self, token: &str) -> Result<VerifiedSession, TokenError> {
        let data =
            decode::<Claims>(token, &self.decoding, &self.validation).map_err(map_decode_error)?;
        let claims = data.claims;

        let expires_at = timestamp(claims.exp)?;
        // An unrepresentable deadline fails closed.
        let deadline = expires_at
            .checked_add_signed(self.leeway)
            .ok_or_else(TokenError::expired)?;
        if self.clock.utc() >= deadline {
            return Err(TokenError::expired());
        }

        let raw_id = claims
            .sub
            .parse::<i64>()
            .map_err(|err| TokenError::invalid_subject(err.to_string()))?;
        let user_id =
            UserId::new(raw_id).map_err(|err| TokenError::invalid_subject(err.to_string()))?;

        Ok(VerifiedSession {
            user_id,
            issued_at: timestamp(claims.iat)?,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MutableClock;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0)
            .single()
            .expect("valid time")
    }

    fn settings(secret: &[u8]) -> TokenSettings {
        TokenSettings::new(Zeroizing::new(secret.to_vec()), TimeDelta::minutes(60))
    }

    fn user(id: i64) -> UserId {
        UserId::new(id).expect("valid id")
    }

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        Arc::new(MutableClock::new(start()))
    }

    #[rstest]
    fn issued_token_verifies_with_same_subject(clock: Arc<MutableClock>) {
        let service = JwtTokenService::new(&settings(SECRET), clock);

        let issued = service.issue(user(42)).expect("issued");
        let session = service.verify(&issued.token).expect("verified");

        assert_eq!(session.user_id, user(42));
        assert_eq!(session.issued_at, start());
        assert_eq!(session.expires_at, start() + TimeDelta::minutes(60));
        assert_eq!(issued.expires_at, session.expires_at);
    }

    #[rstest]
    fn expiry_is_strict(clock: Arc<MutableClock>) {
        let service = JwtTokenService::new(&settings(SECRET), clock.clone());
        let issued = service.issue(user(1)).expect("issued");

        clock.advance_seconds(60 * 60 - 1);
        assert!(service.verify(&issued.token).is_ok());

        clock.advance_seconds(1);
        assert_eq!(service.verify(&issued.token), Err(TokenError::Expired));
    }

    #[rstest]
    fn leeway_extends_acceptance(clock: Arc<MutableClock>) {
        let lenient = settings(SECRET).with_leeway(TimeDelta::seconds(30));
        let service = JwtTokenService::new(&lenient, clock.clone());
        let issued = service.issue(user(1)).expect("issued");

        clock.advance_seconds(60 * 60 + 29);
        assert!(service.verify(&issued.token).is_ok());
        clock.advance_seconds(1);
        assert_eq!(service.verify(&issued.token), Err(TokenError::Expired));
    }

    #[rstest]
    fn unrepresentable_expiry_fails_issuance(clock: Arc<MutableClock>) {
        let settings = TokenSettings::new(
            Zeroizing::new(SECRET.to_vec()),
            TimeDelta::days(200_000_000),
        );
        let service = JwtTokenService::new(&settings, clock);

        assert!(matches!(
            service.issue(user(1)),
            Err(TokenError::Signing { .. })
        ));
    }

    #[rstest]
    fn leeway_past_the_calendar_end_is_expired(clock: Arc<MutableClock>) {
        let lenient = settings(SECRET).with_leeway(TimeDelta::hours(1));
        let service = JwtTokenService::new(&lenient, clock);
        let claims = Claims {
            sub: "1".to_owned(),
            iat: start().timestamp(),
            exp: DateTime::<Utc>::MAX_UTC.timestamp(),
        };
        let token = encode(
            &Header::new(ALGORITHM),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("encoded");

        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }

    #[rstest]
    fn foreign_secret_is_bad_signature(clock: Arc<MutableClock>) {
        let issuer = JwtTokenService::new(&settings(b"another-secret-another-secret-xx"), clock.clone());
        let verifier = JwtTokenService::new(&settings(SECRET), clock);

        let issued = issuer.issue(user(1)).expect("issued");
        assert_eq!(verifier.verify(&issued.token), Err(TokenError::BadSignature));
    }

    #[rstest]
    fn other_hmac_algorithm_is_rejected(clock: Arc<MutableClock>) {
        let service = JwtTokenService::new(&settings(SECRET), clock);
        let claims = Claims {
            sub: "1".to_owned(),
            iat: start().timestamp(),
            exp: (start() + TimeDelta::minutes(5)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("encoded");

        assert_eq!(service.verify(&token), Err(TokenError::WrongAlgorithm));
    }

    #[rstest]
    #[case("")]
    #[case("garbage")]
    #[case("a.b.c")]
    fn structurally_invalid_tokens_are_malformed(clock: Arc<MutableClock>, #[case] token: &str) {
        let service = JwtTokenService::new(&settings(SECRET), clock);
        assert!(matches!(
            service.verify(token),
            Err(TokenError::Malformed { .. })
        ));
    }

    #[rstest]
    #[case("0")]
    #[case("alice")]
    fn non_positive_or_textual_subject_is_rejected(clock: Arc<MutableClock>, #[case] sub: &str) {
        let service = JwtTokenService::new(&settings(SECRET), clock);
        let claims = Claims {
            sub: sub.to_owned(),
            iat: start().timestamp(),
            exp: (start() + TimeDelta::minutes(5)).timestamp(),
        };
        let token = encode(
            &Header::new(ALGORITHM),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("encoded");

        assert!(matches!(
            service.verify(&token),
            Err(TokenError::InvalidSubject { .. })
        ));
    }
}
