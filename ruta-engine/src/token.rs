use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use ruta_domain::EngineError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The claims carried by a lock token. The token is a stateless capability:
/// it names the exact leased set so the booking step needs no server-side
/// session, but it is a *claim*, not a guarantee — the finalizer always
/// re-checks the live ledger before honoring it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockClaims {
    pub trip_id: Uuid,
    pub seat_ids: Vec<Uuid>,
    /// Lease deadline, epoch seconds. Mirrors `exp` so clients can read it
    /// without understanding JWT internals.
    pub locked_until: i64,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenSigner {
    secret: String,
}

impl TokenSigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Issues a signed token for a freshly granted lease. Token expiry
    /// equals the lease deadline.
    pub fn issue(
        &self,
        trip_id: Uuid,
        seat_ids: Vec<Uuid>,
        locked_until: DateTime<Utc>,
    ) -> Result<String, EngineError> {
        let claims = LockClaims {
            trip_id,
            seat_ids,
            locked_until: locked_until.timestamp(),
            iat: Utc::now().timestamp(),
            exp: locked_until.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| EngineError::Database(format!("token signing failed: {e}")))
    }

    /// Verifies signature and expiry. Leeway is zero: a token whose lease
    /// deadline has passed is rejected at any time >= that deadline.
    pub fn verify(&self, token: &str) -> Result<LockClaims, EngineError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<LockClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => EngineError::TokenExpired,
            _ => EngineError::InvalidToken {
                reason: e.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn signer() -> TokenSigner {
        TokenSigner::new("test-secret")
    }

    #[test]
    fn token_round_trips_claims() {
        let trip_id = Uuid::new_v4();
        let seat_ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        let locked_until = Utc::now() + Duration::seconds(600);

        let token = signer()
            .issue(trip_id, seat_ids.clone(), locked_until)
            .expect("issues");
        let claims = signer().verify(&token).expect("verifies");

        assert_eq!(claims.trip_id, trip_id);
        assert_eq!(claims.seat_ids, seat_ids);
        assert_eq!(claims.locked_until, locked_until.timestamp());
        assert_eq!(claims.exp, claims.locked_until);
    }

    #[test]
    fn expired_token_is_rejected_even_with_valid_signature() {
        let token = signer()
            .issue(
                Uuid::new_v4(),
                vec![Uuid::new_v4()],
                Utc::now() - Duration::seconds(120),
            )
            .expect("issues");

        assert!(matches!(
            signer().verify(&token),
            Err(EngineError::TokenExpired)
        ));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = signer()
            .issue(
                Uuid::new_v4(),
                vec![Uuid::new_v4()],
                Utc::now() + Duration::seconds(600),
            )
            .expect("issues");

        let mut tampered = token;
        tampered.push('x');
        assert!(matches!(
            signer().verify(&tampered),
            Err(EngineError::InvalidToken { .. })
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = signer()
            .issue(
                Uuid::new_v4(),
                vec![Uuid::new_v4()],
                Utc::now() + Duration::seconds(600),
            )
            .expect("issues");

        let other = TokenSigner::new("other-secret");
        assert!(matches!(
            other.verify(&token),
            Err(EngineError::InvalidToken { .. })
        ));
    }
}
