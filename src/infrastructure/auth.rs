use crate::domain::auth::{
    AccessClaims, IssuedToken, SignedClaims, SubjectClaims, TokenKind, TokenService,
};
use crate::infrastructure::config::JwtConfig;
use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Serialize, de::DeserializeOwned};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// HMAC-signed JWT encoder/decoder with one secret per process
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtCodec {
    pub fn new(secret: &[u8]) -> Result<Self> {
        if secret.is_empty() {
            anyhow::bail!("JWT secret must not be empty");
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        })
    }

    /// Sign `claims` with `iat = now` and `exp = now + ttl`
    pub fn issue<C: Serialize>(&self, claims: C, ttl: Duration) -> Result<IssuedToken> {
        // JWT timestamps have one-second resolution
        let issued_at = OffsetDateTime::now_utc()
            .replace_nanosecond(0)
            .map_err(|e| anyhow::anyhow!("Failed to truncate timestamp: {}", e))?;
        let expires_at = issued_at
            .checked_add(ttl)
            .ok_or_else(|| anyhow::anyhow!("Token lifetime {} out of range", ttl))?;

        let signed = SignedClaims {
            claims,
            iat: issued_at.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
        };

        let token = encode(&Header::new(ALGORITHM), &signed, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to sign token: {}", e))?;

        Ok(IssuedToken {
            token,
            issued_at,
            expires_at,
        })
    }

    /// Check signature and expiry; every failure collapses into `None`
    pub fn verify<C: DeserializeOwned>(&self, token: &str) -> Option<SignedClaims<C>> {
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;

        match decode::<SignedClaims<C>>(token, &self.decoding_key, &validation) {
            Ok(data) if data.claims.exp > OffsetDateTime::now_utc().unix_timestamp() => {
                Some(data.claims)
            }
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("Token rejected: {}", e);
                None
            }
        }
    }
}

/// Token service issuing the three token kinds with their own lifetimes
pub struct JwtTokenService {
    codec: JwtCodec,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
    reset_token_ttl: Duration,
}

impl JwtTokenService {
    pub fn new(
        secret: &[u8],
        access_token_ttl: Duration,
        refresh_token_ttl: Duration,
        reset_token_ttl: Duration,
    ) -> Result<Self> {
        Ok(Self {
            codec: JwtCodec::new(secret)?,
            access_token_ttl,
            refresh_token_ttl,
            reset_token_ttl,
        })
    }

    pub fn from_config(config: &JwtConfig) -> Result<Self> {
        Self::new(
            config.secret.as_bytes(),
            Duration::seconds(config.access_token_expiry),
            Duration::seconds(config.refresh_token_expiry),
            Duration::seconds(config.reset_token_expiry),
        )
    }

    fn verify_subject(&self, token: &str, kind: TokenKind) -> Option<SignedClaims<SubjectClaims>> {
        self.codec
            .verify::<SubjectClaims>(token)
            .filter(|signed| signed.claims.token_type == kind)
    }
}

impl TokenService for JwtTokenService {
    fn issue_access_token(&self, claims: AccessClaims) -> Result<IssuedToken> {
        let claims = AccessClaims {
            token_type: TokenKind::Access,
            ..claims
        };
        self.codec.issue(claims, self.access_token_ttl)
    }

    fn issue_refresh_token(&self, user_id: Uuid) -> Result<IssuedToken> {
        self.codec.issue(
            SubjectClaims::new(user_id, TokenKind::Refresh),
            self.refresh_token_ttl,
        )
    }

    fn issue_reset_token(&self, user_id: Uuid) -> Result<IssuedToken> {
        self.codec.issue(
            SubjectClaims::new(user_id, TokenKind::Reset),
            self.reset_token_ttl,
        )
    }

    fn verify_access_token(&self, token: &str) -> Option<SignedClaims<AccessClaims>> {
        self.codec
            .verify::<AccessClaims>(token)
            .filter(|signed| signed.claims.token_type == TokenKind::Access)
    }

    fn verify_refresh_token(&self, token: &str) -> Option<SignedClaims<SubjectClaims>> {
        self.verify_subject(token, TokenKind::Refresh)
    }

    fn verify_reset_token(&self, token: &str) -> Option<SignedClaims<SubjectClaims>> {
        self.verify_subject(token, TokenKind::Reset)
    }

    fn access_token_ttl(&self) -> Duration {
        self.access_token_ttl
    }
}
