/// Token Codec
///
/// Issues and verifies the two token kinds. Each kind is signed with its own
/// secret and carries its own expiry: access tokens are short-lived bearer
/// credentials, refresh tokens are long-lived and anchored server-side by a
/// session record. Verification is pure local computation, no I/O.

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use crate::auth::claims::Claims;
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};

#[derive(Clone)]
pub struct TokenCodec {
    settings: JwtSettings,
}

impl TokenCodec {
    pub fn new(settings: JwtSettings) -> Self {
        Self { settings }
    }

    pub fn access_token_expiry(&self) -> i64 {
        self.settings.access_token_expiry
    }

    pub fn refresh_token_expiry(&self) -> i64 {
        self.settings.refresh_token_expiry
    }

    /// Sign an access token for `subject`.
    ///
    /// # Errors
    /// Returns an internal error if encoding fails; never fails for a valid
    /// subject.
    pub fn issue_access_token(&self, subject: &str) -> Result<String, AppError> {
        self.issue(
            subject,
            self.settings.access_token_expiry,
            &self.settings.access_secret,
        )
    }

    /// Sign a refresh token for `subject`.
    pub fn issue_refresh_token(&self, subject: &str) -> Result<String, AppError> {
        self.issue(
            subject,
            self.settings.refresh_token_expiry,
            &self.settings.refresh_secret,
        )
    }

    /// Verify an access token and return its claims.
    ///
    /// # Errors
    /// `TokenExpired` when the expiry has passed, `TokenInvalid` for any
    /// signature or structure problem.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AppError> {
        self.verify(token, &self.settings.access_secret)
    }

    /// Verify a refresh token against the refresh secret.
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        self.verify(token, &self.settings.refresh_secret)
    }

    fn issue(&self, subject: &str, expiry_seconds: i64, secret: &str) -> Result<String, AppError> {
        let claims = Claims::new(subject, expiry_seconds, &self.settings.issuer);

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("token generation failed: {}", e)))
    }

    fn verify(&self, token: &str, secret: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Strict expiry boundary, no clock skew allowance
        validation.leeway = 0;
        validation.set_issuer(&[&self.settings.issuer]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::Auth(AuthError::TokenExpired),
            _ => AppError::Auth(AuthError::TokenInvalid),
        })
    }
}
