/// Session Manager
///
/// Orchestrates signup, login, refresh, and logout over the credential store,
/// the password hasher, and the token codec. Enforces the one-session-per-user
/// rule and refresh-token rotation. Performs no HTTP-specific work; handlers
/// map its typed failures to status codes.
///
/// Session lifecycle per user: no session -> active (login) -> no session
/// (logout). Re-login and refresh rotate the stored refresh token in place.

use std::sync::Arc;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::tokens::TokenCodec;
use crate::error::{AppError, AuthError};
use crate::store::{CredentialStore, NewUser, User};

/// Access/refresh pair returned by signup, login, and refresh.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn CredentialStore>,
    codec: TokenCodec,
}

impl SessionManager {
    pub fn new(store: Arc<dyn CredentialStore>, codec: TokenCodec) -> Self {
        Self { store, codec }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Register a new user and issue a first token pair.
    ///
    /// Emails are matched case-insensitively; the stored form is lowercased.
    /// Signup does not establish a session record, only login does.
    ///
    /// # Errors
    /// `DuplicateUser` when the email is already registered.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<TokenPair, AppError> {
        let email = normalize_email(email);

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateUser.into());
        }

        let password_hash = hash_password(password)?;
        let user = self
            .store
            .create_user(&NewUser {
                name: name.to_string(),
                email: email.clone(),
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        self.issue_pair(&email)
    }

    /// Authenticate and open (or rotate) the user's session.
    ///
    /// # Errors
    /// `UserNotFound` when no user has this email, `InvalidCredentials` when
    /// the password does not verify. A failed login mutates nothing.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AppError> {
        let email = normalize_email(email);

        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials.into());
        }

        let pair = self.issue_pair(&email)?;

        // Atomic create-or-overwrite keyed by user id: a second login rotates
        // the stored refresh token instead of adding a session row.
        self.store
            .upsert_session(user.id, &pair.refresh_token)
            .await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(pair)
    }

    /// Exchange the current refresh token for a new token pair.
    ///
    /// The presented token must be the one on file for its session; a
    /// rotated-out token fails with `SessionNotFound` even when its signature
    /// would still verify.
    ///
    /// # Errors
    /// `SessionNotFound`, `TokenInvalid`, `TokenExpired`.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let session = self
            .store
            .find_session_by_token(refresh_token)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        let claims = self.codec.verify_refresh_token(refresh_token)?;

        let pair = self.issue_pair(&claims.sub)?;
        self.store
            .upsert_session(session.user_id, &pair.refresh_token)
            .await?;

        tracing::info!(user_id = %session.user_id, "Token refreshed");

        Ok(pair)
    }

    /// Close the session the refresh token belongs to.
    ///
    /// Deleting the session record invalidates every previously issued
    /// refresh token for that user. Already-issued access tokens stay valid
    /// until their own expiry.
    ///
    /// # Errors
    /// `SessionNotFound` when no session holds this token, `UserNotFound`
    /// when the token's subject matches no user, plus token verification
    /// failures.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AppError> {
        let session = self
            .store
            .find_session_by_token(refresh_token)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        let claims = self.codec.verify_refresh_token(refresh_token)?;

        let user = self
            .store
            .find_user_by_email(&claims.sub)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.store.delete_session(session.user_id).await?;

        tracing::info!(user_id = %user.id, "User logged out");

        Ok(())
    }

    /// Look up the user behind a verified access-token subject.
    ///
    /// # Errors
    /// `UserNotFound` when the subject matches no user.
    pub async fn current_user(&self, subject: &str) -> Result<User, AppError> {
        self.store
            .find_user_by_email(&normalize_email(subject))
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    fn issue_pair(&self, subject: &str) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.codec.issue_access_token(subject)?,
            refresh_token: self.codec.issue_refresh_token(subject)?,
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
