/// Credential Store
///
/// Persistence contract for user and session records. The session layer only
/// talks to this trait; the Postgres implementation lives in `postgres`.

mod models;
mod postgres;

pub use models::{NewUser, Session, User};
pub use postgres::PgCredentialStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;

/// Store contract consumed by the session layer.
///
/// Implementations must be safe for concurrent use; `upsert_session` must be
/// atomic so two concurrent logins for one user can never leave two session
/// records.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a user by email. Callers pass the email already lowercased.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn create_user(&self, user: &NewUser) -> Result<User, AppError>;

    async fn find_session_by_user(&self, user_id: Uuid) -> Result<Option<Session>, AppError>;

    /// Look up the session holding exactly this refresh-token value.
    async fn find_session_by_token(&self, refresh_token: &str)
        -> Result<Option<Session>, AppError>;

    /// Create or overwrite the session for `user_id` in one atomic statement.
    async fn upsert_session(&self, user_id: Uuid, refresh_token: &str) -> Result<(), AppError>;

    async fn delete_session(&self, user_id: Uuid) -> Result<(), AppError>;
}
