use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered user. Immutable after signup except for administrative
/// actions, which are out of scope here.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Stored lowercased; uniqueness is case-insensitive.
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to create a user record.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// One active session per user: the server-side anchor binding a user to
/// their currently valid refresh token. Presence of this record is the
/// source of truth for revocation.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub user_id: Uuid,
    pub refresh_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
