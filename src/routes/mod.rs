mod auth;
mod health_check;

pub use auth::{current_user, login, logout, refresh, signup};
pub use health_check::health_check;
