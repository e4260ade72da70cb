mod auth;
mod logging;

pub use auth::AccessTokenGuard;
pub use logging::RequestLogging;
