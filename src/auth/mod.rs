/// Authentication module
///
/// Token issuing/verification, password hashing, and the session layer that
/// ties them to the credential store.

mod claims;
mod password;
mod session;
mod tokens;

pub use claims::Claims;
pub use password::hash_password;
pub use password::verify_password;
pub use session::SessionManager;
pub use session::TokenPair;
pub use tokens::TokenCodec;
