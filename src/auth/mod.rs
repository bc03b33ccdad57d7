/// Authentication core
///
/// Credential verification, signed-token issuance, token validation,
/// and token refresh. Everything here is stateless apart from the
/// read-only identity store; token validity is a pure function of
/// signature and time.

mod claims;
mod password;
mod service;
mod token;

pub use claims::{Claims, TokenKind};
pub use password::{hash_password, verify_password};
pub use service::AuthService;
pub use token::{issue_token_pair, validate_token, TokenPair};
