//! Customer accounts
//!
//! A mock authentication flow over the shared key-value store: plaintext
//! passwords, no expiry, one session slot.

mod error;
mod store;
mod types;

pub use error::{AuthError, AuthResult};
pub use store::AccountStore;
pub use types::{
    validate_email, ProfilePatch, Registration, Session, User, UserType, DEFAULT_AVATAR,
};
