//! Session port - identity provider abstraction

use crate::domain::result::Result;
use crate::domain::User;

/// Identity provider contract.
///
/// Mutating operations either succeed (the session changes) or fail
/// with a classified [`crate::domain::result::SessionError`] that the
/// caller maps to a user-facing message. `current_user` reflects any
/// session persisted by a previous invocation.
pub trait SessionProvider: Send + Sync {
    /// The currently signed-in user, if any
    fn current_user(&self) -> Result<Option<User>>;

    /// Register a new account and sign it in
    fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<User>;

    /// Sign in with email and password
    fn sign_in(&self, email: &str, password: &str) -> Result<User>;

    /// Sign in through the provider's federated flow. Local
    /// installations report `ProviderNotConfigured`.
    fn sign_in_federated(&self) -> Result<User>;

    /// End the current session
    fn sign_out(&self) -> Result<()>;
}
