//! Client for the hosted identity provider.
//!
//! Credentials never touch this codebase beyond pass-through: the provider
//! stores passwords, issues opaque session tokens, and resolves tokens back
//! to accounts. [`RestIdentity`] talks to the hosted endpoints and
//! [`MemoryIdentity`] fakes them for tests.

mod error;
mod memory;
mod rest;

pub use error::IdentityError;
pub use memory::MemoryIdentity;
pub use rest::RestIdentity;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A resolved account: the provider's unique id, the account email, and the
/// session token the resolution came from (freshly minted for sign-up and
/// sign-in, echoed back for lookup).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: String,
    pub id_token: String,
}

/// Sign-up / sign-in / session resolution, delegated to the provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account. Fails with [`IdentityError::EmailTaken`] when the
    /// email is already registered.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, IdentityError>;

    /// Exchange credentials for a fresh session token.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError>;

    /// Resolve a session token to the account it belongs to.
    async fn lookup(&self, id_token: &str) -> Result<Identity, IdentityError>;
}
