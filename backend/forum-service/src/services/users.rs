//! User service - registration, login, session resolution, and the admin
//! account-management operations.

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::User;
use identity_client::IdentityProvider;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use store_client::StoreBackend;

/// Handles double as store keys, so they are restricted to path-safe
/// characters.
static HANDLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]{3,32}$").expect("Invalid handle regex"));

/// An authenticated session: the provider's opaque token plus the resolved
/// forum profile.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

pub struct UserService {
    store: Arc<dyn StoreBackend>,
    identity: Arc<dyn IdentityProvider>,
}

impl UserService {
    pub fn new(store: Arc<dyn StoreBackend>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { store, identity }
    }

    /// Probe the handle, create the provider account, then the forum record.
    /// The probe-then-create sequence is not transactional: two racing
    /// registrations of one handle are last-write-wins.
    pub async fn register(&self, handle: &str, email: &str, password: &str) -> Result<Session> {
        if !HANDLE_REGEX.is_match(handle) {
            return Err(AppError::Validation(
                "handle must be 3-32 characters of letters, digits or underscores".into(),
            ));
        }

        if user_repo::get_user_by_handle(self.store.as_ref(), handle)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "user with handle {} already exists",
                handle
            )));
        }

        let identity = self.identity.sign_up(email, password).await?;
        let user =
            user_repo::create_user(self.store.as_ref(), handle, &identity.uid, &identity.email)
                .await?;

        Ok(Session {
            token: identity.id_token,
            user,
        })
    }

    /// Exchange credentials for a session and resolve the forum profile.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let identity = self.identity.sign_in(email, password).await?;
        let user = user_repo::find_user_by_uid(self.store.as_ref(), &identity.uid)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("no forum profile exists for this account".into())
            })?;

        Ok(Session {
            token: identity.id_token,
            user,
        })
    }

    /// Resolve a bearer token to the per-request identity context. Used by
    /// the session middleware on every protected request.
    pub async fn resolve_session(&self, id_token: &str) -> Result<CurrentUser> {
        let identity = self.identity.lookup(id_token).await?;
        let user = user_repo::find_user_by_uid(self.store.as_ref(), &identity.uid)
            .await?
            .ok_or_else(|| {
                AppError::Unauthenticated("session has no forum profile".into())
            })?;

        Ok(CurrentUser {
            handle: user.handle,
            uid: user.uid,
            email: user.email,
            is_admin: user.is_admin,
            is_blocked: user.is_blocked,
        })
    }

    /// Admin listing: optional case-insensitive substring filter on handle OR
    /// email, always excluding the requesting admin.
    pub async fn list_users(&self, admin: &CurrentUser, search: &str) -> Result<Vec<User>> {
        ensure_admin(admin)?;
        let needle = search.to_lowercase();
        let users = user_repo::list_users(self.store.as_ref()).await?;
        Ok(users
            .into_values()
            .filter(|user| user.uid != admin.uid)
            .filter(|user| {
                needle.is_empty()
                    || user.handle.to_lowercase().contains(&needle)
                    || user.email.to_lowercase().contains(&needle)
            })
            .collect())
    }

    /// Flip the target's block flag.
    pub async fn toggle_block(&self, admin: &CurrentUser, handle: &str) -> Result<()> {
        ensure_admin(admin)?;
        if admin.handle == handle {
            return Err(AppError::Unauthorized(
                "administrators cannot block themselves".into(),
            ));
        }
        let target = user_repo::get_user_by_handle(self.store.as_ref(), handle)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {} does not exist", handle)))?;
        user_repo::toggle_block(self.store.as_ref(), handle, target.is_blocked).await
    }

    /// Grant admin rights to the target; already-admin is a no-op.
    pub async fn make_admin(&self, admin: &CurrentUser, handle: &str) -> Result<()> {
        ensure_admin(admin)?;
        let target = user_repo::get_user_by_handle(self.store.as_ref(), handle)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {} does not exist", handle)))?;
        if target.is_admin {
            return Ok(());
        }
        user_repo::set_admin(self.store.as_ref(), handle).await
    }

    /// Number of registered users; public, shown on the landing page.
    pub async fn user_count(&self) -> Result<usize> {
        Ok(user_repo::list_users(self.store.as_ref()).await?.len())
    }
}

fn ensure_admin(user: &CurrentUser) -> Result<()> {
    if user.is_admin {
        return Ok(());
    }
    Err(AppError::Unauthorized("administrator privileges required".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_pattern() {
        assert!(HANDLE_REGEX.is_match("alice"));
        assert!(HANDLE_REGEX.is_match("user_name_123"));
        assert!(!HANDLE_REGEX.is_match("al"));
        assert!(!HANDLE_REGEX.is_match("has space"));
        assert!(!HANDLE_REGEX.is_match("path/traversal"));
        assert!(!HANDLE_REGEX.is_match(&"x".repeat(33)));
    }
}
