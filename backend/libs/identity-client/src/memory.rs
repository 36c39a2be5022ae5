//! In-process identity provider for tests: accounts and session tokens live
//! in a map, tokens never expire.

use crate::{Identity, IdentityError, IdentityProvider};
use async_trait::async_trait;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryIdentity {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    // email -> account
    accounts: HashMap<String, Account>,
    // token -> email
    sessions: HashMap<String, String>,
}

struct Account {
    uid: String,
    password: String,
}

fn random_hex(bytes: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..bytes).map(|_| format!("{:02x}", rng.gen::<u8>())).collect()
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        let mut state = self.state.lock().unwrap();
        if state.accounts.contains_key(email) {
            return Err(IdentityError::EmailTaken);
        }
        let uid = format!("uid-{}", random_hex(8));
        state.accounts.insert(
            email.to_string(),
            Account {
                uid: uid.clone(),
                password: password.to_string(),
            },
        );
        let token = random_hex(16);
        state.sessions.insert(token.clone(), email.to_string());
        Ok(Identity {
            uid,
            email: email.to_string(),
            id_token: token,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        let mut state = self.state.lock().unwrap();
        let uid = match state.accounts.get(email) {
            Some(account) if account.password == password => account.uid.clone(),
            _ => return Err(IdentityError::InvalidCredentials),
        };
        let token = random_hex(16);
        state.sessions.insert(token.clone(), email.to_string());
        Ok(Identity {
            uid,
            email: email.to_string(),
            id_token: token,
        })
    }

    async fn lookup(&self, id_token: &str) -> Result<Identity, IdentityError> {
        let state = self.state.lock().unwrap();
        let email = state
            .sessions
            .get(id_token)
            .ok_or(IdentityError::InvalidToken)?;
        let account = state
            .accounts
            .get(email)
            .ok_or(IdentityError::InvalidToken)?;
        Ok(Identity {
            uid: account.uid.clone(),
            email: email.clone(),
            id_token: id_token.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_up_rejects_duplicate_email() {
        let identity = MemoryIdentity::new();
        identity.sign_up("a@example.com", "secret1").await.unwrap();
        let err = identity.sign_up("a@example.com", "other").await.unwrap_err();
        assert!(matches!(err, IdentityError::EmailTaken));
    }

    #[tokio::test]
    async fn test_sign_in_rejects_wrong_password() {
        let identity = MemoryIdentity::new();
        identity.sign_up("a@example.com", "secret1").await.unwrap();
        let err = identity.sign_in("a@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, IdentityError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_lookup_resolves_minted_token() {
        let identity = MemoryIdentity::new();
        let signed_up = identity.sign_up("a@example.com", "secret1").await.unwrap();
        let signed_in = identity.sign_in("a@example.com", "secret1").await.unwrap();
        assert_eq!(signed_up.uid, signed_in.uid);

        let resolved = identity.lookup(&signed_in.id_token).await.unwrap();
        assert_eq!(resolved.uid, signed_up.uid);
        assert_eq!(resolved.email, "a@example.com");
    }

    #[tokio::test]
    async fn test_lookup_rejects_unknown_token() {
        let identity = MemoryIdentity::new();
        let err = identity.lookup("not-a-token").await.unwrap_err();
        assert!(matches!(err, IdentityError::InvalidToken));
    }
}
