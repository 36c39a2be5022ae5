//! Shared handles every handler needs: the store and identity clients behind
//! their traits, so tests can swap the in-memory backends in.

use identity_client::IdentityProvider;
use std::sync::Arc;
use store_client::StoreBackend;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StoreBackend>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(store: Arc<dyn StoreBackend>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { store, identity }
    }
}
