//! Application state for API handlers

use std::sync::Arc;

use specdock_share::ShareTokenService;
use specdock_store::MemoryPolicyStore;

/// Concrete application state with all services
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryPolicyStore>,
    pub share_tokens: Arc<ShareTokenService>,
    /// Base URL used when rendering share links
    pub public_base_url: String,
}

impl AppState {
    pub fn new(share_tokens: ShareTokenService, public_base_url: impl Into<String>) -> Self {
        Self {
            store: Arc::new(MemoryPolicyStore::new()),
            share_tokens: Arc::new(share_tokens),
            public_base_url: public_base_url.into(),
        }
    }
}
