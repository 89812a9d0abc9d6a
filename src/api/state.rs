//! API server state

use crate::search::SearchStore;
use crate::stripe::StripeClient;

/// API server state
///
/// Both members are cheap to clone; the reqwest client and the sqlx pool
/// are internally reference-counted and safe to share across requests.
#[derive(Clone)]
pub struct AppState {
    /// Upstream Stripe client
    pub stripe: StripeClient,

    /// Replicated resource search store
    pub store: SearchStore,
}

impl AppState {
    pub fn new(stripe: StripeClient, store: SearchStore) -> Self {
        Self { stripe, store }
    }
}
