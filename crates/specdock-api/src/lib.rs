//! Specdock API - HTTP layer over the policy engine and share codec
//!
//! The handlers are thin: load the member and the policies that apply,
//! delegate the decision to `specdock-policy`, map the outcome to an HTTP
//! status. Identity is assumed to be resolved upstream; this surface takes
//! member ids directly.

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
