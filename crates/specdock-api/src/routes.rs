//! API route definitions

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the full API router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // API v1 routes with state
        .nest("/api/v1", api_v1_routes(state))
}

/// API v1 routes
fn api_v1_routes(state: AppState) -> Router {
    Router::new()
        .nest("/catalog", catalog_routes())
        .nest("/authz", authz_routes(state.clone()))
        .nest("/workspaces", workspace_routes(state.clone()))
        .nest("/members", member_routes(state.clone()))
        .nest("/shares", share_routes(state))
}

/// Catalog routes (static data, no state)
fn catalog_routes() -> Router {
    Router::new()
        .route("/actions", get(handlers::policies::list_actions))
        .route("/policies", get(handlers::policies::list_managed_policies))
        .route("/policies/{id}", get(handlers::policies::get_managed_policy))
}

/// Authorization routes
fn authz_routes(state: AppState) -> Router {
    Router::new()
        .route("/check", post(handlers::authz::check_access))
        .with_state(state)
}

/// Workspace policy CRUD routes
fn workspace_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/{workspace_id}/policies",
            post(handlers::policies::create_workspace_policy),
        )
        .route(
            "/{workspace_id}/policies",
            get(handlers::policies::list_workspace_policies),
        )
        .route(
            "/{workspace_id}/policies/{id}",
            put(handlers::policies::update_workspace_policy),
        )
        .route(
            "/{workspace_id}/policies/{id}/deactivate",
            post(handlers::policies::deactivate_workspace_policy),
        )
        .route(
            "/{workspace_id}/policies/{id}",
            delete(handlers::policies::delete_workspace_policy),
        )
        .with_state(state)
}

/// Member routes: custom policies and managed policy attachment
fn member_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/{member_id}/policies",
            post(handlers::policies::create_custom_policy),
        )
        .route(
            "/{member_id}/policies",
            get(handlers::policies::list_custom_policies),
        )
        .route(
            "/{member_id}/policies/{id}/deactivate",
            post(handlers::policies::deactivate_custom_policy),
        )
        .route(
            "/{member_id}/policies/{id}",
            delete(handlers::policies::delete_custom_policy),
        )
        .route(
            "/{member_id}/attached-policies",
            post(handlers::policies::attach_managed_policy),
        )
        .route(
            "/{member_id}/attached-policies/{policy_id}",
            delete(handlers::policies::detach_managed_policy),
        )
        .with_state(state)
}

/// Share link routes
fn share_routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(handlers::share::create_share_link))
        .route("/{token}", get(handlers::share::resolve_share_token))
        .with_state(state)
}
