//! Authorization check handler
//!
//! The route layer's job per the access model: load the member, gather the
//! policies that might apply, hand everything to the resolution layer and
//! turn its boolean into a status code.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use specdock_core::{
    CustomPolicyRepository, MemberId, MemberRepository, WorkspacePolicyRepository,
};
use specdock_policy::AccessRequest;

use super::{internal_error, not_found, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckAccessBody {
    pub member_id: MemberId,
    pub action: String,
    pub resource: String,
}

#[derive(Debug, Serialize)]
pub struct CheckAccessDto {
    pub allowed: bool,
}

/// POST /api/v1/authz/check
pub async fn check_access(
    State(state): State<AppState>,
    Json(body): Json<CheckAccessBody>,
) -> Result<Json<CheckAccessDto>, (StatusCode, Json<ErrorResponse>)> {
    debug!(member_id = %body.member_id, action = %body.action, "access check");

    let store = state.store.as_ref();

    let member = MemberRepository::get_by_id(store, body.member_id)
        .await
        .map_err(|e| internal_error(e.to_string()))?
        .ok_or_else(|| not_found("Member not found"))?;

    let workspace_policies = WorkspacePolicyRepository::list_by_workspace(store, member.workspace_id)
        .await
        .map_err(|e| internal_error(e.to_string()))?;

    let custom_policies = CustomPolicyRepository::list_by_member(store, member.id)
        .await
        .map_err(|e| internal_error(e.to_string()))?;

    let request = AccessRequest {
        role: Some(member.role),
        workspace_policies: &workspace_policies,
        attached_policies: &member.attached_policies,
        custom_policies: &custom_policies,
    };
    let allowed = specdock_policy::check_access(&request, &body.action, &body.resource);

    info!(
        member_id = %member.id,
        action = %body.action,
        resource = %body.resource,
        allowed,
        "access check complete"
    );

    Ok(Json(CheckAccessDto { allowed }))
}
