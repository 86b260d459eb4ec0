//! Policy handlers: catalog enumeration, workspace policy CRUD, member
//! custom policy CRUD, and managed policy attachment

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use specdock_core::{
    CustomPolicyId, CustomPolicyRepository, MemberCustomPolicy, MemberId, MemberRepository,
    Role, SpecdockError, Statement, WorkspaceId, WorkspacePolicy, WorkspacePolicyId,
    WorkspacePolicyRepository,
};
use specdock_policy::catalog;

use super::{bad_request, internal_error, not_found, ErrorResponse};
use crate::state::AppState;

fn map_store_error(e: SpecdockError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        SpecdockError::NotFound { .. } => not_found(e.to_string()),
        SpecdockError::InvalidInput { .. } => bad_request(e.to_string()),
        other => {
            warn!("store error: {}", other);
            internal_error(other.to_string())
        }
    }
}

// =============================================================================
// Catalog (read-only, static)
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ActionDto {
    pub name: &'static str,
    pub description: &'static str,
}

/// GET /api/v1/catalog/actions
pub async fn list_actions() -> Json<Vec<ActionDto>> {
    Json(
        catalog::actions()
            .iter()
            .map(|a| ActionDto {
                name: a.name,
                description: a.description,
            })
            .collect(),
    )
}

#[derive(Debug, Serialize)]
pub struct ManagedPolicyDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub statements: Vec<Statement>,
}

impl From<&specdock_core::ManagedPolicy> for ManagedPolicyDto {
    fn from(p: &specdock_core::ManagedPolicy) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            description: p.description.clone(),
            statements: p.statements.clone(),
        }
    }
}

/// GET /api/v1/catalog/policies
pub async fn list_managed_policies() -> Json<Vec<ManagedPolicyDto>> {
    Json(catalog::managed_policies().iter().map(Into::into).collect())
}

/// GET /api/v1/catalog/policies/{id}
pub async fn get_managed_policy(
    Path(id): Path<String>,
) -> Result<Json<ManagedPolicyDto>, (StatusCode, Json<ErrorResponse>)> {
    catalog::managed_policy(&id)
        .map(|p| Json(p.into()))
        .ok_or_else(|| not_found("Managed policy not found"))
}

// =============================================================================
// Workspace policies
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct WorkspacePolicyBody {
    pub name: String,
    pub applies_to: Vec<Role>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub can_create_documents: bool,
    #[serde(default)]
    pub can_edit_documents: bool,
    #[serde(default)]
    pub can_delete_documents: bool,
    #[serde(default)]
    pub can_publish_documents: bool,
    #[serde(default)]
    pub can_share_documents: bool,
    #[serde(default)]
    pub can_download_documents: bool,
    #[serde(default)]
    pub can_invite_members: bool,
    #[serde(default)]
    pub can_view_members: bool,
}

fn default_true() -> bool {
    true
}

impl WorkspacePolicyBody {
    fn into_policy(self, id: WorkspacePolicyId, workspace_id: WorkspaceId) -> WorkspacePolicy {
        let now = Utc::now();
        WorkspacePolicy {
            id,
            workspace_id,
            name: self.name,
            applies_to: self.applies_to,
            is_active: self.is_active,
            can_create_documents: self.can_create_documents,
            can_edit_documents: self.can_edit_documents,
            can_delete_documents: self.can_delete_documents,
            can_publish_documents: self.can_publish_documents,
            can_share_documents: self.can_share_documents,
            can_download_documents: self.can_download_documents,
            can_invite_members: self.can_invite_members,
            can_view_members: self.can_view_members,
            created_at: now,
            updated_at: now,
        }
    }
}

/// POST /api/v1/workspaces/{workspace_id}/policies
pub async fn create_workspace_policy(
    State(state): State<AppState>,
    Path(workspace_id): Path<WorkspaceId>,
    Json(body): Json<WorkspacePolicyBody>,
) -> Result<(StatusCode, Json<WorkspacePolicy>), (StatusCode, Json<ErrorResponse>)> {
    if body.name.trim().is_empty() {
        return Err(bad_request("Policy name is required"));
    }
    if body.applies_to.is_empty() {
        return Err(bad_request("applies_to must name at least one role"));
    }

    let policy = body.into_policy(WorkspacePolicyId::new(), workspace_id);
    let created = WorkspacePolicyRepository::create(state.store.as_ref(), policy)
        .await
        .map_err(map_store_error)?;

    info!(policy_id = %created.id, %workspace_id, "workspace policy created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/workspaces/{workspace_id}/policies
pub async fn list_workspace_policies(
    State(state): State<AppState>,
    Path(workspace_id): Path<WorkspaceId>,
) -> Result<Json<Vec<WorkspacePolicy>>, (StatusCode, Json<ErrorResponse>)> {
    let policies = WorkspacePolicyRepository::list_by_workspace(state.store.as_ref(), workspace_id)
        .await
        .map_err(map_store_error)?;
    Ok(Json(policies))
}

/// PUT /api/v1/workspaces/{workspace_id}/policies/{id}
pub async fn update_workspace_policy(
    State(state): State<AppState>,
    Path((workspace_id, id)): Path<(WorkspaceId, WorkspacePolicyId)>,
    Json(body): Json<WorkspacePolicyBody>,
) -> Result<Json<WorkspacePolicy>, (StatusCode, Json<ErrorResponse>)> {
    // Workspace scoping: the policy must belong to the workspace in the path.
    let existing = WorkspacePolicyRepository::get_by_id(state.store.as_ref(), id)
        .await
        .map_err(map_store_error)?
        .ok_or_else(|| not_found("Workspace policy not found"))?;
    if existing.workspace_id != workspace_id {
        return Err(not_found("Workspace policy not found"));
    }

    let updated = WorkspacePolicyRepository::update(
        state.store.as_ref(),
        body.into_policy(id, workspace_id),
    )
    .await
    .map_err(map_store_error)?;

    Ok(Json(updated))
}

/// POST /api/v1/workspaces/{workspace_id}/policies/{id}/deactivate
pub async fn deactivate_workspace_policy(
    State(state): State<AppState>,
    Path((workspace_id, id)): Path<(WorkspaceId, WorkspacePolicyId)>,
) -> Result<Json<WorkspacePolicy>, (StatusCode, Json<ErrorResponse>)> {
    let existing = WorkspacePolicyRepository::get_by_id(state.store.as_ref(), id)
        .await
        .map_err(map_store_error)?
        .ok_or_else(|| not_found("Workspace policy not found"))?;
    if existing.workspace_id != workspace_id {
        return Err(not_found("Workspace policy not found"));
    }

    let policy = WorkspacePolicyRepository::deactivate(state.store.as_ref(), id)
        .await
        .map_err(map_store_error)?;
    info!(policy_id = %id, "workspace policy deactivated");
    Ok(Json(policy))
}

/// DELETE /api/v1/workspaces/{workspace_id}/policies/{id}
pub async fn delete_workspace_policy(
    State(state): State<AppState>,
    Path((workspace_id, id)): Path<(WorkspaceId, WorkspacePolicyId)>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let existing = WorkspacePolicyRepository::get_by_id(state.store.as_ref(), id)
        .await
        .map_err(map_store_error)?
        .ok_or_else(|| not_found("Workspace policy not found"))?;
    if existing.workspace_id != workspace_id {
        return Err(not_found("Workspace policy not found"));
    }

    WorkspacePolicyRepository::delete(state.store.as_ref(), id)
        .await
        .map_err(map_store_error)?;
    info!(policy_id = %id, "workspace policy deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Member custom policies
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CustomPolicyBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub statements: Vec<Statement>,
    #[serde(default)]
    pub resource_patterns: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
}

/// POST /api/v1/members/{member_id}/policies
pub async fn create_custom_policy(
    State(state): State<AppState>,
    Path(member_id): Path<MemberId>,
    Json(body): Json<CustomPolicyBody>,
) -> Result<(StatusCode, Json<MemberCustomPolicy>), (StatusCode, Json<ErrorResponse>)> {
    if body.name.trim().is_empty() {
        return Err(bad_request("Policy name is required"));
    }
    if body.statements.is_empty() {
        return Err(bad_request("At least one statement is required"));
    }
    for statement in &body.statements {
        if statement.action.is_empty() || statement.resource.is_empty() {
            return Err(bad_request(
                "Every statement needs a non-empty Action and Resource list",
            ));
        }
    }

    let now = Utc::now();
    let policy = MemberCustomPolicy {
        id: CustomPolicyId::new(),
        member_id,
        name: body.name,
        description: body.description,
        statements: body.statements,
        resource_patterns: body.resource_patterns,
        actions: body.actions,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    let created = CustomPolicyRepository::create(state.store.as_ref(), policy)
        .await
        .map_err(map_store_error)?;

    info!(policy_id = %created.id, %member_id, "custom policy created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/members/{member_id}/policies
pub async fn list_custom_policies(
    State(state): State<AppState>,
    Path(member_id): Path<MemberId>,
) -> Result<Json<Vec<MemberCustomPolicy>>, (StatusCode, Json<ErrorResponse>)> {
    let policies = CustomPolicyRepository::list_by_member(state.store.as_ref(), member_id)
        .await
        .map_err(map_store_error)?;
    Ok(Json(policies))
}

/// POST /api/v1/members/{member_id}/policies/{id}/deactivate
pub async fn deactivate_custom_policy(
    State(state): State<AppState>,
    Path((member_id, id)): Path<(MemberId, CustomPolicyId)>,
) -> Result<Json<MemberCustomPolicy>, (StatusCode, Json<ErrorResponse>)> {
    let existing = CustomPolicyRepository::get_by_id(state.store.as_ref(), id)
        .await
        .map_err(map_store_error)?
        .ok_or_else(|| not_found("Custom policy not found"))?;
    if existing.member_id != member_id {
        return Err(not_found("Custom policy not found"));
    }

    let policy = CustomPolicyRepository::deactivate(state.store.as_ref(), id)
        .await
        .map_err(map_store_error)?;
    info!(policy_id = %id, "custom policy deactivated");
    Ok(Json(policy))
}

/// DELETE /api/v1/members/{member_id}/policies/{id}
pub async fn delete_custom_policy(
    State(state): State<AppState>,
    Path((member_id, id)): Path<(MemberId, CustomPolicyId)>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let existing = CustomPolicyRepository::get_by_id(state.store.as_ref(), id)
        .await
        .map_err(map_store_error)?
        .ok_or_else(|| not_found("Custom policy not found"))?;
    if existing.member_id != member_id {
        return Err(not_found("Custom policy not found"));
    }

    CustomPolicyRepository::delete(state.store.as_ref(), id)
        .await
        .map_err(map_store_error)?;
    info!(policy_id = %id, "custom policy deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Managed policy attachment
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AttachPolicyBody {
    pub policy_id: String,
}

#[derive(Debug, Serialize)]
pub struct AttachedPoliciesDto {
    pub member_id: MemberId,
    pub attached_policies: Vec<String>,
}

/// POST /api/v1/members/{member_id}/attached-policies
pub async fn attach_managed_policy(
    State(state): State<AppState>,
    Path(member_id): Path<MemberId>,
    Json(body): Json<AttachPolicyBody>,
) -> Result<Json<AttachedPoliciesDto>, (StatusCode, Json<ErrorResponse>)> {
    // Attachment references the static catalog; an id the catalog does not
    // know is a caller mistake, rejected before it reaches the store.
    if catalog::managed_policy(&body.policy_id).is_none() {
        return Err(bad_request(format!(
            "Unknown managed policy id: {}",
            body.policy_id
        )));
    }

    let member = MemberRepository::attach_policy(state.store.as_ref(), member_id, &body.policy_id)
        .await
        .map_err(map_store_error)?;

    info!(%member_id, policy_id = %body.policy_id, "managed policy attached");
    Ok(Json(AttachedPoliciesDto {
        member_id: member.id,
        attached_policies: member.attached_policies,
    }))
}

/// DELETE /api/v1/members/{member_id}/attached-policies/{policy_id}
pub async fn detach_managed_policy(
    State(state): State<AppState>,
    Path((member_id, policy_id)): Path<(MemberId, String)>,
) -> Result<Json<AttachedPoliciesDto>, (StatusCode, Json<ErrorResponse>)> {
    let member = MemberRepository::detach_policy(state.store.as_ref(), member_id, &policy_id)
        .await
        .map_err(map_store_error)?;

    info!(%member_id, %policy_id, "managed policy detached");
    Ok(Json(AttachedPoliciesDto {
        member_id: member.id,
        attached_policies: member.attached_policies,
    }))
}
