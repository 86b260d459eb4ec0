//! Repository traits for the Specdock access-control engine
//!
//! The persistence layer behind these traits is swappable; the service ships
//! with an in-memory implementation (`specdock-store`). All mutating
//! operations return the stored entity so callers observe timestamps set by
//! the store.

use crate::{error::Result, ids::*, models::*};
use async_trait::async_trait;

/// Workspace member operations
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn upsert(&self, member: WorkspaceMember) -> Result<WorkspaceMember>;
    async fn get_by_id(&self, id: MemberId) -> Result<Option<WorkspaceMember>>;
    async fn list_by_workspace(&self, workspace_id: WorkspaceId) -> Result<Vec<WorkspaceMember>>;
    async fn set_role(&self, id: MemberId, role: Role) -> Result<WorkspaceMember>;

    /// Attach a managed policy by id. Idempotent: attaching an id that is
    /// already present is a no-op, not an error.
    async fn attach_policy(&self, id: MemberId, policy_id: &str) -> Result<WorkspaceMember>;

    /// Detach a managed policy by id. Detaching an id that is not attached
    /// is a no-op.
    async fn detach_policy(&self, id: MemberId, policy_id: &str) -> Result<WorkspaceMember>;

    /// Remove a member. Cascades to the member's custom policies.
    async fn delete(&self, id: MemberId) -> Result<()>;
}

/// Workspace policy operations
#[async_trait]
pub trait WorkspacePolicyRepository: Send + Sync {
    async fn create(&self, policy: WorkspacePolicy) -> Result<WorkspacePolicy>;
    async fn get_by_id(&self, id: WorkspacePolicyId) -> Result<Option<WorkspacePolicy>>;
    async fn list_by_workspace(&self, workspace_id: WorkspaceId) -> Result<Vec<WorkspacePolicy>>;
    async fn update(&self, policy: WorkspacePolicy) -> Result<WorkspacePolicy>;

    /// Soft-deactivate: sets `is_active = false`, keeps the row
    async fn deactivate(&self, id: WorkspacePolicyId) -> Result<WorkspacePolicy>;

    async fn delete(&self, id: WorkspacePolicyId) -> Result<()>;

    /// Remove every policy owned by a workspace (owner-delete cascade)
    async fn delete_by_workspace(&self, workspace_id: WorkspaceId) -> Result<u64>;
}

/// Member custom policy operations
#[async_trait]
pub trait CustomPolicyRepository: Send + Sync {
    async fn create(&self, policy: MemberCustomPolicy) -> Result<MemberCustomPolicy>;
    async fn get_by_id(&self, id: CustomPolicyId) -> Result<Option<MemberCustomPolicy>>;
    async fn list_by_member(&self, member_id: MemberId) -> Result<Vec<MemberCustomPolicy>>;

    /// Soft-deactivate: sets `is_active = false`, keeps the row
    async fn deactivate(&self, id: CustomPolicyId) -> Result<MemberCustomPolicy>;

    async fn delete(&self, id: CustomPolicyId) -> Result<()>;

    /// Remove every custom policy owned by a member (owner-delete cascade)
    async fn delete_by_member(&self, member_id: MemberId) -> Result<u64>;
}
