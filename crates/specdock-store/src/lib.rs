//! Specdock Store - in-memory implementation of the core repository traits
//!
//! Backs the service when no external database is wired in, and the test
//! suites always. DashMap keeps each collection independently lockable;
//! cascade deletes (member -> custom policies, workspace -> policies and
//! members) are handled here so callers never observe orphaned rows.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use specdock_core::{
    CustomPolicyId, CustomPolicyRepository, MemberCustomPolicy, MemberId, MemberRepository,
    Result, Role, SpecdockError, WorkspaceId, WorkspaceMember, WorkspacePolicy,
    WorkspacePolicyId, WorkspacePolicyRepository,
};
use tracing::debug;

/// All collections in one store so cascades can reach across them
#[derive(Debug, Default)]
pub struct MemoryPolicyStore {
    members: DashMap<MemberId, WorkspaceMember>,
    workspace_policies: DashMap<WorkspacePolicyId, WorkspacePolicy>,
    custom_policies: DashMap<CustomPolicyId, MemberCustomPolicy>,
}

impl MemoryPolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a workspace and everything it owns: policies and members,
    /// and transitively each member's custom policies.
    pub async fn delete_workspace(&self, workspace_id: WorkspaceId) -> Result<()> {
        self.delete_by_workspace(workspace_id).await?;

        let member_ids: Vec<MemberId> = self
            .members
            .iter()
            .filter(|entry| entry.value().workspace_id == workspace_id)
            .map(|entry| *entry.key())
            .collect();
        for member_id in member_ids {
            MemberRepository::delete(self, member_id).await?;
        }
        debug!(%workspace_id, "workspace cascade delete complete");
        Ok(())
    }
}

#[async_trait]
impl MemberRepository for MemoryPolicyStore {
    async fn upsert(&self, mut member: WorkspaceMember) -> Result<WorkspaceMember> {
        member.updated_at = Utc::now();
        self.members.insert(member.id, member.clone());
        Ok(member)
    }

    async fn get_by_id(&self, id: MemberId) -> Result<Option<WorkspaceMember>> {
        Ok(self.members.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_by_workspace(&self, workspace_id: WorkspaceId) -> Result<Vec<WorkspaceMember>> {
        Ok(self
            .members
            .iter()
            .filter(|entry| entry.value().workspace_id == workspace_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn set_role(&self, id: MemberId, role: Role) -> Result<WorkspaceMember> {
        let mut entry = self
            .members
            .get_mut(&id)
            .ok_or_else(|| SpecdockError::not_found("member", id.to_string()))?;
        entry.role = role;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn attach_policy(&self, id: MemberId, policy_id: &str) -> Result<WorkspaceMember> {
        let mut entry = self
            .members
            .get_mut(&id)
            .ok_or_else(|| SpecdockError::not_found("member", id.to_string()))?;
        // Idempotent: an already-attached id is not added twice.
        if !entry.attached_policies.iter().any(|p| p == policy_id) {
            entry.attached_policies.push(policy_id.to_string());
            entry.updated_at = Utc::now();
        }
        Ok(entry.clone())
    }

    async fn detach_policy(&self, id: MemberId, policy_id: &str) -> Result<WorkspaceMember> {
        let mut entry = self
            .members
            .get_mut(&id)
            .ok_or_else(|| SpecdockError::not_found("member", id.to_string()))?;
        let before = entry.attached_policies.len();
        entry.attached_policies.retain(|p| p != policy_id);
        if entry.attached_policies.len() != before {
            entry.updated_at = Utc::now();
        }
        Ok(entry.clone())
    }

    async fn delete(&self, id: MemberId) -> Result<()> {
        self.members
            .remove(&id)
            .ok_or_else(|| SpecdockError::not_found("member", id.to_string()))?;
        let removed = self.delete_by_member(id).await?;
        debug!(%id, cascaded_policies = removed, "member deleted");
        Ok(())
    }
}

#[async_trait]
impl WorkspacePolicyRepository for MemoryPolicyStore {
    async fn create(&self, mut policy: WorkspacePolicy) -> Result<WorkspacePolicy> {
        if policy.name.trim().is_empty() {
            return Err(SpecdockError::invalid_input("policy name is required"));
        }
        let now = Utc::now();
        policy.created_at = now;
        policy.updated_at = now;
        self.workspace_policies.insert(policy.id, policy.clone());
        Ok(policy)
    }

    async fn get_by_id(&self, id: WorkspacePolicyId) -> Result<Option<WorkspacePolicy>> {
        Ok(self
            .workspace_policies
            .get(&id)
            .map(|entry| entry.value().clone()))
    }

    async fn list_by_workspace(&self, workspace_id: WorkspaceId) -> Result<Vec<WorkspacePolicy>> {
        Ok(self
            .workspace_policies
            .iter()
            .filter(|entry| entry.value().workspace_id == workspace_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn update(&self, mut policy: WorkspacePolicy) -> Result<WorkspacePolicy> {
        let mut entry = self
            .workspace_policies
            .get_mut(&policy.id)
            .ok_or_else(|| SpecdockError::not_found("workspace_policy", policy.id.to_string()))?;
        policy.created_at = entry.created_at;
        policy.updated_at = Utc::now();
        *entry = policy.clone();
        Ok(policy)
    }

    async fn deactivate(&self, id: WorkspacePolicyId) -> Result<WorkspacePolicy> {
        let mut entry = self
            .workspace_policies
            .get_mut(&id)
            .ok_or_else(|| SpecdockError::not_found("workspace_policy", id.to_string()))?;
        entry.is_active = false;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn delete(&self, id: WorkspacePolicyId) -> Result<()> {
        self.workspace_policies
            .remove(&id)
            .ok_or_else(|| SpecdockError::not_found("workspace_policy", id.to_string()))?;
        Ok(())
    }

    async fn delete_by_workspace(&self, workspace_id: WorkspaceId) -> Result<u64> {
        let ids: Vec<WorkspacePolicyId> = self
            .workspace_policies
            .iter()
            .filter(|entry| entry.value().workspace_id == workspace_id)
            .map(|entry| *entry.key())
            .collect();
        let count = ids.len() as u64;
        for id in ids {
            self.workspace_policies.remove(&id);
        }
        Ok(count)
    }
}

#[async_trait]
impl CustomPolicyRepository for MemoryPolicyStore {
    async fn create(&self, mut policy: MemberCustomPolicy) -> Result<MemberCustomPolicy> {
        if policy.name.trim().is_empty() {
            return Err(SpecdockError::invalid_input("policy name is required"));
        }
        if !self.members.contains_key(&policy.member_id) {
            return Err(SpecdockError::not_found(
                "member",
                policy.member_id.to_string(),
            ));
        }
        let now = Utc::now();
        policy.created_at = now;
        policy.updated_at = now;
        self.custom_policies.insert(policy.id, policy.clone());
        Ok(policy)
    }

    async fn get_by_id(&self, id: CustomPolicyId) -> Result<Option<MemberCustomPolicy>> {
        Ok(self
            .custom_policies
            .get(&id)
            .map(|entry| entry.value().clone()))
    }

    async fn list_by_member(&self, member_id: MemberId) -> Result<Vec<MemberCustomPolicy>> {
        Ok(self
            .custom_policies
            .iter()
            .filter(|entry| entry.value().member_id == member_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn deactivate(&self, id: CustomPolicyId) -> Result<MemberCustomPolicy> {
        let mut entry = self
            .custom_policies
            .get_mut(&id)
            .ok_or_else(|| SpecdockError::not_found("custom_policy", id.to_string()))?;
        entry.is_active = false;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn delete(&self, id: CustomPolicyId) -> Result<()> {
        self.custom_policies
            .remove(&id)
            .ok_or_else(|| SpecdockError::not_found("custom_policy", id.to_string()))?;
        Ok(())
    }

    async fn delete_by_member(&self, member_id: MemberId) -> Result<u64> {
        let ids: Vec<CustomPolicyId> = self
            .custom_policies
            .iter()
            .filter(|entry| entry.value().member_id == member_id)
            .map(|entry| *entry.key())
            .collect();
        let count = ids.len() as u64;
        for id in ids {
            self.custom_policies.remove(&id);
        }
        Ok(count)
    }
}
