//! Domain models for the Specdock access-control engine
//!
//! ## Wire formats
//!
//! Two serialized shapes here are load-bearing:
//! - `Statement` uses IAM-style PascalCase field names (`Effect`, `Action`,
//!   `Resource`, `Condition`) so stored policy documents stay readable to
//!   anyone familiar with the convention.
//! - `SharePayload` / `SharePermissions` use the camelCase field names baked
//!   into every share token already in circulation (`documentId`, `userId`,
//!   `expiresAt`, `canView`, `canEdit`, `canDownload`). Renaming any of them
//!   invalidates outstanding tokens.

use crate::ids::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Roles
// =============================================================================

/// Workspace member role
///
/// Owner and Admin carry an implicit full-access bypass applied in the
/// access-resolution layer; the other roles are governed entirely by the
/// policies attached to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Owner,
    Admin,
    Member,
    Editor,
    Viewer,
}

impl Role {
    /// Roles that skip policy evaluation entirely
    pub fn is_administrative(&self) -> bool {
        matches!(self, Role::Owner | Role::Admin)
    }
}

// =============================================================================
// Policy Statements
// =============================================================================

/// Effect of a matching statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// A single Allow/Deny rule over a set of actions and resources
///
/// `Action` entries are `domain:Verb` names, `domain:*`, or `*`. `Resource`
/// entries are identifiers that may embed `*` globs. `Condition` is reserved
/// and currently ignored by the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub effect: Effect,
    #[serde(default)]
    pub action: Vec<String>,
    #[serde(default)]
    pub resource: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<HashMap<String, serde_json::Value>>,
}

impl Statement {
    pub fn allow(actions: &[&str], resources: &[&str]) -> Self {
        Self::new(Effect::Allow, actions, resources)
    }

    pub fn deny(actions: &[&str], resources: &[&str]) -> Self {
        Self::new(Effect::Deny, actions, resources)
    }

    fn new(effect: Effect, actions: &[&str], resources: &[&str]) -> Self {
        Self {
            effect,
            action: actions.iter().map(|s| s.to_string()).collect(),
            resource: resources.iter().map(|s| s.to_string()).collect(),
            condition: None,
        }
    }
}

// =============================================================================
// Policies
// =============================================================================

/// A predefined, immutable bundle of statements, attachable by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedPolicy {
    pub id: String,
    pub name: String,
    pub description: String,
    pub statements: Vec<Statement>,
}

/// Per-workspace policy expressed as boolean capability flags
///
/// A simplified projection of the statement model: each enabled flag grants
/// one action on every resource, for every member whose role appears in
/// `applies_to`. Converted to statements by the access-resolution layer;
/// the evaluator never sees this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspacePolicy {
    pub id: WorkspacePolicyId,
    pub workspace_id: WorkspaceId,
    pub name: String,
    pub applies_to: Vec<Role>,
    pub is_active: bool,
    pub can_create_documents: bool,
    pub can_edit_documents: bool,
    pub can_delete_documents: bool,
    pub can_publish_documents: bool,
    pub can_share_documents: bool,
    pub can_download_documents: bool,
    pub can_invite_members: bool,
    pub can_view_members: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A member-owned, ad hoc bundle of statements
///
/// `resource_patterns` and `actions` record what the member asked for when
/// the policy was created; evaluation uses only `statements`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberCustomPolicy {
    pub id: CustomPolicyId,
    pub member_id: MemberId,
    pub name: String,
    pub description: Option<String>,
    pub statements: Vec<Statement>,
    pub resource_patterns: Vec<String>,
    pub actions: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user's membership in a workspace, with role and attached managed policies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceMember {
    pub id: MemberId,
    pub workspace_id: WorkspaceId,
    pub user_id: UserId,
    pub role: Role,
    /// Managed policy ids, order irrelevant, no duplicates
    pub attached_policies: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Share Tokens
// =============================================================================

/// Permissions embedded in a share token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePermissions {
    #[serde(rename = "canView")]
    pub can_view: bool,
    #[serde(rename = "canEdit")]
    pub can_edit: bool,
    #[serde(rename = "canDownload")]
    pub can_download: bool,
}

impl Default for SharePermissions {
    fn default() -> Self {
        Self {
            can_view: true,
            can_edit: false,
            can_download: true,
        }
    }
}

/// Signed payload of a share token
///
/// `expires_at` is milliseconds since the Unix epoch. Field order matters for
/// byte-identical re-serialization of freshly minted tokens, not for
/// verification (the signature covers the encoded payload as received).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharePayload {
    #[serde(rename = "documentId")]
    pub document_id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: i64,
    pub permissions: SharePermissions,
}
