//! Access resolution for workspace members
//!
//! Sits between the route layer (which has already loaded the member and the
//! policies that might apply) and the evaluator. Responsibilities:
//!
//! - the Owner/Admin bypass: administrative roles skip evaluation entirely
//!   and are always allowed. This is deliberately absolute — a Deny statement
//!   cannot constrain an admin.
//! - projecting workspace policies' boolean flags into statements.
//! - aggregating statements from all three sources (workspace policies
//!   filtered by role, attached managed policies, member custom policies)
//!   into one flat list. Source order is irrelevant: Deny dominates wherever
//!   it comes from.

use specdock_core::{MemberCustomPolicy, Role, Statement, WorkspacePolicy};
use tracing::debug;

use crate::catalog;
use crate::evaluator::evaluate;

/// Everything the route layer has resolved about the acting member
#[derive(Debug, Clone, Default)]
pub struct AccessRequest<'a> {
    pub role: Option<Role>,
    /// All policies of the member's workspace; inactive ones and ones whose
    /// `applies_to` excludes the role are filtered here
    pub workspace_policies: &'a [WorkspacePolicy],
    /// Managed policy ids attached to the member; unknown ids contribute
    /// nothing
    pub attached_policies: &'a [String],
    /// The member's custom policies; inactive ones are filtered here
    pub custom_policies: &'a [MemberCustomPolicy],
}

/// Decide whether the member may perform `action` on `resource`.
pub fn check_access(request: &AccessRequest<'_>, action: &str, resource: &str) -> bool {
    if let Some(role) = request.role {
        if role.is_administrative() {
            debug!(?role, action, resource, "administrative role bypass");
            return true;
        }
    }

    let statements = gather_statements(request);
    let allowed = evaluate(&statements, action, resource);
    debug!(
        action,
        resource,
        statement_count = statements.len(),
        allowed,
        "access evaluated"
    );
    allowed
}

/// Flatten all applicable policy sources into one statement list.
pub fn gather_statements(request: &AccessRequest<'_>) -> Vec<Statement> {
    let mut statements = Vec::new();

    if let Some(role) = request.role {
        for policy in request.workspace_policies {
            if policy.is_active && policy.applies_to.contains(&role) {
                statements.extend(workspace_policy_to_statements(policy));
            }
        }
    }

    for policy_id in request.attached_policies {
        if let Some(managed) = catalog::managed_policy(policy_id) {
            statements.extend(managed.statements.iter().cloned());
        } else {
            debug!(policy_id, "attached policy not in catalog, skipping");
        }
    }

    for policy in request.custom_policies {
        if policy.is_active {
            statements.extend(policy.statements.iter().cloned());
        }
    }

    statements
}

/// Project a workspace policy's boolean flags into Allow statements.
///
/// Each enabled flag grants exactly one action on every resource. The
/// evaluator never sees the flag representation.
pub fn workspace_policy_to_statements(policy: &WorkspacePolicy) -> Vec<Statement> {
    let flags = [
        (policy.can_create_documents, "documents:Create"),
        (policy.can_edit_documents, "documents:Update"),
        (policy.can_delete_documents, "documents:Delete"),
        (policy.can_publish_documents, "documents:Publish"),
        (policy.can_share_documents, "documents:Share"),
        (policy.can_download_documents, "documents:Download"),
        (policy.can_invite_members, "workspace:InviteMembers"),
        (policy.can_view_members, "workspace:ViewMembers"),
    ];

    flags
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .map(|(_, action)| Statement::allow(&[action], &["*"]))
        .collect()
}
