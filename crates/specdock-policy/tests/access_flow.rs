//! End-to-end access resolution scenarios
//!
//! Exercises the full path a route handler drives: workspace policies
//! filtered by role, attached managed policies resolved against the catalog,
//! member custom policies, all aggregated and evaluated with deny-override.

use chrono::Utc;
use specdock_core::{
    CustomPolicyId, MemberCustomPolicy, MemberId, Role, Statement, WorkspaceId,
    WorkspacePolicy, WorkspacePolicyId,
};
use specdock_policy::{check_access, gather_statements, AccessRequest};

// =============================================================================
// Fixtures
// =============================================================================

fn editor_workspace_policy(workspace_id: WorkspaceId) -> WorkspacePolicy {
    let now = Utc::now();
    WorkspacePolicy {
        id: WorkspacePolicyId::new(),
        workspace_id,
        name: "Editors can author".to_string(),
        applies_to: vec![Role::Editor, Role::Member],
        is_active: true,
        can_create_documents: true,
        can_edit_documents: true,
        can_delete_documents: false,
        can_publish_documents: false,
        can_share_documents: true,
        can_download_documents: true,
        can_invite_members: false,
        can_view_members: true,
        created_at: now,
        updated_at: now,
    }
}

fn custom(member_id: MemberId, statements: Vec<Statement>) -> MemberCustomPolicy {
    let now = Utc::now();
    MemberCustomPolicy {
        id: CustomPolicyId::new(),
        member_id,
        name: "scenario policy".to_string(),
        description: None,
        statements,
        resource_patterns: vec![],
        actions: vec![],
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn editor_authors_through_workspace_policy_but_cannot_delete() {
    let workspace_id = WorkspaceId::new();
    let policies = [editor_workspace_policy(workspace_id)];

    let request = AccessRequest {
        role: Some(Role::Editor),
        workspace_policies: &policies,
        ..Default::default()
    };

    assert!(check_access(&request, "documents:Create", "api-doc-v1"));
    assert!(check_access(&request, "documents:Update", "api-doc-v1"));
    assert!(check_access(&request, "workspace:ViewMembers", "members"));
    // No flag grants deletion or publishing.
    assert!(!check_access(&request, "documents:Delete", "api-doc-v1"));
    assert!(!check_access(&request, "documents:Publish", "api-doc-v1"));
    // Nor anything outside the projected vocabulary.
    assert!(!check_access(&request, "workspace:InviteMembers", "members"));
}

#[test]
fn viewer_gains_read_via_attached_managed_policy() {
    let attached = ["documents-read-only".to_string()];
    let request = AccessRequest {
        role: Some(Role::Viewer),
        attached_policies: &attached,
        ..Default::default()
    };

    assert!(check_access(&request, "documents:Read", "api-doc-v1"));
    assert!(check_access(&request, "documents:Download", "api-doc-v1"));
    assert!(!check_access(&request, "documents:Update", "api-doc-v1"));
}

#[test]
fn custom_policy_scopes_access_to_resource_pattern() {
    let member_id = MemberId::new();
    let custom_policies = [custom(
        member_id,
        vec![Statement::allow(
            &["documents:Read", "documents:Update"],
            &["api-doc-v1-*"],
        )],
    )];

    let request = AccessRequest {
        role: Some(Role::Member),
        custom_policies: &custom_policies,
        ..Default::default()
    };

    assert!(check_access(&request, "documents:Update", "api-doc-v1-checkout"));
    assert!(!check_access(&request, "documents:Update", "api-doc-v2-checkout"));
}

#[test]
fn deny_in_one_source_overrides_allow_in_another() {
    // Workspace policy allows editing; the guard-rail managed policy denies
    // deletion; a custom policy allows everything on one document. The deny
    // must still dominate for deletion while edits survive.
    let workspace_id = WorkspaceId::new();
    let member_id = MemberId::new();

    let policies = [editor_workspace_policy(workspace_id)];
    let attached = ["deny-document-deletion".to_string()];
    let custom_policies = [custom(
        member_id,
        vec![Statement::allow(&["documents:*"], &["api-doc-v1-prod"])],
    )];

    let request = AccessRequest {
        role: Some(Role::Editor),
        workspace_policies: &policies,
        attached_policies: &attached,
        custom_policies: &custom_policies,
    };

    assert!(!check_access(&request, "documents:Delete", "api-doc-v1-prod"));
    assert!(check_access(&request, "documents:Update", "api-doc-v1-prod"));
    assert!(check_access(&request, "documents:Publish", "api-doc-v1-prod"));
}

#[test]
fn staging_allowed_prod_denied_scenario() {
    let member_id = MemberId::new();
    let custom_policies = [custom(
        member_id,
        vec![
            Statement::allow(
                &["documents:Read", "documents:Update"],
                &["api-doc-v1-*"],
            ),
            Statement::deny(&["documents:Update"], &["api-doc-v1-prod"]),
        ],
    )];

    let request = AccessRequest {
        role: Some(Role::Member),
        custom_policies: &custom_policies,
        ..Default::default()
    };

    assert!(!check_access(&request, "documents:Update", "api-doc-v1-prod"));
    assert!(check_access(&request, "documents:Update", "api-doc-v1-staging"));
    assert!(check_access(&request, "documents:Read", "api-doc-v1-prod"));
}

#[test]
fn gathered_statements_reflect_all_active_sources() {
    let workspace_id = WorkspaceId::new();
    let member_id = MemberId::new();

    let policies = [editor_workspace_policy(workspace_id)];
    let attached = [
        "documents-read-only".to_string(),
        "ghost-policy".to_string(), // unknown, contributes nothing
    ];
    let mut inactive = custom(member_id, vec![Statement::allow(&["*"], &["*"])]);
    inactive.is_active = false;
    let custom_policies = [inactive];

    let request = AccessRequest {
        role: Some(Role::Editor),
        workspace_policies: &policies,
        attached_policies: &attached,
        custom_policies: &custom_policies,
    };

    let statements = gather_statements(&request);
    // 5 enabled flags project to 5 statements, plus 1 from the managed
    // policy; the unknown id and the inactive custom policy add nothing.
    assert_eq!(statements.len(), 6);
}

#[test]
fn owner_bypass_is_total() {
    let workspace_id = WorkspaceId::new();
    let member_id = MemberId::new();

    // Even a blanket deny cannot constrain the owner.
    let policies = [editor_workspace_policy(workspace_id)];
    let custom_policies = [custom(
        member_id,
        vec![Statement::deny(&["*"], &["*"])],
    )];

    let request = AccessRequest {
        role: Some(Role::Owner),
        workspace_policies: &policies,
        custom_policies: &custom_policies,
        ..Default::default()
    };

    assert!(check_access(&request, "documents:Delete", "anything"));
    assert!(check_access(&request, "workspace:RemoveMembers", "anything"));
}
