//! Static policy catalog
//!
//! The single source of truth for the action vocabulary and the predefined
//! managed policies. Both tables are built once at first use and never
//! mutated, so concurrent reads need no synchronization.
//!
//! The action list exists for UI and documentation; the evaluator never
//! validates against it — unknown actions are legal, forward-compatible
//! strings.

use once_cell::sync::Lazy;
use serde::Serialize;
use specdock_core::{ManagedPolicy, Statement};

/// An action name with its human-readable description
#[derive(Debug, Clone, Serialize)]
pub struct ActionDefinition {
    pub name: &'static str,
    pub description: &'static str,
}

static ACTIONS: Lazy<Vec<ActionDefinition>> = Lazy::new(build_actions);
static MANAGED_POLICIES: Lazy<Vec<ManagedPolicy>> = Lazy::new(build_managed_policies);

/// Stable enumeration of every known action
pub fn actions() -> &'static [ActionDefinition] {
    &ACTIONS
}

/// All predefined managed policies
pub fn managed_policies() -> &'static [ManagedPolicy] {
    &MANAGED_POLICIES
}

/// Look up a managed policy by id
pub fn managed_policy(id: &str) -> Option<&'static ManagedPolicy> {
    MANAGED_POLICIES.iter().find(|p| p.id == id)
}

fn build_actions() -> Vec<ActionDefinition> {
    vec![
        // Document actions
        ActionDefinition {
            name: "documents:Create",
            description: "Create a new API documentation page",
        },
        ActionDefinition {
            name: "documents:Read",
            description: "View a documentation page and its spec",
        },
        ActionDefinition {
            name: "documents:Update",
            description: "Edit the content or spec of a documentation page",
        },
        ActionDefinition {
            name: "documents:Delete",
            description: "Permanently delete a documentation page",
        },
        ActionDefinition {
            name: "documents:Publish",
            description: "Publish a documentation page to its public URL",
        },
        ActionDefinition {
            name: "documents:Share",
            description: "Create share links for a documentation page",
        },
        ActionDefinition {
            name: "documents:Download",
            description: "Download the raw OpenAPI spec of a page",
        },
        // Workspace actions
        ActionDefinition {
            name: "workspace:InviteMembers",
            description: "Invite new members to the workspace",
        },
        ActionDefinition {
            name: "workspace:RemoveMembers",
            description: "Remove members from the workspace",
        },
        ActionDefinition {
            name: "workspace:ViewMembers",
            description: "List workspace members and their roles",
        },
        ActionDefinition {
            name: "workspace:ManageSettings",
            description: "Change workspace name, slug and settings",
        },
        // Policy administration actions
        ActionDefinition {
            name: "policies:Create",
            description: "Create workspace or member custom policies",
        },
        ActionDefinition {
            name: "policies:Attach",
            description: "Attach a managed policy to a member",
        },
        ActionDefinition {
            name: "policies:Detach",
            description: "Detach a managed policy from a member",
        },
        ActionDefinition {
            name: "policies:Delete",
            description: "Delete workspace or member custom policies",
        },
        ActionDefinition {
            name: "policies:View",
            description: "View policies and their statements",
        },
    ]
}

fn build_managed_policies() -> Vec<ManagedPolicy> {
    vec![
        ManagedPolicy {
            id: "documents-full-access".to_string(),
            name: "Documents Full Access".to_string(),
            description: "Every document action on every document in the workspace"
                .to_string(),
            statements: vec![Statement::allow(&["documents:*"], &["*"])],
        },
        ManagedPolicy {
            id: "documents-read-only".to_string(),
            name: "Documents Read Only".to_string(),
            description: "View and download documents; no edits, no publishing"
                .to_string(),
            statements: vec![Statement::allow(
                &["documents:Read", "documents:Download"],
                &["*"],
            )],
        },
        ManagedPolicy {
            id: "documents-contributor".to_string(),
            name: "Documents Contributor".to_string(),
            description: "Create and edit documents, but never delete or publish"
                .to_string(),
            statements: vec![
                Statement::allow(
                    &["documents:Create", "documents:Read", "documents:Update"],
                    &["*"],
                ),
                Statement::deny(&["documents:Delete", "documents:Publish"], &["*"]),
            ],
        },
        ManagedPolicy {
            id: "member-management".to_string(),
            name: "Member Management".to_string(),
            description: "Invite, remove and list workspace members".to_string(),
            statements: vec![Statement::allow(&["workspace:*"], &["*"])],
        },
        ManagedPolicy {
            id: "policy-administrator".to_string(),
            name: "Policy Administrator".to_string(),
            description: "Create, attach, detach and delete policies".to_string(),
            statements: vec![Statement::allow(&["policies:*"], &["*"])],
        },
        ManagedPolicy {
            id: "deny-document-deletion".to_string(),
            name: "Deny Document Deletion".to_string(),
            description: "Guard rail: blocks document deletion even when another \
                          policy allows it"
                .to_string(),
            statements: vec![Statement::deny(&["documents:Delete"], &["*"])],
        },
    ]
}
