//! Handler-level integration tests
//!
//! Drives the handlers directly with extractor values, the same shapes axum
//! would construct, against a fresh in-memory store.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use specdock_api::handlers::{authz, policies, share};
use specdock_api::AppState;
use specdock_core::{
    MemberId, MemberRepository, Role, SharePermissions, Statement, UserId, WorkspaceId,
    WorkspaceMember,
};
use specdock_share::ShareTokenService;

fn test_state() -> AppState {
    let share_tokens = ShareTokenService::new("integration-test-secret").unwrap();
    AppState::new(share_tokens, "https://docs.example.com")
}

async fn seed_member(state: &AppState, role: Role) -> WorkspaceMember {
    let now = Utc::now();
    state
        .store
        .upsert(WorkspaceMember {
            id: MemberId::new(),
            workspace_id: WorkspaceId::new(),
            user_id: UserId::new(),
            role,
            attached_policies: vec![],
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn authz_check_unknown_member_is_404() {
    let state = test_state();
    let result = authz::check_access(
        State(state),
        Json(authz::CheckAccessBody {
            member_id: MemberId::new(),
            action: "documents:Read".to_string(),
            resource: "doc-1".to_string(),
        }),
    )
    .await;

    let (status, _) = result.unwrap_err();
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_member_is_always_allowed() {
    let state = test_state();
    let member = seed_member(&state, Role::Admin).await;

    let Json(dto) = authz::check_access(
        State(state),
        Json(authz::CheckAccessBody {
            member_id: member.id,
            action: "documents:Delete".to_string(),
            resource: "api-doc-v1-prod".to_string(),
        }),
    )
    .await
    .unwrap();

    assert!(dto.allowed);
}

#[tokio::test]
async fn attached_policy_changes_the_decision() {
    let state = test_state();
    let member = seed_member(&state, Role::Viewer).await;

    // Denied before attaching anything.
    let Json(before) = authz::check_access(
        State(state.clone()),
        Json(authz::CheckAccessBody {
            member_id: member.id,
            action: "documents:Read".to_string(),
            resource: "api-doc-v1".to_string(),
        }),
    )
    .await
    .unwrap();
    assert!(!before.allowed);

    // Attach the read-only managed policy via the handler.
    policies::attach_managed_policy(
        State(state.clone()),
        Path(member.id),
        Json(policies::AttachPolicyBody {
            policy_id: "documents-read-only".to_string(),
        }),
    )
    .await
    .unwrap();

    let Json(after) = authz::check_access(
        State(state),
        Json(authz::CheckAccessBody {
            member_id: member.id,
            action: "documents:Read".to_string(),
            resource: "api-doc-v1".to_string(),
        }),
    )
    .await
    .unwrap();
    assert!(after.allowed);
}

#[tokio::test]
async fn attaching_unknown_policy_id_is_rejected() {
    let state = test_state();
    let member = seed_member(&state, Role::Member).await;

    let result = policies::attach_managed_policy(
        State(state),
        Path(member.id),
        Json(policies::AttachPolicyBody {
            policy_id: "no-such-policy".to_string(),
        }),
    )
    .await;

    let (status, _) = result.unwrap_err();
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn custom_policy_with_empty_statement_arrays_is_rejected() {
    let state = test_state();
    let member = seed_member(&state, Role::Member).await;

    let result = policies::create_custom_policy(
        State(state),
        Path(member.id),
        Json(policies::CustomPolicyBody {
            name: "broken".to_string(),
            description: None,
            statements: vec![Statement {
                effect: specdock_core::Effect::Allow,
                action: vec![],
                resource: vec!["*".to_string()],
                condition: None,
            }],
            resource_patterns: vec![],
            actions: vec![],
        }),
    )
    .await;

    let (status, _) = result.unwrap_err();
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn custom_policy_grants_and_deny_overrides() {
    let state = test_state();
    let member = seed_member(&state, Role::Member).await;

    policies::create_custom_policy(
        State(state.clone()),
        Path(member.id),
        Json(policies::CustomPolicyBody {
            name: "staging editor".to_string(),
            description: None,
            statements: vec![
                Statement::allow(&["documents:Update"], &["api-doc-v1-*"]),
                Statement::deny(&["documents:Update"], &["api-doc-v1-prod"]),
            ],
            resource_patterns: vec!["api-doc-v1-*".to_string()],
            actions: vec!["documents:Update".to_string()],
        }),
    )
    .await
    .unwrap();

    let check = |resource: &str| {
        let state = state.clone();
        let member_id = member.id;
        let resource = resource.to_string();
        async move {
            let Json(dto) = authz::check_access(
                State(state),
                Json(authz::CheckAccessBody {
                    member_id,
                    action: "documents:Update".to_string(),
                    resource,
                }),
            )
            .await
            .unwrap();
            dto.allowed
        }
    };

    assert!(check("api-doc-v1-staging").await);
    assert!(!check("api-doc-v1-prod").await);
}

#[tokio::test]
async fn share_link_round_trip_through_handlers() {
    let state = test_state();

    let (status, Json(created)) = share::create_share_link(
        State(state.clone()),
        Json(share::CreateShareBody {
            document_id: "api-doc-v1-checkout".to_string(),
            user_id: "user-1".to_string(),
            expiry_hours: 24,
            permissions: Some(SharePermissions {
                can_view: true,
                can_edit: false,
                can_download: true,
            }),
        }),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert!(created
        .url
        .starts_with("https://docs.example.com/share/"));

    let Json(payload) = share::resolve_share_token(State(state), Path(created.token))
        .await
        .unwrap();
    assert_eq!(payload.document_id, "api-doc-v1-checkout");
    assert!(payload.permissions.can_download);
}

#[tokio::test]
async fn expired_share_link_resolves_to_404() {
    let state = test_state();

    let (_, Json(created)) = share::create_share_link(
        State(state.clone()),
        Json(share::CreateShareBody {
            document_id: "doc-1".to_string(),
            user_id: "user-1".to_string(),
            expiry_hours: -1,
            permissions: None,
        }),
    )
    .await
    .unwrap();

    let result = share::resolve_share_token(State(state), Path(created.token)).await;
    let (status, _) = result.unwrap_err();
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn garbage_share_token_resolves_to_404() {
    let state = test_state();
    let result =
        share::resolve_share_token(State(state), Path("not-a-token".to_string())).await;
    let (status, _) = result.unwrap_err();
    assert_eq!(status, StatusCode::NOT_FOUND);
}
