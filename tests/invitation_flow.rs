mod common;

use marketplace_api::{
    dto::invitations::{AcceptInvitationRequest, CreateInvitationRequest},
    error::AppError,
    middleware::auth::AuthUser,
    services::invitation_service,
};

// Integration flow: admin invites a vendor, the token is redeemed exactly
// once, expired tokens are refused.
#[tokio::test]
async fn invitation_tokens_are_single_use_and_time_limited() -> anyhow::Result<()> {
    let state = match common::setup_state().await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let admin_id = common::create_user(&state, "admin", "admin@example.com").await?;
    let admin = AuthUser {
        user_id: admin_id,
        role: "admin".into(),
    };

    // Customers cannot be invited, only vendor/supplier roles.
    let bad_role = invitation_service::create_invitation(
        &state,
        &admin,
        CreateInvitationRequest {
            email: "someone@example.com".into(),
            role: "customer".into(),
        },
    )
    .await;
    assert!(matches!(bad_role, Err(AppError::BadRequest(_))));

    let invitation = invitation_service::create_invitation(
        &state,
        &admin,
        CreateInvitationRequest {
            email: "new-vendor@example.com".into(),
            role: "vendor".into(),
        },
    )
    .await?
    .data
    .unwrap();

    let user = invitation_service::accept_invitation(
        &state,
        AcceptInvitationRequest {
            token: invitation.token.clone(),
            name: "New Vendor".into(),
            password: "vendor-pass".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(user.role, "vendor");
    assert_eq!(user.email, "new-vendor@example.com");

    // Second redemption of the same token fails.
    let reused = invitation_service::accept_invitation(
        &state,
        AcceptInvitationRequest {
            token: invitation.token,
            name: "Imposter".into(),
            password: "imposter-pass".into(),
        },
    )
    .await;
    assert!(matches!(reused, Err(AppError::BadRequest(_))));

    // Inviting an email that already has an account fails.
    let taken = invitation_service::create_invitation(
        &state,
        &admin,
        CreateInvitationRequest {
            email: "new-vendor@example.com".into(),
            role: "supplier".into(),
        },
    )
    .await;
    assert!(matches!(taken, Err(AppError::BadRequest(_))));

    // A TTL in the past produces an invitation nobody can redeem.
    let mut expired_state = state.clone();
    expired_state.config.invitation_ttl_hours = -1;
    let expired = invitation_service::create_invitation(
        &expired_state,
        &admin,
        CreateInvitationRequest {
            email: "late@example.com".into(),
            role: "supplier".into(),
        },
    )
    .await?
    .data
    .unwrap();

    let refused = invitation_service::accept_invitation(
        &state,
        AcceptInvitationRequest {
            token: expired.token,
            name: "Late".into(),
            password: "late-pass".into(),
        },
    )
    .await;
    assert!(matches!(refused, Err(AppError::BadRequest(_))));

    // Unknown tokens are a 404.
    let unknown = invitation_service::accept_invitation(
        &state,
        AcceptInvitationRequest {
            token: "no-such-token".into(),
            name: "Nobody".into(),
            password: "nobody-pass".into(),
        },
    )
    .await;
    assert!(matches!(unknown, Err(AppError::NotFound)));

    Ok(())
}
