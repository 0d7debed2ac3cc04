use chrono::{Duration, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::invitations::{AcceptInvitationRequest, CreateInvitationRequest, InvitationList},
    entity::{
        invitations::{
            ActiveModel as InvitationActive, Column as InvitationCol, Entity as Invitations,
        },
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Invitation, User, role},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::auth_service::hash_password,
    state::AppState,
};

/// Create a vendor/supplier invitation and mail the accept link. A failed
/// send is logged but does not void the invitation; the token can be
/// re-delivered out of band.
pub async fn create_invitation(
    state: &AppState,
    user: &AuthUser,
    payload: CreateInvitationRequest,
) -> AppResult<ApiResponse<Invitation>> {
    ensure_admin(user)?;

    if payload.role != role::VENDOR && payload.role != role::SUPPLIER {
        return Err(AppError::BadRequest(
            "invitations are for vendor or supplier accounts".to_string(),
        ));
    }

    let taken = Users::find()
        .filter(UserCol::Email.eq(payload.email.clone()))
        .one(&state.orm)
        .await?;
    if taken.is_some() {
        return Err(AppError::BadRequest("Email is already registered".into()));
    }

    let token = Uuid::new_v4().simple().to_string();
    let expires_at = Utc::now() + Duration::hours(state.config.invitation_ttl_hours);

    let invitation = InvitationActive {
        id: Set(Uuid::new_v4()),
        email: Set(payload.email.clone()),
        role: Set(payload.role.clone()),
        token: Set(token.clone()),
        invited_by: Set(user.user_id),
        expires_at: Set(expires_at.into()),
        accepted_at: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let accept_link = format!(
        "{}/api/invitations/accept?token={}",
        state.config.base_url, token
    );
    let body = format!(
        "You have been invited to join the marketplace as a {}.\n\n\
         Accept the invitation here: {}\n\n\
         The link expires at {}.",
        invitation.role,
        accept_link,
        expires_at.format("%Y-%m-%d %H:%M UTC"),
    );
    if let Err(err) = state
        .mailer
        .send(&invitation.email, "Marketplace invitation", body)
        .await
    {
        tracing::warn!(error = %err, email = %invitation.email, "invitation mail failed");
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "invitation_create",
        Some("invitations"),
        Some(serde_json::json!({ "invitation_id": invitation.id, "role": invitation.role })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Invitation created",
        Invitation::from(invitation),
        Some(Meta::empty()),
    ))
}

pub async fn list_invitations(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<InvitationList>> {
    ensure_admin(user)?;

    let (page, limit, offset) = pagination.normalize();

    let finder = Invitations::find().order_by_desc(InvitationCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Invitation::from)
        .collect();

    Ok(ApiResponse::paginated(
        "OK",
        InvitationList { items },
        page,
        limit,
        total,
    ))
}

/// Redeem a token: the invitation must exist, be unused and unexpired. The
/// row is locked so a token races to exactly one account.
pub async fn accept_invitation(
    state: &AppState,
    payload: AcceptInvitationRequest,
) -> AppResult<ApiResponse<User>> {
    let txn = state.orm.begin().await?;

    let invitation = Invitations::find()
        .filter(InvitationCol::Token.eq(payload.token.clone()))
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let invitation = match invitation {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };

    if invitation.accepted_at.is_some() {
        return Err(AppError::BadRequest("Invitation already used".into()));
    }
    if invitation.expires_at.with_timezone(&Utc) < Utc::now() {
        return Err(AppError::BadRequest("Invitation expired".into()));
    }

    let taken = Users::find()
        .filter(UserCol::Email.eq(invitation.email.clone()))
        .one(&txn)
        .await?;
    if taken.is_some() {
        return Err(AppError::Conflict("Email is already registered".into()));
    }

    let password_hash = hash_password(&payload.password)?;

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(invitation.email.clone()),
        password_hash: Set(password_hash),
        name: Set(payload.name.clone()),
        role: Set(invitation.role.clone()),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let invitation_id = invitation.id;
    let mut active: InvitationActive = invitation.into();
    active.accepted_at = Set(Some(Utc::now().into()));
    active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.id),
        "invitation_accept",
        Some("invitations"),
        Some(serde_json::json!({ "invitation_id": invitation_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Account created",
        User::from(user),
        Some(Meta::empty()),
    ))
}
