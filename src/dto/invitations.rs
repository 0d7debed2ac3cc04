use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Invitation;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInvitationRequest {
    pub email: String,
    /// "vendor" or "supplier".
    pub role: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AcceptInvitationRequest {
    pub token: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct InvitationList {
    #[schema(value_type = Vec<Invitation>)]
    pub items: Vec<Invitation>,
}
