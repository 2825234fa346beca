use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use blog_auth::RequestContext;
use blog_auth::UNAUTHORIZED_MESSAGE;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

/// Profile of the user the request was authenticated as.
pub async fn me(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let identity = context
        .identity()
        .ok_or_else(|| ApiError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()))?;

    let user_id = UserId::from_string(&identity.user_id)
        .map_err(|_| ApiError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()))?;

    state
        .user_service
        .get_user(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
