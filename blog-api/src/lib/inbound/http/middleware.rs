use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use blog_auth::RequestContext;
use blog_auth::UNAUTHORIZED_MESSAGE;

use super::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Middleware that runs the authentication gate and stores the resulting
/// [`RequestContext`] in request extensions.
///
/// Every rejection is the same 401; the gate logs the cause.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // A header that is not visible ASCII counts as absent.
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let identity = state
        .auth_gate
        .authorize(authorization.as_deref())
        .await
        .map_err(|_| ApiError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()))?;

    req.extensions_mut()
        .insert(RequestContext::authenticated(identity));

    Ok(next.run(req).await)
}
