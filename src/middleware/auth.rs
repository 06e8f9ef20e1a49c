use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::entities::user::AppRole;
use crate::error::{AppError, AppResult};
use crate::utils::jwt::{verify_token, Claims};
use crate::AppState;

/// Caller identity on routes where signing in is optional.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<Claims>);

impl CurrentUser {
    pub fn user_id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|c| c.sub)
    }
}

/// Extract and validate JWT token from Authorization header
pub async fn auth_middleware(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let TypedHeader(auth) =
        auth.ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;
    let claims = verify_token(auth.token(), &state.config.jwt_secret)?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Like `auth_middleware`, but anonymous callers pass through.
/// A token that is present but invalid is still rejected.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let claims = match auth {
        Some(TypedHeader(auth)) => Some(verify_token(auth.token(), &state.config.jwt_secret)?),
        None => None,
    };
    request.extensions_mut().insert(CurrentUser(claims));
    Ok(next.run(request).await)
}

/// Require admin role
pub async fn require_admin(
    request: Request,
    next: Next,
) -> AppResult<Response> {
    let claims = request
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| AppError::Unauthorized("No authentication found".to_string()))?;

    if claims.role != AppRole::Admin {
        tracing::warn!(user_id = %claims.sub, role = ?claims.role, "Admin route refused");
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(request).await)
}
