use axum::{extract::Request, middleware::Next, response::Response};

use crate::database::models::Role;
use crate::error::ApiError;

use super::resolve_account::CurrentAccount;

/// Role gate composed after the access guard. Fails closed: without a
/// resolved account there is no identity to check, so the request is
/// rejected as unauthenticated rather than forbidden.
pub async fn require_role(
    allowed: &'static [Role],
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let account = request
        .extensions()
        .get::<CurrentAccount>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required before role checks"))?;

    if !allowed.contains(&account.0.role) {
        tracing::warn!(
            "Account {} with role {:?} denied access to a restricted route",
            account.0.id,
            account.0.role
        );
        return Err(ApiError::forbidden(
            "You do not have permission to perform this action",
        ));
    }

    Ok(next.run(request).await)
}

/// Admin-only gate used by the account-management routes
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(&[Role::Admin], request, next).await
}
