use axum::{extract::Request, middleware::Next, response::Response};

use crate::database::accounts::AccountStore;
use crate::database::models::Account;
use crate::database::DatabaseManager;
use crate::error::ApiError;

use super::auth::TokenIdentity;

/// The account resolved for this request. Request-scoped and re-derived on
/// every request, so a deactivation or credential rotation takes effect on
/// the very next call.
#[derive(Clone, Debug)]
pub struct CurrentAccount(pub Account);

/// Second stage of the access guard: resolves the verified token identity
/// against the accounts table. Rejects tokens for unknown accounts,
/// deactivated accounts, and tokens issued before the last credential
/// rotation.
pub async fn resolve_account(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let identity = request
        .extensions()
        .get::<TokenIdentity>()
        .cloned()
        .ok_or_else(|| {
            ApiError::unauthorized("Authentication required before account resolution")
        })?;

    let pool = DatabaseManager::pool().await?;
    let store = AccountStore::new(pool);

    let account = store.find_by_id(identity.account_id).await?.ok_or_else(|| {
        tracing::warn!(
            "Account {} from a valid token no longer exists",
            identity.account_id
        );
        ApiError::unauthorized("The account belonging to this token no longer exists.")
    })?;

    if !account.active {
        tracing::warn!("Rejected token for deactivated account {}", account.id);
        return Err(ApiError::unauthorized("This account has been deactivated."));
    }

    if let Some(changed_at) = account.password_changed_at {
        if changed_at > identity.issued_at {
            tracing::warn!("Rejected stale token for account {}", account.id);
            return Err(ApiError::unauthorized(
                "Password was changed after this token was issued. Please log in again.",
            ));
        }
    }

    request.extensions_mut().insert(CurrentAccount(account));

    Ok(next.run(request).await)
}
