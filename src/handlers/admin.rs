use axum::extract::{Extension, Path, Query};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::pagination::{PageInfo, PageQuery};
use crate::api::AppJson;
use crate::database::accounts::{AccountChanges, AccountStore};
use crate::database::models::Role;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentAccount};

use super::account::{normalize_email, normalize_name};

/// Administrative account update. Unlike self-service, role and active are
/// representable here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateAccountRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

impl AdminUpdateAccountRequest {
    fn into_changes(self) -> Result<AccountChanges, ApiError> {
        let changes = AccountChanges {
            name: normalize_name(self.name)?,
            email: normalize_email(self.email)?,
            role: self.role,
            active: self.active,
        };

        if changes.is_empty() {
            return Err(ApiError::bad_request("No valid fields to update"));
        }

        Ok(changes)
    }
}

fn parse_account_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("Invalid user ID"))
}

/// GET /api/v1/admin/users - paginated account list, newest first
pub async fn list_users(Query(query): Query<PageQuery>) -> ApiResult<Value> {
    let page = query.resolve()?;

    let store = AccountStore::new(DatabaseManager::pool().await?);
    let (users, total) = store.list(page).await?;

    if page.offset() >= total && total != 0 {
        return Err(ApiError::not_found("This page does not exist"));
    }

    let results = users.len();
    Ok(ApiResponse::paginated(
        json!({ "users": users }),
        results,
        PageInfo::new(total, page),
    ))
}

/// PATCH /api/v1/admin/users/:id - update any account
pub async fn update_user(
    Path(id): Path<String>,
    AppJson(payload): AppJson<AdminUpdateAccountRequest>,
) -> ApiResult<Value> {
    let id = parse_account_id(&id)?;
    let changes = payload.into_changes()?;

    let store = AccountStore::new(DatabaseManager::pool().await?);
    let account = store
        .update_account(id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("No user found with that ID"))?;

    Ok(ApiResponse::success(json!({ "user": account })))
}

/// DELETE /api/v1/admin/users/:id - deactivate any account (soft delete).
/// The comparison against the caller's own id runs before any write.
pub async fn delete_user(
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_account_id(&id)?;

    if id == current.0.id {
        return Err(ApiError::bad_request(
            "You cannot deactivate your own admin account",
        ));
    }

    let store = AccountStore::new(DatabaseManager::pool().await?);
    store
        .deactivate(id)
        .await?
        .ok_or_else(|| ApiError::not_found("No user found with that ID"))?;

    Ok(ApiResponse::<()>::no_content())
}
