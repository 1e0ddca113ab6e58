use axum::extract::Extension;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::AppJson;
use crate::database::accounts::{AccountStore, ProfileChanges};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentAccount};

/// Self-service profile update. Only name and email are representable;
/// anything else a client submits is dropped during deserialization. The
/// password fields exist solely so their presence can be rejected with a
/// pointer to the dedicated password route.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<Value>,
    pub password_confirm: Option<Value>,
}

impl UpdateProfileRequest {
    fn into_changes(self) -> Result<ProfileChanges, ApiError> {
        if self.password.is_some() || self.password_confirm.is_some() {
            return Err(ApiError::bad_request(
                "This route is not for password updates. Please use the password change route.",
            ));
        }

        let changes = ProfileChanges {
            name: normalize_name(self.name)?,
            email: normalize_email(self.email)?,
        };

        if changes.is_empty() {
            return Err(ApiError::bad_request("No valid fields to update"));
        }

        Ok(changes)
    }
}

pub(crate) fn normalize_name(name: Option<String>) -> Result<Option<String>, ApiError> {
    match name {
        Some(n) => {
            let n = n.trim().to_string();
            if n.is_empty() {
                return Err(ApiError::bad_request("Name cannot be empty"));
            }
            Ok(Some(n))
        }
        None => Ok(None),
    }
}

pub(crate) fn normalize_email(email: Option<String>) -> Result<Option<String>, ApiError> {
    match email {
        Some(e) => {
            let e = e.trim().to_lowercase();
            if !e.contains('@') || e.starts_with('@') || e.ends_with('@') {
                return Err(ApiError::bad_request("Please provide a valid email address"));
            }
            Ok(Some(e))
        }
        None => Ok(None),
    }
}

/// GET /api/v1/users/me - current account profile
pub async fn get_me(Extension(current): Extension<CurrentAccount>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({ "user": current.0 })))
}

/// PATCH /api/v1/users/me - update own name or email
pub async fn update_me(
    Extension(current): Extension<CurrentAccount>,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> ApiResult<Value> {
    let changes = payload.into_changes()?;

    let store = AccountStore::new(DatabaseManager::pool().await?);
    let account = store
        .update_profile(current.0.id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(json!({ "user": account })))
}

/// DELETE /api/v1/users/me - deactivate own account (soft delete)
pub async fn delete_me(Extension(current): Extension<CurrentAccount>) -> ApiResult<()> {
    let store = AccountStore::new(DatabaseManager::pool().await?);
    store.deactivate(current.0.id).await?;

    Ok(ApiResponse::<()>::no_content())
}
