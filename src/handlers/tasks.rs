use axum::extract::{Extension, Path, Query};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::pagination::{PageInfo, PageQuery};
use crate::api::AppJson;
use crate::database::models::task::{MAX_DESCRIPTION_LEN, MAX_TITLE_LEN};
use crate::database::models::Priority;
use crate::database::tasks::{NewTask, TaskChanges, TaskStore};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentAccount};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    fn into_new_task(self) -> Result<NewTask, ApiError> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::bad_request("Task title is required"))?;

        validate_title(&title)?;
        let description = normalize_description(self.description)?;

        Ok(NewTask {
            title,
            description,
            priority: self.priority.unwrap_or_default(),
            due_date: self.due_date,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
}

impl UpdateTaskRequest {
    fn into_changes(self) -> Result<TaskChanges, ApiError> {
        let title = match self.title {
            Some(t) => {
                let t = t.trim().to_string();
                if t.is_empty() {
                    return Err(ApiError::bad_request("Task title cannot be empty"));
                }
                validate_title(&t)?;
                Some(t)
            }
            None => None,
        };

        let changes = TaskChanges {
            title,
            description: normalize_description(self.description)?,
            completed: self.completed,
            priority: self.priority,
            due_date: self.due_date,
        };

        if changes.is_empty() {
            return Err(ApiError::bad_request("Update body cannot be empty"));
        }

        Ok(changes)
    }
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ApiError::bad_request(format!(
            "Task title must be less than {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(())
}

fn normalize_description(description: Option<String>) -> Result<Option<String>, ApiError> {
    let description = description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    if let Some(d) = &description {
        if d.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ApiError::bad_request(format!(
                "Task description must be less than {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }
    }

    Ok(description)
}

fn parse_task_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("Invalid task ID"))
}

/// POST /api/v1/tasks - create a task owned by the caller
pub async fn create_task(
    Extension(current): Extension<CurrentAccount>,
    AppJson(payload): AppJson<CreateTaskRequest>,
) -> ApiResult<Value> {
    let new_task = payload.into_new_task()?;

    let store = TaskStore::new(DatabaseManager::pool().await?);
    let task = store.insert(current.0.id, new_task).await?;

    Ok(ApiResponse::created(json!({ "task": task })))
}

/// GET /api/v1/tasks - list the caller's tasks, newest first
pub async fn list_tasks(
    Extension(current): Extension<CurrentAccount>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Value> {
    let page = query.resolve()?;

    let store = TaskStore::new(DatabaseManager::pool().await?);
    let (tasks, total) = store.list_for_owner(current.0.id, page).await?;

    let results = tasks.len();
    Ok(ApiResponse::paginated(
        json!({ "tasks": tasks }),
        results,
        PageInfo::new(total, page),
    ))
}

/// GET /api/v1/tasks/:id - fetch one of the caller's tasks
pub async fn get_task(
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_task_id(&id)?;

    let store = TaskStore::new(DatabaseManager::pool().await?);
    let task = store
        .find_for_owner(id, current.0.id)
        .await?
        .ok_or_else(|| ApiError::not_found("No task found with that ID"))?;

    Ok(ApiResponse::success(json!({ "task": task })))
}

/// PATCH /api/v1/tasks/:id - update one of the caller's tasks
pub async fn update_task(
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateTaskRequest>,
) -> ApiResult<Value> {
    let id = parse_task_id(&id)?;
    let changes = payload.into_changes()?;

    let store = TaskStore::new(DatabaseManager::pool().await?);
    let task = store
        .update_for_owner(id, current.0.id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("No task found with that ID"))?;

    Ok(ApiResponse::success(json!({ "task": task })))
}

/// DELETE /api/v1/tasks/:id - delete one of the caller's tasks
pub async fn delete_task(
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_task_id(&id)?;

    let store = TaskStore::new(DatabaseManager::pool().await?);
    let deleted = store.delete_for_owner(id, current.0.id).await?;

    if !deleted {
        return Err(ApiError::not_found("No task found with that ID"));
    }

    Ok(ApiResponse::<()>::no_content())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_title() {
        let payload: CreateTaskRequest = serde_json::from_value(json!({})).unwrap();
        let err = payload.into_new_task().unwrap_err();
        assert_eq!(err.message(), "Task title is required");

        let payload: CreateTaskRequest =
            serde_json::from_value(json!({ "title": "   " })).unwrap();
        assert!(payload.into_new_task().is_err());
    }

    #[test]
    fn create_defaults_priority_to_medium() {
        let payload: CreateTaskRequest =
            serde_json::from_value(json!({ "title": "Buy milk" })).unwrap();
        let task = payload.into_new_task().unwrap();
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.description.is_none());
    }

    #[test]
    fn create_enforces_length_limits() {
        let payload: CreateTaskRequest =
            serde_json::from_value(json!({ "title": "t".repeat(101) })).unwrap();
        assert!(payload.into_new_task().is_err());

        let payload: CreateTaskRequest = serde_json::from_value(json!({
            "title": "ok",
            "description": "d".repeat(501),
        }))
        .unwrap();
        assert!(payload.into_new_task().is_err());
    }

    #[test]
    fn create_ignores_owner_field_in_payload() {
        // An owner smuggled into the body is not representable in the
        // request type and deserialization drops it
        let payload: CreateTaskRequest = serde_json::from_value(json!({
            "title": "Buy milk",
            "ownerId": "4b824f0a-0f0e-4e18-9866-d6a4a0cf3e9e",
        }))
        .unwrap();
        assert!(payload.into_new_task().is_ok());
    }

    #[test]
    fn update_rejects_empty_body() {
        let payload = UpdateTaskRequest::default();
        let err = payload.into_changes().unwrap_err();
        assert_eq!(err.message(), "Update body cannot be empty");
    }

    #[test]
    fn update_rejects_blank_title() {
        let payload: UpdateTaskRequest =
            serde_json::from_value(json!({ "title": "  " })).unwrap();
        assert!(payload.into_changes().is_err());
    }

    #[test]
    fn update_accepts_partial_changes() {
        let payload: UpdateTaskRequest =
            serde_json::from_value(json!({ "completed": true })).unwrap();
        let changes = payload.into_changes().unwrap();
        assert_eq!(changes.completed, Some(true));
        assert!(changes.title.is_none());
    }

    #[test]
    fn parses_task_ids() {
        assert!(parse_task_id("4b824f0a-0f0e-4e18-9866-d6a4a0cf3e9e").is_ok());
        let err = parse_task_id("42").unwrap_err();
        assert_eq!(err.message(), "Invalid task ID");
        assert_eq!(err.status_code(), 400);
    }
}
