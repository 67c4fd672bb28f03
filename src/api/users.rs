use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::AppState;
use crate::db::repo::is_unique_violation;
use crate::domain::{NewUser, User};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let new_user = NewUser::new(&body.username, &body.email)?;

    let user = state.repo.insert_user(&new_user).await.map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!("username {} is taken", new_user.username))
        } else {
            e.into()
        }
    })?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}
