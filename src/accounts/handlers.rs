use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};

use crate::accounts::dto::{
    CreateAccountRequest, CreatedResponse, DataResponse, LoginRequest, LoginResponse,
    MessageResponse, UpdateAccountRequest,
};
use crate::accounts::services;
use crate::error::ApiError;
use crate::state::AppState;

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/data", get(list_accounts))
        .route("/users", post(create_account))
        .route(
            "/users/:id",
            put(update_account).delete(delete_account),
        )
}

pub fn login_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

#[instrument(skip(state))]
pub async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<DataResponse>, ApiError> {
    let data = services::list(state.store.as_ref()).await?;
    Ok(Json(DataResponse { data }))
}

#[instrument(skip(state, payload))]
pub async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let id = services::create(state.store.as_ref(), payload).await?;
    info!(id, "account created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "account created",
            id,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    services::delete(state.store.as_ref(), id).await?;
    info!(id, "account deleted");
    Ok(Json(MessageResponse {
        message: "account deleted",
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    services::update(state.store.as_ref(), id, payload).await?;
    info!(id, "account updated");
    Ok(Json(MessageResponse {
        message: "account updated",
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = services::authenticate(state.store.as_ref(), payload).await?;
    info!(display_name = %user.display_name, "login successful");
    Ok(Json(LoginResponse {
        message: "login successful",
        user,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_handler_returns_201_with_the_new_id() {
        let state = AppState::fake();
        let payload = CreateAccountRequest {
            display_name: Some("Bob".into()),
            login_id: Some("bob1".into()),
            password: Some("pw".into()),
            balance: Some(10.0),
        };

        let (status, Json(body)) = create_account(State(state.clone()), Json(payload))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.id, 1);

        let Json(login_body) = login(
            State(state),
            Json(LoginRequest {
                login_id: Some("bob1".into()),
                password: Some("pw".into()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(login_body.user.display_name, "Bob");
        assert!(!login_body.user.is_admin);
    }

    #[tokio::test]
    async fn data_handler_wraps_rows_in_a_data_field() {
        let state = AppState::fake();
        let Json(body) = list_accounts(State(state)).await.unwrap();
        let json = serde_json::to_value(&body).unwrap();
        assert!(json["data"].as_array().unwrap().is_empty());
    }
}
