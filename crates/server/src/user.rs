//! User API endpoints

use api_types::user::{UserCreated, UserQuery, UserUpsert, UserView};
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};

use engine::LedgerStore;

use crate::{ServerError, server::ServerState};

fn user_view(user: engine::User) -> UserView {
    UserView {
        email: user.email,
        user_info: user.user_info,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

pub async fn get<S: LedgerStore>(
    State(state): State<ServerState<S>>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<UserView>, ServerError> {
    let Query(query) = query?;
    let user = state.engine.user(&query.email).await?;
    Ok(Json(user_view(user)))
}

/// Create the user, or refresh the stored profile of an existing one
pub async fn upsert<S: LedgerStore>(
    State(state): State<ServerState<S>>,
    payload: Result<Json<UserUpsert>, JsonRejection>,
) -> Result<Response, ServerError> {
    let Json(payload) = payload?;
    let email = payload
        .email()
        .ok_or_else(|| ServerError::Generic("user email is required".to_string()))?
        .to_string();

    let (user, created) = state.engine.upsert_user(&email, payload.user).await?;

    if created {
        Ok((
            StatusCode::CREATED,
            Json(UserCreated {
                message: "User created successfully".to_string(),
                user_id: user.email,
            }),
        )
            .into_response())
    } else {
        Ok((StatusCode::OK, Json(user_view(user))).into_response())
    }
}
