//! Account and session endpoints

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use kinship::{KinshipError, social::UserUpdate};
use tracing::info;

use crate::{
    api::auth::{AuthContext, MaybeAuth, generate_jwt_token, hash_password, verify_password},
    api::dto::{
        CreateUserRequest, LoginRequest, LoginResponse, MessageResponse, UpdateUserRequest,
        UserDto,
    },
    error::ServerResult,
    state::AppState,
};

const BAD_CREDENTIALS: &str = "Username or password is incorrect!";

/// Get the logged-in user
#[utoipa::path(
    get,
    path = "/api/session",
    tag = "users",
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Not logged in"),
    )
)]
pub async fn get_session_user(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
) -> ServerResult<Json<UserDto>> {
    let user = state.kinship.users().get(&auth.user_id).await?;
    Ok(Json(user.into()))
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = Vec<UserDto>),
    )
)]
pub async fn list_users(State(state): State<Arc<AppState>>) -> ServerResult<Json<Vec<UserDto>>> {
    let users = state.kinship.users().list().await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

/// Look up a user by username
#[utoipa::path(
    get,
    path = "/api/users/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "No such user"),
    )
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> ServerResult<Json<UserDto>> {
    let user = state.kinship.users().get_by_username(&username).await?;
    Ok(Json(user.into()))
}

/// Register a new account. Only allowed while logged out.
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 400, description = "Empty username or password"),
        (status = 403, description = "Logged in, or username taken"),
    )
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    MaybeAuth(auth): MaybeAuth,
    Json(request): Json<CreateUserRequest>,
) -> ServerResult<(StatusCode, Json<UserDto>)> {
    if auth.is_some() {
        return Err(KinshipError::NotAllowed("Must be logged out!".to_string()).into());
    }
    if request.username.is_empty() || request.password.is_empty() {
        return Err(KinshipError::BadValues(
            "Username and password must be non-empty!".to_string(),
        )
        .into());
    }

    let password_hash = hash_password(&request.password, state.config.password_cost)?;
    let user = state
        .kinship
        .users()
        .create(&request.username, &password_hash)
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Change the logged-in user's username or password
#[utoipa::path(
    patch,
    path = "/api/users",
    tag = "users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 400, description = "Empty username or password"),
        (status = 403, description = "Username taken"),
    )
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Json(request): Json<UpdateUserRequest>,
) -> ServerResult<Json<UserDto>> {
    let password_hash = match request.password {
        Some(password) if password.is_empty() => {
            return Err(KinshipError::BadValues("Password cannot be empty!".to_string()).into());
        }
        Some(password) => Some(hash_password(&password, state.config.password_cost)?),
        None => None,
    };

    let update = UserUpdate {
        username: request.username,
        password_hash,
    };
    let user = state.kinship.users().update(&auth.user_id, update).await?;
    Ok(Json(user.into()))
}

/// Delete the logged-in user's account and log out
#[utoipa::path(
    delete,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
    )
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
) -> ServerResult<Json<MessageResponse>> {
    state.kinship.users().delete(&auth.user_id).await?;
    Ok(Json(MessageResponse::new("Deleted user!")))
}

/// Log in and receive a bearer token
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "sessions",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 403, description = "Wrong username or password"),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ServerResult<Json<LoginResponse>> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(KinshipError::BadValues(
            "Username and password must be non-empty!".to_string(),
        )
        .into());
    }

    let user = match state.kinship.users().get_by_username(&request.username).await {
        Ok(user) => user,
        Err(KinshipError::NotFound(_)) => {
            return Err(KinshipError::NotAllowed(BAD_CREDENTIALS.to_string()).into());
        }
        Err(e) => return Err(e.into()),
    };
    if !verify_password(&request.password, &user.password_hash)? {
        return Err(KinshipError::NotAllowed(BAD_CREDENTIALS.to_string()).into());
    }

    let session = state
        .kinship
        .sessions()
        .start(&user.id, state.config.session_ttl())
        .await?;
    let token = generate_jwt_token(
        &user.id,
        &session.id,
        &state.config.jwt_secret,
        session.expires_at,
    )?;

    info!("User {} logged in", user.username);
    Ok(Json(LoginResponse {
        msg: "Logged in!".to_string(),
        token,
        username: user.username,
        expires_at: session.expires_at,
    }))
}

/// End the current session
#[utoipa::path(
    post,
    path = "/api/logout",
    tag = "sessions",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Not logged in"),
    )
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
) -> ServerResult<Json<MessageResponse>> {
    state.kinship.sessions().end(&auth.session_id).await?;
    Ok(Json(MessageResponse::new("Logged out!")))
}
