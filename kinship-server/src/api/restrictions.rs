//! Screen time and time restriction endpoints
//!
//! A user's screen time and restrictions can be read and changed by the user
//! themself or by anyone who monitors them.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::auth::AuthContext,
    api::dto::{
        FeatureRequest, FeatureUsageDto, MessageResponse, RestrictionDto, RestrictionRequest,
        ScreenTimeDto, SetScreenTimeRequest,
    },
    error::ServerResult,
    state::AppState,
};

/// Resolve `username` and check that the caller may manage them
async fn managed_user(state: &AppState, auth: &AuthContext, username: &str) -> ServerResult<String> {
    let user = state.kinship.users().resolve(username).await?;
    state.kinship.ensure_can_manage(&auth.user_id, &user).await?;
    Ok(user)
}

/// Record the minutes a user has spent on a feature
#[utoipa::path(
    post,
    path = "/api/users/{username}/screentime/{feature}",
    tag = "screen_time",
    params(
        ("username" = String, Path, description = "Username"),
        ("feature" = String, Path, description = "Site or app"),
    ),
    request_body = SetScreenTimeRequest,
    responses(
        (status = 200, description = "Screen time recorded", body = ScreenTimeDto),
        (status = 403, description = "Caller does not monitor the user"),
    )
)]
pub async fn set_screen_time(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path((username, feature)): Path<(String, String)>,
    Json(request): Json<SetScreenTimeRequest>,
) -> ServerResult<Json<ScreenTimeDto>> {
    let user = managed_user(&state, &auth, &username).await?;
    let screen_time = state
        .kinship
        .screen_time()
        .set_time_used(&user, &feature, request.time_used)
        .await?;

    Ok(Json(ScreenTimeDto {
        feature: screen_time.feature,
        time_used: screen_time.time_used,
    }))
}

/// Minutes a user has spent on a feature
#[utoipa::path(
    get,
    path = "/api/users/{username}/screentime/{feature}",
    tag = "screen_time",
    params(
        ("username" = String, Path, description = "Username"),
        ("feature" = String, Path, description = "Site or app"),
    ),
    responses(
        (status = 200, description = "Screen time", body = ScreenTimeDto),
        (status = 403, description = "Caller does not monitor the user"),
    )
)]
pub async fn get_screen_time(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path((username, feature)): Path<(String, String)>,
) -> ServerResult<Json<ScreenTimeDto>> {
    let user = managed_user(&state, &auth, &username).await?;
    let time_used = state.kinship.screen_time().get_time_used(&user, &feature).await?;
    Ok(Json(ScreenTimeDto { feature, time_used }))
}

/// All restrictions of a user
#[utoipa::path(
    get,
    path = "/api/users/{username}/restrictions",
    tag = "restrictions",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Restrictions", body = Vec<RestrictionDto>),
        (status = 403, description = "Caller does not monitor the user"),
    )
)]
pub async fn list_restrictions(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(username): Path<String>,
) -> ServerResult<Json<Vec<RestrictionDto>>> {
    let user = managed_user(&state, &auth, &username).await?;
    let restrictions = state.kinship.restrictions().list(&user).await?;
    Ok(Json(restrictions.into_iter().map(RestrictionDto::from).collect()))
}

/// Restrict a feature
#[utoipa::path(
    post,
    path = "/api/users/{username}/restrictions",
    tag = "restrictions",
    params(("username" = String, Path, description = "Username")),
    request_body = RestrictionRequest,
    responses(
        (status = 201, description = "Restriction added", body = RestrictionDto),
        (status = 400, description = "Zero limit or empty feature"),
        (status = 403, description = "Caller does not monitor the user, or already restricted"),
    )
)]
pub async fn add_restriction(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(username): Path<String>,
    Json(request): Json<RestrictionRequest>,
) -> ServerResult<(StatusCode, Json<RestrictionDto>)> {
    let user = managed_user(&state, &auth, &username).await?;
    let restriction = state
        .kinship
        .restrictions()
        .add(&user, &request.feature, request.limit)
        .await?;

    Ok((StatusCode::CREATED, Json(restriction.into())))
}

/// Change the limit of an existing restriction
#[utoipa::path(
    patch,
    path = "/api/users/{username}/restrictions",
    tag = "restrictions",
    params(("username" = String, Path, description = "Username")),
    request_body = RestrictionRequest,
    responses(
        (status = 200, description = "Restriction updated", body = RestrictionDto),
        (status = 400, description = "Zero limit"),
        (status = 404, description = "Feature is not restricted"),
    )
)]
pub async fn update_restriction(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(username): Path<String>,
    Json(request): Json<RestrictionRequest>,
) -> ServerResult<Json<RestrictionDto>> {
    let user = managed_user(&state, &auth, &username).await?;
    let restriction = state
        .kinship
        .restrictions()
        .set(&user, &request.feature, request.limit)
        .await?;

    Ok(Json(restriction.into()))
}

/// Lift a restriction
#[utoipa::path(
    delete,
    path = "/api/users/{username}/restrictions",
    tag = "restrictions",
    params(("username" = String, Path, description = "Username")),
    request_body = FeatureRequest,
    responses(
        (status = 200, description = "Restriction removed", body = MessageResponse),
        (status = 404, description = "Feature is not restricted"),
    )
)]
pub async fn remove_restriction(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(username): Path<String>,
    Json(request): Json<FeatureRequest>,
) -> ServerResult<Json<MessageResponse>> {
    let user = managed_user(&state, &auth, &username).await?;
    state
        .kinship
        .restrictions()
        .remove(&user, &request.feature)
        .await?;

    Ok(Json(MessageResponse::new("Removed restriction!")))
}

/// Usage of a feature against its restriction
#[utoipa::path(
    get,
    path = "/api/users/{username}/restrictions/{feature}",
    tag = "restrictions",
    params(
        ("username" = String, Path, description = "Username"),
        ("feature" = String, Path, description = "Site or app"),
    ),
    responses(
        (status = 200, description = "Feature usage", body = FeatureUsageDto),
        (status = 403, description = "Caller does not monitor the user"),
    )
)]
pub async fn get_restriction(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path((username, feature)): Path<(String, String)>,
) -> ServerResult<Json<FeatureUsageDto>> {
    let user = managed_user(&state, &auth, &username).await?;
    let usage = state.kinship.feature_usage(&user, &feature).await?;
    Ok(Json(usage.into()))
}
