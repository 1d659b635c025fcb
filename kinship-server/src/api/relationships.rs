//! Follow and monitor endpoints
//!
//! Both kinds run on the same relationship manager type and share the helpers
//! at the bottom of this file. A relation `(a, b)` reads "a follows b" or
//! "a monitors b". A request from `from` invites `to` into the relation:
//! accepting it creates `(to, from)`.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use kinship::relationships::RelationshipManager;

use crate::{
    api::auth::AuthContext,
    api::dto::{RelationDto, RequestDto},
    error::ServerResult,
    state::AppState,
};

/// Follow relations involving the logged-in user
#[utoipa::path(
    get,
    path = "/api/follow",
    tag = "follow",
    responses((status = 200, description = "Follow relations", body = Vec<RelationDto>))
)]
pub async fn get_follow_relations(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
) -> ServerResult<Json<Vec<RelationDto>>> {
    relations(&state, state.kinship.follow(), &auth).await
}

/// Follow requests sent or received by the logged-in user
#[utoipa::path(
    get,
    path = "/api/follow/requests",
    tag = "follow",
    responses((status = 200, description = "Follow requests", body = Vec<RequestDto>))
)]
pub async fn get_follow_requests(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
) -> ServerResult<Json<Vec<RequestDto>>> {
    requests(&state, state.kinship.follow(), &auth).await
}

/// Stop following `target`
#[utoipa::path(
    delete,
    path = "/api/follow/following/{target}",
    tag = "follow",
    params(("target" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Relation removed", body = RelationDto),
        (status = 404, description = "Not following target"),
    )
)]
pub async fn stop_following(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(target): Path<String>,
) -> ServerResult<Json<RelationDto>> {
    let target = state.kinship.users().resolve(&target).await?;
    remove(&state, state.kinship.follow(), &auth.user_id, &target).await
}

/// Make `target` stop following the logged-in user
#[utoipa::path(
    delete,
    path = "/api/follow/followers/{target}",
    tag = "follow",
    params(("target" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Relation removed", body = RelationDto),
        (status = 404, description = "Target is not a follower"),
    )
)]
pub async fn remove_follower(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(target): Path<String>,
) -> ServerResult<Json<RelationDto>> {
    let target = state.kinship.users().resolve(&target).await?;
    remove(&state, state.kinship.follow(), &target, &auth.user_id).await
}

/// Invite `to` to follow the logged-in user
#[utoipa::path(
    post,
    path = "/api/follow/requests/{to}",
    tag = "follow",
    params(("to" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Request sent", body = RequestDto),
        (status = 400, description = "Request to yourself"),
        (status = 409, description = "Already requested or already followed"),
    )
)]
pub async fn send_follow_request(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(to): Path<String>,
) -> ServerResult<Json<RequestDto>> {
    send(&state, state.kinship.follow(), &auth, &to).await
}

/// Withdraw a pending follow invitation to `to`
#[utoipa::path(
    delete,
    path = "/api/follow/requests/{to}",
    tag = "follow",
    params(("to" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Request withdrawn", body = RequestDto),
        (status = 404, description = "No pending request"),
    )
)]
pub async fn cancel_follow_request(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(to): Path<String>,
) -> ServerResult<Json<RequestDto>> {
    cancel(&state, state.kinship.follow(), &auth, &to).await
}

/// Accept the pending request from `from` and start following them
#[utoipa::path(
    put,
    path = "/api/follow/accept/{from}",
    tag = "follow",
    params(("from" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Request accepted", body = RelationDto),
        (status = 404, description = "No pending request"),
    )
)]
pub async fn accept_follow_request(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(from): Path<String>,
) -> ServerResult<Json<RelationDto>> {
    accept(&state, state.kinship.follow(), &auth, &from).await
}

/// Decline to follow `from`
#[utoipa::path(
    put,
    path = "/api/follow/reject/{from}",
    tag = "follow",
    params(("from" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Request rejected", body = RequestDto),
        (status = 404, description = "No pending request"),
    )
)]
pub async fn reject_follow_request(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(from): Path<String>,
) -> ServerResult<Json<RequestDto>> {
    reject(&state, state.kinship.follow(), &auth, &from).await
}

/// Monitor relations involving the logged-in user
#[utoipa::path(
    get,
    path = "/api/monitorRelations",
    tag = "monitor",
    responses((status = 200, description = "Monitor relations", body = Vec<RelationDto>))
)]
pub async fn get_monitor_relations(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
) -> ServerResult<Json<Vec<RelationDto>>> {
    relations(&state, state.kinship.monitor(), &auth).await
}

/// Monitor requests sent or received by the logged-in user
#[utoipa::path(
    get,
    path = "/api/monitorRelations/requests",
    tag = "monitor",
    responses((status = 200, description = "Monitor requests", body = Vec<RequestDto>))
)]
pub async fn get_monitor_requests(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
) -> ServerResult<Json<Vec<RequestDto>>> {
    requests(&state, state.kinship.monitor(), &auth).await
}

/// Ask `to` to monitor the logged-in user
#[utoipa::path(
    post,
    path = "/api/monitorRelations/requests/{to}",
    tag = "monitor",
    params(("to" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Request sent", body = RequestDto),
        (status = 400, description = "Request to yourself"),
        (status = 409, description = "Already requested or already monitored"),
    )
)]
pub async fn send_monitor_request(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(to): Path<String>,
) -> ServerResult<Json<RequestDto>> {
    send(&state, state.kinship.monitor(), &auth, &to).await
}

/// Withdraw a pending monitor request to `to`
#[utoipa::path(
    delete,
    path = "/api/monitorRelations/requests/{to}",
    tag = "monitor",
    params(("to" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Request withdrawn", body = RequestDto),
        (status = 404, description = "No pending request"),
    )
)]
pub async fn cancel_monitor_request(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(to): Path<String>,
) -> ServerResult<Json<RequestDto>> {
    cancel(&state, state.kinship.monitor(), &auth, &to).await
}

/// Accept the pending request from `from` and start monitoring them
#[utoipa::path(
    put,
    path = "/api/monitorRelations/requests/accept/{from}",
    tag = "monitor",
    params(("from" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Request accepted", body = RelationDto),
        (status = 404, description = "No pending request"),
    )
)]
pub async fn accept_monitor_request(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(from): Path<String>,
) -> ServerResult<Json<RelationDto>> {
    accept(&state, state.kinship.monitor(), &auth, &from).await
}

/// Decline to monitor `from`
#[utoipa::path(
    put,
    path = "/api/monitorRelations/requests/reject/{from}",
    tag = "monitor",
    params(("from" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Request rejected", body = RequestDto),
        (status = 404, description = "No pending request"),
    )
)]
pub async fn reject_monitor_request(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(from): Path<String>,
) -> ServerResult<Json<RequestDto>> {
    reject(&state, state.kinship.monitor(), &auth, &from).await
}

/// Stop monitoring `target`
#[utoipa::path(
    delete,
    path = "/api/monitorRelations/monitoring/{target}",
    tag = "monitor",
    params(("target" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Relation removed", body = RelationDto),
        (status = 404, description = "Not monitoring target"),
    )
)]
pub async fn stop_monitoring(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(target): Path<String>,
) -> ServerResult<Json<RelationDto>> {
    let target = state.kinship.users().resolve(&target).await?;
    remove(&state, state.kinship.monitor(), &auth.user_id, &target).await
}

/// Make `target` stop monitoring the logged-in user
#[utoipa::path(
    delete,
    path = "/api/monitorRelations/monitors/{target}",
    tag = "monitor",
    params(("target" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Relation removed", body = RelationDto),
        (status = 404, description = "Target is not a monitor"),
    )
)]
pub async fn remove_monitor(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(target): Path<String>,
) -> ServerResult<Json<RelationDto>> {
    let target = state.kinship.users().resolve(&target).await?;
    remove(&state, state.kinship.monitor(), &target, &auth.user_id).await
}

async fn relations(
    state: &AppState,
    manager: &RelationshipManager,
    auth: &AuthContext,
) -> ServerResult<Json<Vec<RelationDto>>> {
    let relations = manager.get_relations(&auth.user_id).await?;
    Ok(Json(RelationDto::render_all(&state.kinship, relations).await?))
}

async fn requests(
    state: &AppState,
    manager: &RelationshipManager,
    auth: &AuthContext,
) -> ServerResult<Json<Vec<RequestDto>>> {
    let requests = manager.get_requests(&auth.user_id).await?;
    Ok(Json(RequestDto::render_all(&state.kinship, requests).await?))
}

async fn send(
    state: &AppState,
    manager: &RelationshipManager,
    auth: &AuthContext,
    to: &str,
) -> ServerResult<Json<RequestDto>> {
    let to = state.kinship.users().resolve(to).await?;
    let request = manager.send_request(&auth.user_id, &to).await?;
    Ok(Json(RequestDto::render(&state.kinship, request).await?))
}

async fn cancel(
    state: &AppState,
    manager: &RelationshipManager,
    auth: &AuthContext,
    to: &str,
) -> ServerResult<Json<RequestDto>> {
    let to = state.kinship.users().resolve(to).await?;
    let request = manager.cancel_request(&auth.user_id, &to).await?;
    Ok(Json(RequestDto::render(&state.kinship, request).await?))
}

async fn accept(
    state: &AppState,
    manager: &RelationshipManager,
    auth: &AuthContext,
    from: &str,
) -> ServerResult<Json<RelationDto>> {
    let from = state.kinship.users().resolve(from).await?;
    let relation = manager.accept_request(&from, &auth.user_id).await?;
    Ok(Json(RelationDto::render(&state.kinship, relation).await?))
}

async fn reject(
    state: &AppState,
    manager: &RelationshipManager,
    auth: &AuthContext,
    from: &str,
) -> ServerResult<Json<RequestDto>> {
    let from = state.kinship.users().resolve(from).await?;
    let request = manager.reject_request(&from, &auth.user_id).await?;
    Ok(Json(RequestDto::render(&state.kinship, request).await?))
}

async fn remove(
    state: &AppState,
    manager: &RelationshipManager,
    a: &str,
    b: &str,
) -> ServerResult<Json<RelationDto>> {
    let relation = manager.remove_relation(a, b).await?;
    Ok(Json(RelationDto::render(&state.kinship, relation).await?))
}
