//! Notification endpoints

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    api::auth::AuthContext,
    api::dto::{
        CreateNotificationRequest, ListNotificationsParams, MessageResponse, NotificationDto,
    },
    error::ServerResult,
    state::AppState,
};

/// Notifications of the logged-in user, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "notifications",
    params(ListNotificationsParams),
    responses((status = 200, description = "Notifications", body = Vec<NotificationDto>))
)]
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Query(params): Query<ListNotificationsParams>,
) -> ServerResult<Json<Vec<NotificationDto>>> {
    let manager = state.kinship.notifications();
    let notifications = if params.unread {
        manager.get_unread(&auth.user_id).await?
    } else {
        manager.get_user_notifications(&auth.user_id).await?
    };

    let mut rendered = Vec::with_capacity(notifications.len());
    for notification in notifications {
        rendered.push(NotificationDto::render(&state.kinship, notification).await?);
    }
    Ok(Json(rendered))
}

/// Send a notification to a user. Open to anonymous callers.
#[utoipa::path(
    post,
    path = "/api/notifications/{target}",
    tag = "notifications",
    params(("target" = String, Path, description = "Username of the recipient")),
    request_body = CreateNotificationRequest,
    responses(
        (status = 201, description = "Notification delivered", body = NotificationDto),
        (status = 400, description = "Empty content"),
        (status = 404, description = "No such user"),
    )
)]
pub async fn add_notification(
    State(state): State<Arc<AppState>>,
    Path(target): Path<String>,
    Json(request): Json<CreateNotificationRequest>,
) -> ServerResult<(StatusCode, Json<NotificationDto>)> {
    let recipient = state.kinship.users().resolve(&target).await?;
    let notification = state
        .kinship
        .notifications()
        .add(&recipient, &request.content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(NotificationDto::render(&state.kinship, notification).await?),
    ))
}

/// Mark a notification as read. Recipient only.
#[utoipa::path(
    patch,
    path = "/api/notifications/{target}",
    tag = "notifications",
    params(("target" = String, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification read", body = NotificationDto),
        (status = 403, description = "Not the recipient"),
        (status = 404, description = "No such notification"),
    )
)]
pub async fn read_notification(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(target): Path<String>,
) -> ServerResult<Json<NotificationDto>> {
    let manager = state.kinship.notifications();
    manager.ensure_owner(&auth.user_id, &target).await?;
    let notification = manager.read(&target).await?;
    Ok(Json(NotificationDto::render(&state.kinship, notification).await?))
}

/// Delete a notification. Recipient only.
#[utoipa::path(
    delete,
    path = "/api/notifications/{target}",
    tag = "notifications",
    params(("target" = String, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification removed", body = MessageResponse),
        (status = 403, description = "Not the recipient"),
        (status = 404, description = "No such notification"),
    )
)]
pub async fn remove_notification(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(target): Path<String>,
) -> ServerResult<Json<MessageResponse>> {
    let manager = state.kinship.notifications();
    manager.ensure_owner(&auth.user_id, &target).await?;
    manager.remove(&target).await?;
    Ok(Json(MessageResponse::new("Removed notification!")))
}
