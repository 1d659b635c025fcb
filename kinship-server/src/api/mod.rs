//! API implementation for the Kinship HTTP server

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    middleware,
    response::Json,
    routing::{delete, get, patch, post, put},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

pub mod auth;
pub mod dto;
pub mod notifications;
pub mod posts;
pub mod relationships;
pub mod restrictions;
pub mod users;

use auth::auth_middleware;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        users::get_session_user,
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        users::login,
        users::logout,
        posts::list_posts,
        posts::create_post,
        posts::update_post,
        posts::delete_post,
        posts::search_posts,
        relationships::get_follow_relations,
        relationships::get_follow_requests,
        relationships::stop_following,
        relationships::remove_follower,
        relationships::send_follow_request,
        relationships::cancel_follow_request,
        relationships::accept_follow_request,
        relationships::reject_follow_request,
        relationships::get_monitor_relations,
        relationships::get_monitor_requests,
        relationships::send_monitor_request,
        relationships::cancel_monitor_request,
        relationships::accept_monitor_request,
        relationships::reject_monitor_request,
        relationships::stop_monitoring,
        relationships::remove_monitor,
        notifications::list_notifications,
        notifications::add_notification,
        notifications::read_notification,
        notifications::remove_notification,
        restrictions::set_screen_time,
        restrictions::get_screen_time,
        restrictions::list_restrictions,
        restrictions::add_restriction,
        restrictions::update_restriction,
        restrictions::remove_restriction,
        restrictions::get_restriction,
    ),
    components(
        schemas(
            dto::MessageResponse,
            dto::UserDto,
            dto::CreateUserRequest,
            dto::UpdateUserRequest,
            dto::LoginRequest,
            dto::LoginResponse,
            dto::PostDto,
            dto::PostOptionsDto,
            dto::CreatePostRequest,
            dto::UpdatePostRequest,
            dto::RelationDto,
            dto::RequestDto,
            dto::NotificationDto,
            dto::CreateNotificationRequest,
            dto::ScreenTimeDto,
            dto::SetScreenTimeRequest,
            dto::RestrictionDto,
            dto::RestrictionRequest,
            dto::FeatureRequest,
            dto::FeatureUsageDto,
            dto::HealthResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "users", description = "Account management endpoints"),
        (name = "sessions", description = "Login and logout"),
        (name = "posts", description = "Posts and search"),
        (name = "follow", description = "Follow requests and relations"),
        (name = "monitor", description = "Monitor requests and relations"),
        (name = "notifications", description = "Per-user notifications"),
        (name = "screen_time", description = "Time spent on features"),
        (name = "restrictions", description = "Daily time limits on features"),
    ),
    info(
        title = "Kinship API",
        version = "1.0.0",
        description = "Users, posts, follow and monitor relationships, notifications and screen time restrictions.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;

/// Create the main router with all API endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        // Sessions and accounts
        .route("/session", get(users::get_session_user))
        .route("/login", post(users::login))
        .route("/logout", post(users::logout))
        .route(
            "/users",
            get(users::list_users)
                .post(users::create_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/{username}", get(users::get_user))
        // Screen time and restrictions
        .route(
            "/users/{username}/screentime/{feature}",
            get(restrictions::get_screen_time).post(restrictions::set_screen_time),
        )
        .route(
            "/users/{username}/restrictions",
            get(restrictions::list_restrictions)
                .post(restrictions::add_restriction)
                .patch(restrictions::update_restriction)
                .delete(restrictions::remove_restriction),
        )
        .route(
            "/users/{username}/restrictions/{feature}",
            get(restrictions::get_restriction),
        )
        // Posts
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route(
            "/posts/{id}",
            patch(posts::update_post).delete(posts::delete_post),
        )
        .route("/search", get(posts::search_posts))
        // Follow
        .route("/follow", get(relationships::get_follow_relations))
        .route("/follow/requests", get(relationships::get_follow_requests))
        .route(
            "/follow/requests/{to}",
            post(relationships::send_follow_request).delete(relationships::cancel_follow_request),
        )
        .route(
            "/follow/accept/{from}",
            put(relationships::accept_follow_request),
        )
        .route(
            "/follow/reject/{from}",
            put(relationships::reject_follow_request),
        )
        .route(
            "/follow/following/{target}",
            delete(relationships::stop_following),
        )
        .route(
            "/follow/followers/{target}",
            delete(relationships::remove_follower),
        )
        // Monitor
        .route("/monitorRelations", get(relationships::get_monitor_relations))
        .route(
            "/monitorRelations/requests",
            get(relationships::get_monitor_requests),
        )
        .route(
            "/monitorRelations/requests/{to}",
            post(relationships::send_monitor_request)
                .delete(relationships::cancel_monitor_request),
        )
        .route(
            "/monitorRelations/requests/accept/{from}",
            put(relationships::accept_monitor_request),
        )
        .route(
            "/monitorRelations/requests/reject/{from}",
            put(relationships::reject_monitor_request),
        )
        .route(
            "/monitorRelations/monitoring/{target}",
            delete(relationships::stop_monitoring),
        )
        .route(
            "/monitorRelations/monitors/{target}",
            delete(relationships::remove_monitor),
        )
        // Notifications
        .route("/notifications", get(notifications::list_notifications))
        .route(
            "/notifications/{target}",
            post(notifications::add_notification)
                .patch(notifications::read_notification)
                .delete(notifications::remove_notification),
        )
        .route("/health", get(health_check))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state);

    // Main router with API prefix and documentation
    let swagger_router = SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    Router::new().nest("/api", api_router).merge(swagger_router)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health", body = dto::HealthResponse)
    )
)]
async fn health_check(State(state): State<Arc<AppState>>) -> Json<dto::HealthResponse> {
    let storage = state.kinship.health_check().await.unwrap_or(false);

    Json(dto::HealthResponse {
        status: if storage { "OK" } else { "DEGRADED" }.to_string(),
        version: kinship::VERSION.to_string(),
        storage,
    })
}
