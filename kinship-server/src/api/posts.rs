//! Post endpoints

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use kinship::social::PostUpdate;

use crate::{
    api::auth::AuthContext,
    api::dto::{
        CreatePostRequest, ListPostsParams, MessageResponse, PostDto, SearchParams,
        UpdatePostRequest,
    },
    error::ServerResult,
    state::AppState,
};

/// List posts, optionally only those of one author
#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(ListPostsParams),
    responses(
        (status = 200, description = "Posts, newest first", body = Vec<PostDto>),
        (status = 404, description = "Unknown author"),
    )
)]
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListPostsParams>,
) -> ServerResult<Json<Vec<PostDto>>> {
    let kinship = &state.kinship;
    let posts = match params.author.as_deref().filter(|author| !author.is_empty()) {
        Some(author) => {
            let id = kinship.users().resolve(author).await?;
            kinship.posts().get_by_author(&id).await?
        }
        None => kinship.posts().get_posts().await?,
    };

    Ok(Json(PostDto::render_all(kinship, posts).await?))
}

/// Write a post as the logged-in user
#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Empty content"),
    )
)]
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Json(request): Json<CreatePostRequest>,
) -> ServerResult<(StatusCode, Json<PostDto>)> {
    let post = state
        .kinship
        .posts()
        .create(
            &auth.user_id,
            &request.content,
            request.options.map(Into::into),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PostDto::render(&state.kinship, post).await?),
    ))
}

/// Edit a post. Author only.
#[utoipa::path(
    patch,
    path = "/api/posts/{id}",
    tag = "posts",
    params(("id" = String, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostDto),
        (status = 403, description = "Not the author"),
        (status = 404, description = "No such post"),
    )
)]
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(id): Path<String>,
    Json(request): Json<UpdatePostRequest>,
) -> ServerResult<Json<PostDto>> {
    let posts = state.kinship.posts();
    posts.ensure_author(&auth.user_id, &id).await?;

    let update = PostUpdate {
        content: request.content,
        options: request.options.map(Into::into),
    };
    let post = posts.update(&id, update).await?;
    Ok(Json(PostDto::render(&state.kinship, post).await?))
}

/// Delete a post. Author only.
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "posts",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post deleted", body = MessageResponse),
        (status = 403, description = "Not the author"),
        (status = 404, description = "No such post"),
    )
)]
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ServerResult<Json<MessageResponse>> {
    let posts = state.kinship.posts();
    posts.ensure_author(&auth.user_id, &id).await?;
    posts.delete(&id).await?;
    Ok(Json(MessageResponse::new("Deleted post!")))
}

/// Posts containing every keyword of the query, ignoring case
#[utoipa::path(
    get,
    path = "/api/search",
    tag = "posts",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching posts", body = Vec<PostDto>),
        (status = 400, description = "Empty query"),
    )
)]
pub async fn search_posts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> ServerResult<Json<Vec<PostDto>>> {
    let posts = state.kinship.posts().search(&params.search).await?;
    Ok(Json(PostDto::render_all(&state.kinship, posts).await?))
}
