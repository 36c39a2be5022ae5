//! Post handlers - HTTP endpoints for posts, likes, and comments.

use crate::app_state::AppState;
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::SortOrder;
use crate::services::PostService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub sort: SortOrder,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

/// List posts, filtered and sorted
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let service = PostService::new(state.store.clone());
    let posts = service.list_posts(&query.search, query.sort).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Create a new post
pub async fn create_post(
    state: web::Data<AppState>,
    user: CurrentUser,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let service = PostService::new(state.store.clone());
    let id = service.create_post(&user, &req.title, &req.content).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "id": id })))
}

/// The session user's own posts
pub async fn my_posts(state: web::Data<AppState>, user: CurrentUser) -> Result<HttpResponse> {
    let service = PostService::new(state.store.clone());
    let posts = service.my_posts(&user).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Get a single post
pub async fn get_post(
    state: web::Data<AppState>,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    let service = PostService::new(state.store.clone());
    let post = service.get_post(&post_id).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Update a post's title and/or content
pub async fn update_post(
    state: web::Data<AppState>,
    user: CurrentUser,
    post_id: web::Path<String>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    let service = PostService::new(state.store.clone());
    service
        .update_post(&user, &post_id, req.title.as_deref(), req.content.as_deref())
        .await?;
    Ok(HttpResponse::Ok().finish())
}

/// Delete a post
pub async fn delete_post(
    state: web::Data<AppState>,
    user: CurrentUser,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    let service = PostService::new(state.store.clone());
    service.delete_post(&user, &post_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Like a post
pub async fn like_post(
    state: web::Data<AppState>,
    user: CurrentUser,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    let service = PostService::new(state.store.clone());
    service.like_post(&user, &post_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Withdraw a like
pub async fn dislike_post(
    state: web::Data<AppState>,
    user: CurrentUser,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    let service = PostService::new(state.store.clone());
    service.dislike_post(&user, &post_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Add a comment to a post
pub async fn add_comment(
    state: web::Data<AppState>,
    user: CurrentUser,
    post_id: web::Path<String>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    let service = PostService::new(state.store.clone());
    let id = service.add_comment(&user, &post_id, &req.text).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "id": id })))
}

/// Edit a comment's text
pub async fn edit_comment(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<(String, String)>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let service = PostService::new(state.store.clone());
    service
        .edit_comment(&user, &post_id, &comment_id, &req.text)
        .await?;
    Ok(HttpResponse::Ok().finish())
}
