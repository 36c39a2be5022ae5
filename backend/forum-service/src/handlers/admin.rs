//! Admin handlers - user management for the admin dashboard.

use crate::app_state::AppState;
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::services::UserService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UserSearchQuery {
    #[serde(default)]
    pub search: String,
}

/// List all users except the requesting admin, optionally filtered
pub async fn list_users(
    state: web::Data<AppState>,
    admin: CurrentUser,
    query: web::Query<UserSearchQuery>,
) -> Result<HttpResponse> {
    let service = UserService::new(state.store.clone(), state.identity.clone());
    let users = service.list_users(&admin, &query.search).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Toggle a user's block flag
pub async fn toggle_block(
    state: web::Data<AppState>,
    admin: CurrentUser,
    handle: web::Path<String>,
) -> Result<HttpResponse> {
    let service = UserService::new(state.store.clone(), state.identity.clone());
    service.toggle_block(&admin, &handle).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Grant a user admin rights
pub async fn grant_admin(
    state: web::Data<AppState>,
    admin: CurrentUser,
    handle: web::Path<String>,
) -> Result<HttpResponse> {
    let service = UserService::new(state.store.clone(), state.identity.clone());
    service.make_admin(&admin, &handle).await?;
    Ok(HttpResponse::NoContent().finish())
}
