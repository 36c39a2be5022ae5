//! Auth handlers - registration and login against the identity provider.

use crate::app_state::AppState;
use crate::error::Result;
use crate::models::User;
use crate::services::UserService;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
}

/// Create an account and its forum profile
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let service = UserService::new(state.store.clone(), state.identity.clone());
    let session = service
        .register(&req.username, &req.email, &req.password)
        .await?;

    Ok(HttpResponse::Created().json(SessionResponse {
        token: session.token,
        user: session.user,
    }))
}

/// Exchange credentials for a session token and the forum profile
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let service = UserService::new(state.store.clone(), state.identity.clone());
    let session = service.login(&req.email, &req.password).await?;

    Ok(HttpResponse::Ok().json(SessionResponse {
        token: session.token,
        user: session.user,
    }))
}
