//! Public stats for the landing page.

use crate::app_state::AppState;
use crate::error::Result;
use crate::services::UserService;
use actix_web::{web, HttpResponse};

pub async fn get_stats(state: web::Data<AppState>) -> Result<HttpResponse> {
    let service = UserService::new(state.store.clone(), state.identity.clone());
    let user_count = service.user_count().await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "userCount": user_count })))
}
