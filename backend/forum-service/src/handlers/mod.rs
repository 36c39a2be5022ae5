//! HTTP handlers for the forum endpoints.
//!
//! Handlers stay thin: decode the request, hand it to a service, encode the
//! result. `configure` wires the whole route tree and is shared by `main`
//! and the integration tests.

pub mod admin;
pub mod auth;
pub mod posts;
pub mod stats;

// Re-export handler functions at module level
pub use admin::{grant_admin, list_users, toggle_block};
pub use auth::{login, register};
pub use posts::{
    add_comment, create_post, delete_post, dislike_post, edit_comment, get_post, like_post,
    list_posts, my_posts, update_post,
};
pub use stats::get_stats;

use crate::middleware::SessionMiddleware;
use actix_web::web;

/// The `/api/v1` route tree. Everything below the session-guarded scope
/// requires a valid bearer token; admin checks live in the service layer.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/stats", web::get().to(stats::get_stats))
        .service(
            web::scope("/api/v1/auth")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login)),
        )
        .service(
            web::scope("/api/v1")
                .wrap(SessionMiddleware)
                .service(
                    web::scope("/posts")
                        .service(
                            web::resource("")
                                .route(web::get().to(posts::list_posts))
                                .route(web::post().to(posts::create_post)),
                        )
                        .service(web::resource("/mine").route(web::get().to(posts::my_posts)))
                        .service(
                            web::resource("/{post_id}")
                                .route(web::get().to(posts::get_post))
                                .route(web::patch().to(posts::update_post))
                                .route(web::delete().to(posts::delete_post)),
                        )
                        .service(
                            web::resource("/{post_id}/likes")
                                .route(web::post().to(posts::like_post))
                                .route(web::delete().to(posts::dislike_post)),
                        )
                        .service(
                            web::resource("/{post_id}/comments")
                                .route(web::post().to(posts::add_comment)),
                        )
                        .service(
                            web::resource("/{post_id}/comments/{comment_id}")
                                .route(web::patch().to(posts::edit_comment)),
                        ),
                )
                .service(
                    web::scope("/admin")
                        .service(web::resource("/users").route(web::get().to(admin::list_users)))
                        .service(
                            web::resource("/users/{handle}/block")
                                .route(web::post().to(admin::toggle_block)),
                        )
                        .service(
                            web::resource("/users/{handle}/admin")
                                .route(web::post().to(admin::grant_admin)),
                        ),
                ),
        );
}
