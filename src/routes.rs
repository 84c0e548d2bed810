use actix_web::{Resource, web};

use crate::errors::ApiError;
use crate::handlers::dispatch::{handle_mutation, handle_query};
use crate::handlers::health_handlers::{health, method_not_allowed, not_found};
use crate::handlers::post_handlers::{create_post, delete_post, get_post, list_posts, update_post};
use crate::handlers::user_handlers::{create_user, delete_user, get_user, list_users, update_user};

/// A resource answering 405 for methods it has no route for.
fn resource(path: &str) -> Resource {
    web::resource(path).default_service(web::to(method_not_allowed))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Query strings that don't decode get the JSON envelope, not actix's text.
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::bad_request(format!("invalid query string: {err}")).into()
    }));

    cfg.service(resource("/health").route(web::get().to(handle_query("health", health))))
        .service(
            web::scope("/api")
                .service(
                    resource("/users")
                        .route(web::get().to(handle_query("user", list_users)))
                        .route(web::post().to(handle_mutation("user", create_user))),
                )
                .service(
                    resource("/users/{id}")
                        .route(web::get().to(handle_query("user", get_user)))
                        .route(web::put().to(handle_mutation("user", update_user)))
                        .route(web::delete().to(handle_query("user", delete_user))),
                )
                .service(
                    resource("/posts")
                        .route(web::get().to(handle_query("post", list_posts)))
                        .route(web::post().to(handle_mutation("post", create_post))),
                )
                .service(
                    resource("/posts/{id}")
                        .route(web::get().to(handle_query("post", get_post)))
                        .route(web::put().to(handle_mutation("post", update_post)))
                        .route(web::delete().to(handle_query("post", delete_post))),
                ),
        )
        .default_service(web::to(not_found));
}
