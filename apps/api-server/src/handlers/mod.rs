//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod categories;
mod health;
mod mapping;
mod posts;
mod profile;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Posts and their comments
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    .route("/{id}", web::get().to(posts::detail))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete))
                    .route("/{id}/comments", web::post().to(posts::add_comment))
                    .route(
                        "/{id}/comments/{comment_id}",
                        web::put().to(posts::edit_comment),
                    )
                    .route(
                        "/{id}/comments/{comment_id}",
                        web::delete().to(posts::delete_comment),
                    ),
            )
            .route("/category/{slug}", web::get().to(categories::category_posts))
            .route("/profile", web::put().to(profile::update))
            .route("/profile/{username}", web::get().to(profile::show))
            // Staff routes
            .service(
                web::scope("/admin")
                    .route("/forbidden-words", web::get().to(admin::list_words))
                    .route("/forbidden-words", web::post().to(admin::add_word))
                    .route("/forbidden-words/{id}", web::put().to(admin::update_word))
                    .route("/forbidden-words/{id}", web::delete().to(admin::remove_word))
                    .route("/categories", web::get().to(admin::list_categories))
                    .route("/categories", web::post().to(admin::create_category))
                    .route("/categories/{id}", web::put().to(admin::update_category))
                    .route("/locations", web::get().to(admin::list_locations))
                    .route("/locations", web::post().to(admin::create_location))
                    .route("/locations/{id}", web::put().to(admin::update_location)),
            ),
    );
}
