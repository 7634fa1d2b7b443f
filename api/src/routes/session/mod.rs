//! Session demo routes
//!
//! `/session` stores one typed struct per client; `/rawsession` reads and
//! writes individual keys. Each resource has its own cookie.

pub mod raw;
pub mod typed;

use actix_web::web;

use sk_core::repositories::SessionStore;

use crate::middleware::session::SessionMiddleware;

/// Key holding the book list in the raw session
pub const BOOKS_KEY: &str = "books";

/// Registers both session resources behind their own session middleware
pub fn configure<S: SessionStore + 'static>(
    cfg: &mut web::ServiceConfig,
    typed_sessions: SessionMiddleware<S>,
    raw_sessions: SessionMiddleware<S>,
) {
    cfg.service(
        web::resource("/session")
            .wrap(typed_sessions)
            .route(web::get().to(typed::get_books))
            .route(web::post().to(typed::add_book))
            .route(web::delete().to(typed::destroy)),
    )
    .service(
        web::resource("/rawsession")
            .wrap(raw_sessions)
            .route(web::get().to(raw::get_books))
            .route(web::post().to(raw::add_book))
            .route(web::delete().to(raw::remove_books)),
    );
}
