use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use sk_core::domain::entities::Book;

use crate::middleware::session::Session;

/// Typed contents of the `/session` session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookSession {
    #[serde(default)]
    pub books: Vec<Book>,
}

/// Handler for GET /session
pub async fn get_books(session: Session) -> Result<HttpResponse, actix_web::Error> {
    let state: BookSession = session.state()?;
    Ok(HttpResponse::Ok().json(state.books))
}

/// Handler for POST /session
pub async fn add_book(
    session: Session,
    book: web::Json<Book>,
) -> Result<HttpResponse, actix_web::Error> {
    let book = book.into_inner();
    let mut state: BookSession = session.state()?;
    state.books.push(book.clone());
    session.set_state(&state)?;
    Ok(HttpResponse::Created().json(book))
}

/// Handler for DELETE /session
pub async fn destroy(session: Session) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}
