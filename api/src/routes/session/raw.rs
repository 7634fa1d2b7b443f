use actix_web::{web, HttpResponse};

use sk_core::domain::entities::Book;

use crate::middleware::session::Session;

use super::BOOKS_KEY;

/// Handler for GET /rawsession
pub async fn get_books(session: Session) -> HttpResponse {
    let books: Vec<Book> = session.get(BOOKS_KEY).unwrap_or_default();
    HttpResponse::Ok().json(books)
}

/// Handler for POST /rawsession
pub async fn add_book(
    session: Session,
    book: web::Json<Book>,
) -> Result<HttpResponse, actix_web::Error> {
    let book = book.into_inner();
    let mut books: Vec<Book> = session.get(BOOKS_KEY).unwrap_or_default();
    books.push(book.clone());
    session.insert(BOOKS_KEY, &books)?;
    Ok(HttpResponse::Created().json(book))
}

/// Handler for DELETE /rawsession
pub async fn remove_books(session: Session) -> HttpResponse {
    session.remove(BOOKS_KEY);
    HttpResponse::NoContent().finish()
}
