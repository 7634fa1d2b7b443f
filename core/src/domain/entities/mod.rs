//! Domain entities representing core business objects.

pub mod book;
pub mod grade;
pub mod session;
pub mod token;

// Re-export commonly used types
pub use book::Book;
pub use grade::{Grade, GradesQuery};
pub use session::SessionData;
pub use token::{
    numeric_date, SignedToken, TokenClaims, TokenDetails, TokenHeader, JWT_ALGORITHM,
    NUMERIC_DATE_RESOLUTION, TOKEN_TTL_SECONDS,
};
