pub mod auth;
pub mod session;

pub use auth::{AuthenticatedToken, JwtAuth};
pub use session::{Session, SessionMiddleware};
