pub mod token;

pub use sk_shared::ErrorResponse;
pub use token::{CreateTokenRequest, RefreshTokenRequest, TokenResponse};
