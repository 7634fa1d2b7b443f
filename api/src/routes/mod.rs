//! Route handlers
//!
//! - `jwt` - token issue, protected access and refresh
//! - `database` - grade records over the mock SQL connection
//! - `session` - typed and raw cookie sessions

pub mod database;
pub mod jwt;
pub mod session;
