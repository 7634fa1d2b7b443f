//! Cache module for process-local state
//!
//! Holds session data between requests. Entries live only as long as the
//! server process.

pub mod session_store;

pub use session_store::InMemorySessionStore;
