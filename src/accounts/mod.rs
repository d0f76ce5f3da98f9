//! Username/password accounts
//!
//! Registration, credential checks and logout on top of the `users` table.

pub mod manager;
pub mod password;

pub use manager::{AccountManager, Authenticated, MIN_PASSWORD_LEN};
pub use password::hash_password;
