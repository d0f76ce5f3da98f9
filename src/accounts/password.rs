//! Password digest
//!
//! Passwords are stored as an unsalted SHA-256 hex digest. Identical passwords
//! produce identical digests, so a leaked table is open to precomputed
//! lookups. Moving to a salted, slow hash needs a migration of existing rows.

use sha2::{Digest, Sha256};

/// Deterministic one-way digest of `password`
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}
