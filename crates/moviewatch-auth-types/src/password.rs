//! bcrypt password hashing.
//!
//! Both functions are CPU bound; async callers run them on the blocking pool.

pub const BCRYPT_COST: u32 = 10;

#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(#[from] bcrypt::BcryptError);

pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    Ok(bcrypt::hash(plain, BCRYPT_COST)?)
}

/// `Ok(false)` on mismatch. Errors only for an unparseable stored hash.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, PasswordError> {
    Ok(bcrypt::verify(plain, hash)?)
}
