//! Credential primitives for MovieWatch.
//!
//! Password hashing, JWT issue/verify, bearer header parsing and the
//! token lifetime syntax accepted by `JWT_EXPIRES_IN`.

pub mod bearer;
pub mod expiry;
pub mod password;
pub mod token;
