//! Authorization rules. Pure functions over the caller and the resource.

use crate::domain::types::{Identity, Review, User, Watchlist};
use crate::error::ApiError;

/// Anything with a single owning user.
pub trait OwnedResource {
    fn owner_id(&self) -> i32;
}

/// Bare user id, for rules checked against a path parameter.
#[derive(Debug, Clone, Copy)]
pub struct OwnerId(pub i32);

impl OwnedResource for OwnerId {
    fn owner_id(&self) -> i32 {
        self.0
    }
}

impl OwnedResource for User {
    fn owner_id(&self) -> i32 {
        self.id
    }
}

impl OwnedResource for Review {
    fn owner_id(&self) -> i32 {
        self.user_id
    }
}

impl OwnedResource for Watchlist {
    fn owner_id(&self) -> i32 {
        self.user_id
    }
}

pub fn require_admin(identity: &Identity) -> Result<(), ApiError> {
    if identity.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Owner only; admins get no bypass.
pub fn require_owner(identity: &Identity, resource: &impl OwnedResource) -> Result<(), ApiError> {
    if resource.owner_id() == identity.user_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

pub fn require_owner_or_admin(
    identity: &Identity,
    resource: &impl OwnedResource,
) -> Result<(), ApiError> {
    if identity.is_admin() {
        return Ok(());
    }
    require_owner(identity, resource)
}

/// Public lists are visible to anyone, including anonymous callers.
/// Private lists only to their owner.
pub fn require_visible(identity: Option<&Identity>, watchlist: &Watchlist) -> Result<(), ApiError> {
    if watchlist.is_public {
        return Ok(());
    }
    match identity {
        Some(identity) => require_owner(identity, watchlist),
        None => Err(ApiError::Forbidden),
    }
}
