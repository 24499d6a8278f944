//! Collision-free book identifier allocation.
//!
//! # Invariants
//! - A returned identifier has been claimed in the registry by this call and
//!   by no other.
//! - Candidates are random v4 UUIDs; a collision only costs a retry.

use crate::model::book::BookId;
use crate::repo::id_registry::IdRegistry;
use crate::service::error::CatalogError;
use log::{debug, error};
use uuid::Uuid;

/// Allocates a fresh identifier using random v4 candidates.
pub fn allocate_id<R: IdRegistry + ?Sized>(
    registry: &R,
    max_attempts: u32,
) -> Result<BookId, CatalogError> {
    allocate_id_with(registry, max_attempts, Uuid::new_v4)
}

/// Allocates using caller-supplied candidates.
///
/// # Errors
/// - `CatalogError::IdSpaceExhausted` after `max_attempts` collisions.
/// - `CatalogError::Store` when the registry cannot be written; not retried.
pub fn allocate_id_with<R: IdRegistry + ?Sized>(
    registry: &R,
    max_attempts: u32,
    mut next_candidate: impl FnMut() -> BookId,
) -> Result<BookId, CatalogError> {
    let attempts = max_attempts.max(1);
    for attempt in 1..=attempts {
        let candidate = next_candidate();
        if registry.register_id(candidate)? {
            return Ok(candidate);
        }
        debug!("event=id_allocate module=service status=collision attempt={attempt}");
    }

    error!("event=id_allocate module=service status=error error_code=id_space_exhausted attempts={attempts}");
    Err(CatalogError::IdSpaceExhausted { attempts })
}
