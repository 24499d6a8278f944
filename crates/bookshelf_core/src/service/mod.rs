//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate lookup, identifier allocation and repository calls into the
//!   operations consumed by the boundary layer.
//! - Translate repository and lookup failures into kinded `CatalogError`s.
//!
//! # Invariants
//! - Input is validated before any side effect.
//! - Services stay storage-agnostic; they only see repository traits.

pub mod book_service;
pub mod error;
pub mod id_allocator;
pub mod leaderboard;
pub mod rating_service;
