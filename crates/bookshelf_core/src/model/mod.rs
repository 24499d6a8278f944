//! Catalog domain model.
//!
//! # Responsibility
//! - Define the book and rating records stored by the catalog.
//! - Validate caller input against an explicit schema before any side effect.
//! - Describe field filters over stored records.
//!
//! # Invariants
//! - A book and its rating share one `BookId`; there is no other link.
//! - A rating's `average` is always derived from its `values`.

pub mod book;
pub mod filter;
pub mod rating;
