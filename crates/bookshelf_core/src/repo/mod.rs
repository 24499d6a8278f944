//! Record store contracts and their implementations.
//!
//! # Responsibility
//! - Define the keyed record-store operations the catalog services consume.
//! - Keep SQL and locking details out of the service layer.
//!
//! # Invariants
//! - Every mutation touching more than one row runs in one transaction (SQLite)
//!   or under one lock scope (memory).
//! - Check-then-act sequences use store-native atomic primitives; no service
//!   performs an unguarded read followed by a write.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateIsbn`) in
//!   addition to transport errors.

pub mod book_repo;
pub mod id_registry;
pub mod memory_store;
pub mod rating_repo;
pub mod sqlite_store;
