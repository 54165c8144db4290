//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value access contract backing snapshot persistence.
//! - Isolate SQLite query details from store/business orchestration.
//!
//! # Invariants
//! - Repository construction must verify the connection schema before use.
//! - Repository APIs return semantic errors in addition to transport errors.

pub mod kv_repo;
