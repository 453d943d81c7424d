//! Domain types and pure logic
//!
//! This module contains the core domain types for pcsync:
//! - Newtypes for validated paths and content hashes
//! - Listing entries shared by the planner and the validator
//! - The path mapper between the local sync root and the remote namespace
//! - Domain-specific error types

pub mod entry;
pub mod errors;
pub mod newtypes;
pub mod path_mapper;

// Re-export commonly used types
pub use entry::{epoch, FileEntry, HashEntry, LocalEntry, RemoteEntry};
pub use errors::DomainError;
pub use newtypes::*;
pub use path_mapper::PathMapper;
