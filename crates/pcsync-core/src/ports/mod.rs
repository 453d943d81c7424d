//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. The planner, executor and validator depend only
//! on these traits; implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IRemoteStore`] - Cloud storage namespace (list, read, write, checksum)
//! - [`ILocalStore`] - Local filesystem subtree (list, read, atomic write, hash)

pub mod error;
pub mod local_store;
pub mod remote_store;

pub use error::StoreError;
pub use local_store::{FileState, ILocalStore};
pub use remote_store::{IRemoteStore, RemoteItem};
