//! pcsync Core - Domain logic and port definitions
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain types** - `SyncPath`, `RemotePath`, `RelativePath`, `ContentHash`, `FileEntry`
//! - **Path mapping** - [`domain::PathMapper`] between the local root and its remote mirror
//! - **Port definitions** - Traits for adapters: `IRemoteStore`, `ILocalStore`
//! - **Configuration** - YAML-backed [`config::Config`]
//!
//! # Architecture
//!
//! The domain module contains pure logic with no I/O. Ports define the trait
//! interfaces that the adapter crates (`pcsync-sync`, `pcsync-cloud`) implement,
//! and the sync engines consume them only through those traits.

pub mod config;
pub mod domain;
pub mod ports;
