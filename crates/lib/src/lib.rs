//! fpm-lib: Core types and logic for the fpm component manager
//!
//! This crate provides everything the `fpm` binary needs to manage components:
//! - `manifest`: parsing the remote component catalog
//! - `state`: installation records and reconciliation against the catalog
//! - `resolve`: dependency closure over ID/category tokens
//! - `plan`: download, remove and update queues
//! - `install`: archive extraction and removal for a single component
//! - `execute`: sequential plan execution with per-component failures

pub mod config;
pub mod consts;
pub mod execute;
pub mod fetch;
pub mod install;
pub mod manifest;
pub mod plan;
pub mod platform;
pub mod resolve;
pub mod state;
pub mod util;
