//! Class loading and publication.
//!
//! This module ties table construction and resolution together:
//!
//! - [`ClassLoadCoordinator`] - builds tables under a per-class lock and publishes them
//!   atomically, handles redefinition and loader unloading
//! - [`ClassDefinition`] - parsed class metadata as handed over by a class-file parser
//! - [`ClassHandle`] - a snapshot of one published table
//! - [`ClassState`] - lifecycle of a class identity
//! - [`LoaderConfig`] - validation, sorting and resolution tunables

mod class;
mod config;
mod coordinator;

pub(crate) use class::StateCell;
pub use class::{ClassDefinition, ClassHandle, ClassState};
pub use config::{LoaderConfig, DEFAULT_PARALLEL_SORT_THRESHOLD, MAX_HIERARCHY_DEPTH};
pub use coordinator::{ClassLoadCoordinator, LoaderStats};
