//! Module readability and member access.
//!
//! - [`ModuleReadGraph`] - registered modules and their directed read edges
//! - [`AccessChecker`] - member visibility on top of the graph, with a pluggable
//!   [`FriendPolicy`] for non-public members
//! - [`AddReadsOptions`] - `--add-reads` values applied to a graph

mod access;
mod graph;
mod options;

pub use access::{AccessChecker, FriendPolicy, NoFriends};
pub use graph::{ModuleInfo, ModuleKind, ModuleReadEdge, ModuleReadGraph, ALL_UNNAMED};
pub use options::{AddReadsOption, AddReadsOptions};
