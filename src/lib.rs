// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # methodtable
//!
//! The member-table core of a class loader: sorted per-class method and field tables, lookup
//! along the superclass chain, module readability checks, and the coordination that publishes,
//! redefines and unloads tables while other threads keep resolving against them.
//!
//! ## Features
//!
//! - **O(n log n) table construction** - ascending and descending input are recognised in a
//!   single pass, large tables are sorted on the rayon pool
//! - **Duplicate detection** - two members with the same name and descriptor fail the build
//! - **Lock-free resolution** - published tables are immutable and swapped atomically
//! - **Module readability** - explicit read edges, with the unnamed module open to everyone
//! - **Redefinition** - versioned table replacement, old snapshots stay valid
//!
//! ## Quick Start
//!
//! ```rust
//! use methodtable::prelude::*;
//!
//! let loader = ClassLoadCoordinator::new();
//! let foo = ClassId::new(2);
//! let qux = ClassId::new(3);
//!
//! loader.load_class(&ClassDefinition::new(foo, "Foo").with_members(vec![
//!     RawMember::method(foo, "bar", "()V", AccessFlags::PUBLIC),
//!     RawMember::method(foo, "bar", "(I)V", AccessFlags::PUBLIC),
//!     RawMember::method(foo, "baz", "()I", AccessFlags::PUBLIC),
//! ]))?;
//! let qux = loader.load_class(&ClassDefinition::new(qux, "Qux").with_super(foo))?;
//!
//! match loader.resolve(&qux, "bar", "(I)V")? {
//!     Resolution::Found(method) => assert_eq!(method.declaring_class, foo),
//!     other => panic!("unexpected {other:?}"),
//! }
//! assert!(loader.resolve(&qux, "bar", "(J)V")?.is_not_found());
//! # Ok::<(), methodtable::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata`] - identities, access flags, descriptors, member records, the table builder
//!   and the resolver
//! - [`module`] - the module read graph, access checks and `--add-reads` handling
//! - [`loader`] - the load coordinator and its configuration
//! - [`Error`] and [`Result`] - error handling
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: table publication, redefinition and unloading at
//! `debug`, failed builds at `warn`, per-table sort statistics at `trace`. Install any logger
//! implementation to see them.
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Result). A member that does not exist is
//! not an error, resolution reports it as [`Resolution::NotFound`]:
//!
//! ```rust
//! use methodtable::{ClassDefinition, ClassId, ClassLoadCoordinator, Error};
//!
//! let loader = ClassLoadCoordinator::new();
//! match loader.redefine_class(&ClassDefinition::new(ClassId::new(7), "Gone")) {
//!     Err(Error::ClassNotLoaded(class)) => assert_eq!(class, ClassId::new(7)),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```
#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use methodtable::prelude::*;
///
/// let graph = ModuleReadGraph::new();
/// let m = graph.define_module("m")?;
/// assert!(graph.can_read(m, ModuleId::UNNAMED)?);
/// # Ok::<(), methodtable::Error>(())
/// ```
pub mod prelude;

/// Class metadata: identities, flags, descriptors, member tables and resolution
///
/// # Key Components
///
/// - [`metadata::table::MethodTableBuilder`] - builds a sorted, duplicate-free table
/// - [`metadata::table::ClassMetadataTable`] - binary-searchable members of one class
/// - [`metadata::resolver::MethodResolver`] - lookup along the superclass chain
/// - [`metadata::descriptor`] - descriptor grammar used for validation
pub mod metadata;

/// Module readability and member access checks
pub mod module;

/// Class load coordination, redefinition and unloading
pub mod loader;

/// `methodtable` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `methodtable` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;

pub use loader::{
    ClassDefinition, ClassHandle, ClassLoadCoordinator, ClassState, LoaderConfig, LoaderStats,
};
pub use metadata::{
    descriptor::{FieldType, MethodDescriptor},
    flags::AccessFlags,
    member::{MemberKey, MemberKind, MemberRecord, MemberRecordRc, RawMember},
    resolver::{MethodResolver, Resolution, TableSource},
    table::{BuildStats, ClassMetadataTable, ClassMetadataTableRc, MethodTableBuilder, SortStrategy},
    token::{ClassId, LoaderId, ModuleId},
};
pub use module::{
    AccessChecker, AddReadsOption, AddReadsOptions, FriendPolicy, ModuleReadGraph, NoFriends,
};
