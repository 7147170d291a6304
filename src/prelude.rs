//! # methodtable Prelude
//!
//! The types needed to load classes, resolve members and check module access. Import this
//! module to get them all at once.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all methodtable operations
pub use crate::Error;

/// The result type used throughout methodtable
pub use crate::Result;

/// Configuration for table construction and resolution
pub use crate::LoaderConfig;

// ================================================================================================
// Identities and Members
// ================================================================================================

/// Identities of classes, modules and loaders
pub use crate::metadata::token::{ClassId, LoaderId, ModuleId};

/// Member access flags
pub use crate::metadata::flags::AccessFlags;

/// Raw and published members
pub use crate::metadata::member::{MemberKind, MemberRecord, MemberRecordRc, RawMember};

// ================================================================================================
// Tables and Resolution
// ================================================================================================

/// Table construction and lookup
pub use crate::metadata::table::{ClassMetadataTable, MethodTableBuilder, SortStrategy};

/// Superclass-chain resolution
pub use crate::metadata::resolver::{MethodResolver, Resolution, TableSource};

// ================================================================================================
// Loading and Modules
// ================================================================================================

/// Class publication
pub use crate::loader::{ClassDefinition, ClassHandle, ClassLoadCoordinator, ClassState};

/// Module readability and access checks
pub use crate::module::{AccessChecker, AddReadsOptions, ModuleReadGraph};
