//! Class metadata representation.
//!
//! # Key Components
//!
//! - [`token`] - Identities of classes, modules and loaders
//! - [`flags`] - Member access flags
//! - [`descriptor`] - Field and method descriptor parsing
//! - [`member`] - Raw parser output and the published member records
//! - [`table`] - Sorted per-class member tables and their builder
//! - [`resolver`] - Lookup along the superclass chain

/// Field and method descriptor grammar
pub mod descriptor;
/// Access flags of members
pub mod flags;
/// Raw and published member representations
pub mod member;
/// Member resolution along the superclass chain
pub mod resolver;
/// Sorted member tables
pub mod table;
/// Identities of classes, modules and loaders
pub mod token;
