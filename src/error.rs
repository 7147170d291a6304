use thiserror::Error;

use crate::metadata::token::ClassId;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Errors abort only the operation in progress: a failed build leaves every other class's
/// published table untouched, and a failed resolution has no side effects at all. A lookup
/// that simply finds nothing is *not* an error, see [`crate::metadata::resolver::Resolution`].
///
/// # Error Categories
///
/// ## Table Construction Errors
/// - [`Error::DuplicateMember`] - Two members of one class share a `(name, descriptor)` key
/// - [`Error::InvalidDescriptor`] - A member descriptor is not a valid JVM descriptor
/// - [`Error::Malformed`] - Structurally inconsistent class metadata
///
/// ## Resolution Errors
/// - [`Error::CyclicHierarchy`] - The superclass walk exceeded the maximum depth
/// - [`Error::MissingSuperclass`] - A superclass is referenced but not published
///
/// ## Module Errors
/// - [`Error::InvalidArgument`] - Null or unregistered module passed to a module operation
///
/// ## Loader Errors
/// - [`Error::ClassNotLoaded`] - Operation requires a published class
///
/// # Examples
///
/// ```rust
/// use methodtable::{Error, ModuleReadGraph, ModuleId};
///
/// let graph = ModuleReadGraph::new();
/// match graph.add_reads(ModuleId::NULL, ModuleId::UNNAMED) {
///     Err(Error::InvalidArgument(message)) => println!("rejected: {message}"),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The class metadata is inconsistent and could not be turned into a table.
    ///
    /// Includes the source location where the malformation was detected.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Two members of the same kind share an identical `(name, descriptor)` key.
    ///
    /// Fatal to the load of that class only.
    #[error("Duplicate member in class {class} - {name}{descriptor}")]
    DuplicateMember {
        /// The class whose table was being built
        class: ClassId,
        /// Name of the offending member
        name: String,
        /// Descriptor of the offending member
        descriptor: String,
    },

    /// A member descriptor could not be parsed.
    #[error("Invalid descriptor for member {name} - '{descriptor}': {reason}")]
    InvalidDescriptor {
        /// Name of the offending member
        name: String,
        /// The descriptor as found in the input
        descriptor: String,
        /// What the parser rejected
        reason: String,
    },

    /// The superclass walk starting at `class` exceeded the maximum permitted depth.
    ///
    /// Signals a malformed, most likely circular, class hierarchy.
    #[error("Cyclic class hierarchy starting at {class} - walk exceeded depth {depth}")]
    CyclicHierarchy {
        /// The class the walk started from
        class: ClassId,
        /// The depth limit that was exceeded
        depth: usize,
    },

    /// A class names a superclass that has no published table.
    #[error("Superclass {superclass} of {class} is not loaded")]
    MissingSuperclass {
        /// The class whose parent is missing
        class: ClassId,
        /// The referenced superclass
        superclass: ClassId,
    },

    /// A null or unresolved argument was passed to a module operation.
    ///
    /// Recoverable: the request is rejected and no state is mutated.
    #[error("Invalid argument - {0}")]
    InvalidArgument(String),

    /// The class has no published table.
    #[error("Class {0} is not loaded")]
    ClassNotLoaded(ClassId),
}
