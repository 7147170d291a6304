//! Loader configuration
//!
//! Tunables for table construction and resolution. The configuration is a plain `Copy`
//! value handed to the [`crate::ClassLoadCoordinator`], which passes it on to every
//! [`crate::MethodTableBuilder`] and [`crate::MethodResolver`] it creates.

/// Maximum superclass walk depth, bounded by the 16-bit constant pool index of the class file
/// format
pub const MAX_HIERARCHY_DEPTH: usize = u16::MAX as usize;

/// Member count from which sorting switches to the parallel strategy
pub const DEFAULT_PARALLEL_SORT_THRESHOLD: usize = 65_536;

/// Configuration for class loading and member resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Validate member descriptors and visibility flags while building tables
    pub validate_members: bool,

    /// Refuse to load a class before its superclass has been published
    pub require_loaded_superclass: bool,

    /// Sort member sequences of at least this length on the rayon pool
    pub parallel_sort_threshold: usize,

    /// Depth after which a superclass walk is treated as cyclic (default: 65535)
    pub max_hierarchy_depth: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            validate_members: true,
            require_loaded_superclass: false,
            parallel_sort_threshold: DEFAULT_PARALLEL_SORT_THRESHOLD,
            max_hierarchy_depth: MAX_HIERARCHY_DEPTH,
        }
    }
}

impl LoaderConfig {
    /// Trust the parser: skip member validation and accept classes in any order
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            validate_members: false,
            require_loaded_superclass: false,
            ..Self::default()
        }
    }

    /// Validate members and require superclasses to be loaded first
    #[must_use]
    pub fn strict() -> Self {
        Self {
            validate_members: true,
            require_loaded_superclass: true,
            ..Self::default()
        }
    }

    /// Override the parallel sort threshold
    #[must_use]
    pub fn with_parallel_sort_threshold(mut self, threshold: usize) -> Self {
        self.parallel_sort_threshold = threshold;
        self
    }

    /// Override the maximum hierarchy depth
    #[must_use]
    pub fn with_max_hierarchy_depth(mut self, depth: usize) -> Self {
        self.max_hierarchy_depth = depth;
        self
    }
}
