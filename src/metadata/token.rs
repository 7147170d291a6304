//! Identity tokens for classes, modules and defining loaders.
//!
//! All three identifiers are plain 32-bit values handed out by the external class-file
//! parser (classes, loaders) or by the [`crate::ModuleReadGraph`] (modules). The value `0`
//! is reserved as the null identity for each kind.

use std::fmt;

macro_rules! identity_token {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl $name {
            /// The null identity
            pub const NULL: $name = $name(0);

            /// Creates a new identity from a raw 32-bit value
            #[must_use]
            pub const fn new(value: u32) -> Self {
                $name(value)
            }

            /// Returns the raw value
            #[must_use]
            pub fn value(&self) -> u32 {
                self.0
            }

            /// Returns true if this is the null identity (value 0)
            #[must_use]
            pub fn is_null(&self) -> bool {
                self.0 == 0
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                $name(value)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "(0x{:08x})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

identity_token!(
    /// Identity of a class, as assigned by the class-file parser.
    ClassId,
    "class"
);

identity_token!(
    /// Identity of a module registered in a [`crate::ModuleReadGraph`].
    ///
    /// [`ModuleId::UNNAMED`] is always registered and stands for all code outside the
    /// module system (`ALL-UNNAMED`).
    ModuleId,
    "module"
);

identity_token!(
    /// Identity of a defining class loader. Unloading a loader unloads every class it defined.
    LoaderId,
    "loader"
);

impl ModuleId {
    /// The distinguished unnamed module, readable by and reading every module
    pub const UNNAMED: ModuleId = ModuleId(1);
}

impl LoaderId {
    /// The bootstrap loader
    pub const BOOT: LoaderId = LoaderId(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_identities() {
        assert!(ClassId::NULL.is_null());
        assert!(ModuleId::NULL.is_null());
        assert!(LoaderId::NULL.is_null());
        assert!(!ModuleId::UNNAMED.is_null());
        assert!(!ClassId::new(7).is_null());
    }

    #[test]
    fn formatting() {
        assert_eq!(format!("{}", ClassId::new(42)), "class#42");
        assert_eq!(format!("{:?}", ModuleId::new(0x10)), "ModuleId(0x00000010)");
        assert_eq!(u32::from(LoaderId::from(3)), 3);
    }
}
