//! JVM access flags shared by methods and fields.
//!
//! Methods and fields use overlapping bit assignments (`0x0040` is `BRIDGE` on a method and
//! `VOLATILE` on a field), so a single bitset is stored on every [`crate::MemberRecord`] and
//! the kind-specific aliases are provided as associated constants.

use bitflags::bitflags;

/// Bitmask for the visibility bits
pub const ACCESS_VISIBILITY_MASK: u16 = 0x0007;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Member access flags (JVMS §4.5, §4.6)
    pub struct AccessFlags: u16 {
        /// Accessible from outside its package
        const PUBLIC = 0x0001;
        /// Accessible only within the defining class
        const PRIVATE = 0x0002;
        /// Accessible within subclasses
        const PROTECTED = 0x0004;
        /// Static member
        const STATIC = 0x0008;
        /// No overriding (method) or no assignment after construction (field)
        const FINAL = 0x0010;
        /// Invocation is wrapped by a monitor use
        const SYNCHRONIZED = 0x0020;
        /// Compiler-generated bridge method
        const BRIDGE = 0x0040;
        /// Declared with variable number of arguments
        const VARARGS = 0x0080;
        /// Implemented in a language other than Java
        const NATIVE = 0x0100;
        /// No implementation is provided
        const ABSTRACT = 0x0400;
        /// Floating-point mode is FP-strict
        const STRICT = 0x0800;
        /// Not present in the source code
        const SYNTHETIC = 0x1000;
        /// Element of an enum class
        const ENUM = 0x4000;
    }
}

impl AccessFlags {
    /// Field alias of [`AccessFlags::BRIDGE`]
    pub const VOLATILE: AccessFlags = AccessFlags::BRIDGE;
    /// Field alias of [`AccessFlags::VARARGS`]
    pub const TRANSIENT: AccessFlags = AccessFlags::VARARGS;

    /// Extract the flags from a raw `access_flags` value, dropping unknown bits
    #[must_use]
    pub fn from_raw(flags: u16) -> Self {
        Self::from_bits_truncate(flags)
    }

    /// Returns true for `ACC_PUBLIC` members
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.contains(AccessFlags::PUBLIC)
    }

    /// Returns true for `ACC_STATIC` members
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.contains(AccessFlags::STATIC)
    }

    /// A well-formed member carries at most one of `PUBLIC`, `PRIVATE` and `PROTECTED`
    #[must_use]
    pub fn has_valid_visibility(&self) -> bool {
        (self.bits() & ACCESS_VISIBILITY_MASK).count_ones() <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility() {
        assert!(AccessFlags::from_raw(0x0009).is_public());
        assert!(AccessFlags::from_raw(0x0009).is_static());
        assert!(!AccessFlags::PRIVATE.is_public());

        assert!(AccessFlags::empty().has_valid_visibility());
        assert!((AccessFlags::PROTECTED | AccessFlags::FINAL).has_valid_visibility());
        assert!(!(AccessFlags::PUBLIC | AccessFlags::PRIVATE).has_valid_visibility());
    }

    #[test]
    fn unknown_bits_are_dropped() {
        let flags = AccessFlags::from_raw(0xFFFF);
        assert!(flags.contains(AccessFlags::ENUM));
        assert_eq!(flags.bits() & 0x0200, 0);
        assert_eq!(AccessFlags::VOLATILE, AccessFlags::BRIDGE);
    }
}
