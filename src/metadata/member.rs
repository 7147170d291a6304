//! Member records: the unit stored in a [`crate::ClassMetadataTable`].
//!
//! A [`RawMember`] is what the class-file parser hands over, in declaration order and without
//! any validation. The table builder turns each one into an immutable, reference-counted
//! [`MemberRecord`] that additionally knows its declaring module and its position (`idnum`)
//! in the sorted table.

use std::{cmp::Ordering, fmt, sync::Arc};

use strum::{Display, EnumIter};

use crate::metadata::{
    flags::AccessFlags,
    token::{ClassId, ModuleId},
};

/// Reference to a `MemberRecord`
pub type MemberRecordRc = Arc<MemberRecord>;

/// Whether a member is a method or a field. The two live in separate namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum MemberKind {
    /// A method or constructor
    Method,
    /// A field
    Field,
}

/// One declared member as discovered by the class-file parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMember {
    /// Simple name (`<init>` for constructors)
    pub name: String,
    /// JVM descriptor, e.g. `(I)V` or `Ljava/lang/String;`
    pub descriptor: String,
    /// Raw access flags
    pub flags: AccessFlags,
    /// Method or field
    pub kind: MemberKind,
    /// The class the parser found this member in
    pub declaring_class: ClassId,
}

impl RawMember {
    /// Create a raw method entry
    pub fn method(
        declaring_class: ClassId,
        name: impl Into<String>,
        descriptor: impl Into<String>,
        flags: AccessFlags,
    ) -> Self {
        RawMember {
            name: name.into(),
            descriptor: descriptor.into(),
            flags,
            kind: MemberKind::Method,
            declaring_class,
        }
    }

    /// Create a raw field entry
    pub fn field(
        declaring_class: ClassId,
        name: impl Into<String>,
        descriptor: impl Into<String>,
        flags: AccessFlags,
    ) -> Self {
        RawMember {
            name: name.into(),
            descriptor: descriptor.into(),
            flags,
            kind: MemberKind::Field,
            declaring_class,
        }
    }
}

/// Immutable descriptor of one method or field declared by a class.
///
/// Shared between the table that owns it and any resolver result that returned it; a record
/// outlives a redefinition of its class for as long as someone still holds it.
#[derive(Debug, PartialEq, Eq)]
pub struct MemberRecord {
    /// Simple name
    pub name: String,
    /// JVM descriptor
    pub descriptor: String,
    /// Access flags
    pub flags: AccessFlags,
    /// Method or field
    pub kind: MemberKind,
    /// Declaring class
    pub declaring_class: ClassId,
    /// Module of the declaring class
    pub declaring_module: ModuleId,
    /// Index of this member within its sorted sequence
    pub idnum: u32,
}

impl MemberRecord {
    /// The lookup key of this member
    #[must_use]
    pub fn key(&self) -> MemberKey<'_> {
        MemberKey::new(&self.name, &self.descriptor)
    }

    /// Returns true if the record matches `name` and `descriptor` exactly
    #[must_use]
    pub fn matches(&self, name: &str, descriptor: &str) -> bool {
        self.name == name && self.descriptor == descriptor
    }
}

impl fmt::Display for MemberRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MemberKind::Method => write!(f, "{}.{}{}", self.declaring_class, self.name, self.descriptor),
            MemberKind::Field => write!(f, "{}.{}:{}", self.declaring_class, self.name, self.descriptor),
        }
    }
}

/// Total order used to sort and search member sequences: name, then descriptor, byte-wise.
///
/// Two members with equal keys are duplicates; the builder rejects them, so within one
/// published sequence the key is unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberKey<'a> {
    /// Member name
    pub name: &'a str,
    /// Member descriptor
    pub descriptor: &'a str,
}

impl<'a> MemberKey<'a> {
    /// Build a key from its parts
    #[must_use]
    pub fn new(name: &'a str, descriptor: &'a str) -> Self {
        MemberKey { name, descriptor }
    }

    /// Key of a raw parser entry
    #[must_use]
    pub fn of_raw(raw: &'a RawMember) -> Self {
        MemberKey::new(&raw.name, &raw.descriptor)
    }
}

impl Ord for MemberKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .as_bytes()
            .cmp(other.name.as_bytes())
            .then_with(|| self.descriptor.as_bytes().cmp(other.descriptor.as_bytes()))
    }
}

impl PartialOrd for MemberKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_order_is_name_then_descriptor() {
        let a = MemberKey::new("bar", "()V");
        let b = MemberKey::new("bar", "(I)V");
        let c = MemberKey::new("baz", "()I");

        assert!(a < b);
        assert!(b < c);
        assert!(a < c);
        assert_eq!(a.cmp(&MemberKey::new("bar", "()V")), Ordering::Equal);
    }

    #[test]
    fn display() {
        let record = MemberRecord {
            name: "bar".to_string(),
            descriptor: "(I)V".to_string(),
            flags: AccessFlags::PUBLIC,
            kind: MemberKind::Method,
            declaring_class: ClassId::new(2),
            declaring_module: ModuleId::UNNAMED,
            idnum: 0,
        };
        assert_eq!(record.to_string(), "class#2.bar(I)V");
        assert!(record.matches("bar", "(I)V"));
        assert!(!record.matches("bar", "()V"));

        let raw = RawMember::field(ClassId::new(2), "count", "I", AccessFlags::PRIVATE);
        assert_eq!(raw.kind, MemberKind::Field);
        assert_eq!(MemberKey::of_raw(&raw), MemberKey::new("count", "I"));
    }
}
