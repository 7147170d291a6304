//! Sorted per-class member tables.
//!
//! A [`ClassMetadataTable`] holds the methods and fields declared by exactly one class, each
//! in its own sequence sorted by [`MemberKey`] (name, then descriptor). Tables are produced by
//! the [`MethodTableBuilder`] and are never mutated afterwards: redefining a class builds a new
//! table and publishes it in place of the old one.
//!
//! # Key Components
//!
//! - [`ClassMetadataTable`] - Immutable, binary-searchable member storage for one class
//! - [`MethodTableBuilder`] - O(n log n) construction with duplicate rejection
//! - [`BuildStats`] / [`SortStrategy`] - What the builder did, for diagnostics and benchmarks
//!
//! # Lookup Complexity
//!
//! | Operation | Cost |
//! |-----------|------|
//! | [`ClassMetadataTable::find_method`] | O(log n) |
//! | [`ClassMetadataTable::find_field`] | O(log n) |
//! | [`ClassMetadataTable::methods_named`] | O(log n) |
//! | [`ClassMetadataTable::method_by_idnum`] | O(1) |

mod builder;

use std::sync::Arc;

use strum::{Display, EnumIter};

pub use builder::MethodTableBuilder;

use crate::metadata::{
    member::{MemberKey, MemberRecordRc},
    token::{ClassId, LoaderId, ModuleId},
};

/// Reference to a `ClassMetadataTable`
pub type ClassMetadataTableRc = Arc<ClassMetadataTable>;

/// How the builder brought a member sequence into order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum SortStrategy {
    /// Input was already strictly ascending, no sort performed
    Presorted,
    /// Input was strictly descending and was reversed in place
    Reversed,
    /// Comparison sort on the calling thread
    Sequential,
    /// Comparison sort on the rayon pool
    Parallel,
}

/// Observability data recorded while building a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    /// Number of raw members processed
    pub members: usize,
    /// Number of methods in the table
    pub methods: usize,
    /// Number of fields in the table
    pub fields: usize,
    /// Strategy used for the method sequence
    pub method_strategy: SortStrategy,
    /// Strategy used for the field sequence
    pub field_strategy: SortStrategy,
}

/// The sorted, searchable collection of one class's members.
pub struct ClassMetadataTable {
    /// The class this table belongs to
    pub class: ClassId,
    /// Binary name of the class
    pub name: String,
    /// Direct superclass, `None` for the hierarchy root
    pub super_class: Option<ClassId>,
    /// Module the class is defined in
    pub module: ModuleId,
    /// Defining loader
    pub loader: LoaderId,
    /// Number of redefinitions that preceded this table
    pub version: u32,
    methods: Vec<MemberRecordRc>,
    fields: Vec<MemberRecordRc>,
    stats: BuildStats,
}

impl ClassMetadataTable {
    /// Binary search a method by exact name and descriptor
    #[must_use]
    pub fn find_method(&self, name: &str, descriptor: &str) -> Option<&MemberRecordRc> {
        search(&self.methods, name, descriptor)
    }

    /// Binary search a field by exact name and descriptor
    #[must_use]
    pub fn find_field(&self, name: &str, descriptor: &str) -> Option<&MemberRecordRc> {
        search(&self.fields, name, descriptor)
    }

    /// All methods sharing `name`, i.e. the overload set, ordered by descriptor
    #[must_use]
    pub fn methods_named(&self, name: &str) -> &[MemberRecordRc] {
        let start = self
            .methods
            .partition_point(|m| m.name.as_bytes() < name.as_bytes());
        let len = self.methods[start..].partition_point(|m| m.name == name);
        &self.methods[start..start + len]
    }

    /// Method at sorted position `idnum`
    #[must_use]
    pub fn method_by_idnum(&self, idnum: u32) -> Option<&MemberRecordRc> {
        self.methods.get(idnum as usize)
    }

    /// All methods in sorted order
    #[must_use]
    pub fn methods(&self) -> &[MemberRecordRc] {
        &self.methods
    }

    /// All fields in sorted order
    #[must_use]
    pub fn fields(&self) -> &[MemberRecordRc] {
        &self.fields
    }

    /// Total number of members
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len() + self.fields.len()
    }

    /// Returns true if the class declares no members
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// What the builder did to produce this table
    #[must_use]
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }
}

fn search<'a>(
    members: &'a [MemberRecordRc],
    name: &str,
    descriptor: &str,
) -> Option<&'a MemberRecordRc> {
    let key = MemberKey::new(name, descriptor);
    members
        .binary_search_by(|member| member.key().cmp(&key))
        .ok()
        .map(|index| &members[index])
}
