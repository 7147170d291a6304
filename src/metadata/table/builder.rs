//! Construction of [`ClassMetadataTable`]s from raw parser output.
//!
//! The builder partitions the raw members into methods and fields, validates them, sorts each
//! sequence by [`MemberKey`] and rejects duplicate keys. Sorting is O(n log n) for every input
//! order: strictly ascending and strictly descending input is recognised in a single linear
//! scan, everything else goes through an unstable comparison sort, on the rayon pool once the
//! sequence is large enough.
//!
//! # Examples
//!
//! ```rust
//! use methodtable::{AccessFlags, ClassId, MethodTableBuilder, RawMember, SortStrategy};
//!
//! let foo = ClassId::new(2);
//! let raw = vec![
//!     RawMember::method(foo, "baz", "()I", AccessFlags::PUBLIC),
//!     RawMember::method(foo, "bar", "(I)V", AccessFlags::PUBLIC),
//!     RawMember::method(foo, "bar", "()V", AccessFlags::PUBLIC),
//! ];
//!
//! let table = MethodTableBuilder::new(foo, "Foo").build(&raw)?;
//! assert_eq!(table.methods()[0].descriptor, "()V");
//! assert_eq!(table.stats().method_strategy, SortStrategy::Reversed);
//! # Ok::<(), methodtable::Error>(())
//! ```

use std::sync::Arc;

use log::trace;
use rayon::prelude::*;

use crate::{
    loader::LoaderConfig,
    metadata::{
        descriptor::{FieldType, MethodDescriptor},
        member::{MemberKey, MemberKind, MemberRecord, MemberRecordRc, RawMember},
        table::{BuildStats, ClassMetadataTable, SortStrategy},
        token::{ClassId, LoaderId, ModuleId},
    },
    Error, Result,
};

/// Builds the immutable member table of one class.
///
/// The builder is configured with the identity of the class being defined; the raw members
/// passed to [`MethodTableBuilder::build`] must all declare that class.
pub struct MethodTableBuilder {
    class: ClassId,
    name: String,
    super_class: Option<ClassId>,
    module: ModuleId,
    loader: LoaderId,
    version: u32,
    config: LoaderConfig,
}

impl MethodTableBuilder {
    /// Create a builder for `class`, placed in the unnamed module of the boot loader
    ///
    /// ## Arguments
    /// * 'class' - Identity of the class being defined
    /// * 'name'  - Binary name of the class
    pub fn new(class: ClassId, name: impl Into<String>) -> Self {
        MethodTableBuilder {
            class,
            name: name.into(),
            super_class: None,
            module: ModuleId::UNNAMED,
            loader: LoaderId::BOOT,
            version: 0,
            config: LoaderConfig::default(),
        }
    }

    /// Set the direct superclass
    #[must_use]
    pub fn with_super(mut self, super_class: Option<ClassId>) -> Self {
        self.super_class = super_class;
        self
    }

    /// Set the module the class is defined in
    #[must_use]
    pub fn with_module(mut self, module: ModuleId) -> Self {
        self.module = module;
        self
    }

    /// Set the defining loader
    #[must_use]
    pub fn with_loader(mut self, loader: LoaderId) -> Self {
        self.loader = loader;
        self
    }

    /// Set the redefinition count recorded in the table
    #[must_use]
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Set the configuration
    #[must_use]
    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the table from the parser's unordered member list.
    ///
    /// `raw` is not modified.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The class identity is null, or a member declares a different class
    /// - Member validation is enabled and a descriptor or visibility is invalid
    /// - Two methods, or two fields, share the same `(name, descriptor)` key
    pub fn build(&self, raw: &[RawMember]) -> Result<ClassMetadataTable> {
        if self.class.is_null() {
            return Err(malformed_error!("Class '{}' has a null identity", self.name));
        }

        let mut methods = Vec::new();
        let mut fields = Vec::new();
        for member in raw {
            if member.declaring_class != self.class {
                return Err(malformed_error!(
                    "Member {}{} of {} declares {}",
                    member.name,
                    member.descriptor,
                    self.class,
                    member.declaring_class
                ));
            }
            if self.config.validate_members {
                validate(member)?;
            }
            match member.kind {
                MemberKind::Method => methods.push(member),
                MemberKind::Field => fields.push(member),
            }
        }

        let method_strategy = self.sort(&mut methods);
        self.reject_duplicates(&methods)?;
        let field_strategy = self.sort(&mut fields);
        self.reject_duplicates(&fields)?;

        trace!(
            "{} ({}): {} methods via {}, {} fields via {}",
            self.name,
            self.class,
            methods.len(),
            method_strategy,
            fields.len(),
            field_strategy
        );

        let stats = BuildStats {
            members: raw.len(),
            methods: methods.len(),
            fields: fields.len(),
            method_strategy,
            field_strategy,
        };

        Ok(ClassMetadataTable {
            class: self.class,
            name: self.name.clone(),
            super_class: self.super_class,
            module: self.module,
            loader: self.loader,
            version: self.version,
            methods: self.records(&methods)?,
            fields: self.records(&fields)?,
            stats,
        })
    }

    fn sort(&self, members: &mut [&RawMember]) -> SortStrategy {
        if members
            .windows(2)
            .all(|w| MemberKey::of_raw(w[0]) < MemberKey::of_raw(w[1]))
        {
            return SortStrategy::Presorted;
        }
        if members
            .windows(2)
            .all(|w| MemberKey::of_raw(w[0]) > MemberKey::of_raw(w[1]))
        {
            members.reverse();
            return SortStrategy::Reversed;
        }

        if members.len() >= self.config.parallel_sort_threshold {
            members.par_sort_unstable_by(|a, b| MemberKey::of_raw(a).cmp(&MemberKey::of_raw(b)));
            SortStrategy::Parallel
        } else {
            members.sort_unstable_by(|a, b| MemberKey::of_raw(a).cmp(&MemberKey::of_raw(b)));
            SortStrategy::Sequential
        }
    }

    fn reject_duplicates(&self, sorted: &[&RawMember]) -> Result<()> {
        match sorted
            .windows(2)
            .find(|w| MemberKey::of_raw(w[0]) == MemberKey::of_raw(w[1]))
        {
            Some(pair) => Err(Error::DuplicateMember {
                class: self.class,
                name: pair[1].name.clone(),
                descriptor: pair[1].descriptor.clone(),
            }),
            None => Ok(()),
        }
    }

    fn records(&self, sorted: &[&RawMember]) -> Result<Vec<MemberRecordRc>> {
        sorted
            .iter()
            .enumerate()
            .map(|(index, member)| {
                let idnum = u32::try_from(index).map_err(|_| {
                    malformed_error!("Class {} declares too many members", self.class)
                })?;
                Ok(Arc::new(MemberRecord {
                    name: member.name.clone(),
                    descriptor: member.descriptor.clone(),
                    flags: member.flags,
                    kind: member.kind,
                    declaring_class: self.class,
                    declaring_module: self.module,
                    idnum,
                }))
            })
            .collect()
    }
}

fn validate(member: &RawMember) -> Result<()> {
    if member.name.is_empty() {
        return Err(malformed_error!(
            "Member of {} has an empty name",
            member.declaring_class
        ));
    }
    if !member.flags.has_valid_visibility() {
        return Err(malformed_error!(
            "Member {}{} has conflicting visibility flags {:?}",
            member.name,
            member.descriptor,
            member.flags
        ));
    }

    let parsed = match member.kind {
        MemberKind::Method => MethodDescriptor::parse(&member.descriptor).map(|_| ()),
        MemberKind::Field => FieldType::parse(&member.descriptor).map(|_| ()),
    };
    parsed.map_err(|reason| Error::InvalidDescriptor {
        name: member.name.clone(),
        descriptor: member.descriptor.clone(),
        reason,
    })
}
