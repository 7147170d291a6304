//! Member resolution along the superclass chain.
//!
//! The [`MethodResolver`] binary-searches the table of the start class and, on a miss, walks
//! the superclass chain iteratively, fetching each superclass table from a [`TableSource`].
//! The walk is bounded by [`crate::LoaderConfig::max_hierarchy_depth`] so that a circular
//! hierarchy is reported as [`crate::Error::CyclicHierarchy`] instead of looping forever.
//!
//! Resolution takes no locks: the start class comes from a [`ClassHandle`] snapshot and every
//! superclass table is an `Arc` cloned out of the source's current publications.

use crate::{
    loader::{ClassHandle, MAX_HIERARCHY_DEPTH},
    metadata::{
        member::{MemberKind, MemberRecordRc},
        table::ClassMetadataTableRc,
        token::{ClassId, ModuleId},
    },
    module::AccessChecker,
    Error::{CyclicHierarchy, MissingSuperclass},
    Result,
};

/// Provides the currently published table of a class.
///
/// Implemented by [`crate::ClassLoadCoordinator`]; any other registry of published tables
/// can be plugged into a [`MethodResolver`] the same way.
pub trait TableSource {
    /// The currently published table for `class`, if any
    fn published(&self, class: ClassId) -> Option<ClassMetadataTableRc>;
}

/// Outcome of a lookup. A missing member is a result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The member, declared by the start class or one of its superclasses
    Found(MemberRecordRc),
    /// The member exists but the requesting module may not access it
    Inaccessible(MemberRecordRc),
    /// No class in the chain declares a matching member
    NotFound,
}

impl Resolution {
    /// The member if it was found and is accessible
    #[must_use]
    pub fn found(&self) -> Option<&MemberRecordRc> {
        match self {
            Resolution::Found(member) => Some(member),
            Resolution::Inaccessible(_) | Resolution::NotFound => None,
        }
    }

    /// Returns true for [`Resolution::NotFound`]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Resolution::NotFound)
    }
}

/// Resolves `(name, descriptor)` pairs against a class and its superclasses
pub struct MethodResolver<'a, S: TableSource + ?Sized> {
    source: &'a S,
    max_depth: usize,
}

impl<'a, S: TableSource + ?Sized> MethodResolver<'a, S> {
    /// Create a new resolver over the given source
    ///
    /// ## Arguments
    /// * 'source' - Where superclass tables are looked up
    pub fn new(source: &'a S) -> Self {
        MethodResolver {
            source,
            max_depth: MAX_HIERARCHY_DEPTH,
        }
    }

    /// Set the maximum superclass walk depth
    ///
    /// ## Arguments
    /// * 'depth' - Number of superclass hops after which the hierarchy is treated as cyclic
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Resolve a method by exact name and descriptor, starting at `start`
    ///
    /// # Errors
    /// Returns an error if:
    /// - The superclass chain is longer than the maximum depth (cyclic hierarchy)
    /// - A superclass in the chain has no published table
    pub fn resolve(&self, start: &ClassHandle, name: &str, descriptor: &str) -> Result<Resolution> {
        self.walk(start, MemberKind::Method, name, descriptor)
    }

    /// Resolve a field by exact name and descriptor, starting at `start`
    ///
    /// # Errors
    /// Same conditions as [`MethodResolver::resolve`].
    pub fn resolve_field(
        &self,
        start: &ClassHandle,
        name: &str,
        descriptor: &str,
    ) -> Result<Resolution> {
        self.walk(start, MemberKind::Field, name, descriptor)
    }

    /// Resolve a method and check that `requesting` may access it
    ///
    /// ## Arguments
    /// * 'checker'    - Access checker over the module read graph
    /// * 'requesting' - Module of the calling code
    /// * 'start'      - Class the lookup starts at
    /// * 'name'       - Method name
    /// * 'descriptor' - Method descriptor
    ///
    /// # Errors
    /// Returns the resolution errors of [`MethodResolver::resolve`], and
    /// [`crate::Error::InvalidArgument`] if a module involved is null or not registered.
    pub fn resolve_accessible(
        &self,
        checker: &AccessChecker<'_>,
        requesting: ModuleId,
        start: &ClassHandle,
        name: &str,
        descriptor: &str,
    ) -> Result<Resolution> {
        match self.resolve(start, name, descriptor)? {
            Resolution::Found(member) => {
                if checker.can_access(requesting, &member)? {
                    Ok(Resolution::Found(member))
                } else {
                    Ok(Resolution::Inaccessible(member))
                }
            }
            other => Ok(other),
        }
    }

    fn walk(
        &self,
        start: &ClassHandle,
        kind: MemberKind,
        name: &str,
        descriptor: &str,
    ) -> Result<Resolution> {
        let mut table = start.table().clone();
        let mut depth = 0;

        loop {
            let member = match kind {
                MemberKind::Method => table.find_method(name, descriptor),
                MemberKind::Field => table.find_field(name, descriptor),
            };
            if let Some(member) = member {
                return Ok(Resolution::Found(member.clone()));
            }

            let Some(super_class) = table.super_class else {
                return Ok(Resolution::NotFound);
            };

            depth += 1;
            if depth > self.max_depth {
                return Err(CyclicHierarchy {
                    class: start.id(),
                    depth: self.max_depth,
                });
            }

            table = match self.source.published(super_class) {
                Some(parent) => parent,
                None => {
                    return Err(MissingSuperclass {
                        class: table.class,
                        superclass: super_class,
                    })
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use super::*;
    use crate::{
        metadata::{flags::AccessFlags, member::RawMember, table::ClassMetadataTable},
        test::foo_members,
        Error, MethodTableBuilder,
    };

    struct Tables(HashMap<ClassId, ClassMetadataTableRc>);

    impl TableSource for Tables {
        fn published(&self, class: ClassId) -> Option<ClassMetadataTableRc> {
            self.0.get(&class).cloned()
        }
    }

    fn table(
        class: u32,
        super_class: Option<u32>,
        raw: &[RawMember],
    ) -> Arc<ClassMetadataTable> {
        Arc::new(
            MethodTableBuilder::new(ClassId::new(class), format!("C{class}"))
                .with_super(super_class.map(ClassId::new))
                .build(raw)
                .unwrap(),
        )
    }

    fn source(tables: &[Arc<ClassMetadataTable>]) -> Tables {
        Tables(tables.iter().map(|t| (t.class, t.clone())).collect())
    }

    #[test]
    fn inherited_lookup() {
        let foo = table(1, None, &foo_members(ClassId::new(1)));
        let qux = table(
            2,
            Some(1),
            &[RawMember::method(ClassId::new(2), "qux", "()V", AccessFlags::PUBLIC)],
        );
        let tables = source(&[foo.clone(), qux.clone()]);
        let resolver = MethodResolver::new(&tables);
        let start = ClassHandle::new(qux);

        let found = resolver.resolve(&start, "bar", "(I)V").unwrap();
        let member = found.found().unwrap();
        assert_eq!(member.declaring_class, ClassId::new(1));
        assert!(Arc::ptr_eq(member, foo.find_method("bar", "(I)V").unwrap()));

        assert!(resolver
            .resolve(&start, "qux", "()V")
            .unwrap()
            .found()
            .is_some());
        assert!(resolver
            .resolve(&start, "missing", "()V")
            .unwrap()
            .is_not_found());
        assert!(resolver
            .resolve(&start, "bar", "(J)V")
            .unwrap()
            .is_not_found());
    }

    #[test]
    fn fields_resolve_separately() {
        let base = table(
            1,
            None,
            &[RawMember::field(ClassId::new(1), "count", "I", AccessFlags::PROTECTED)],
        );
        let derived = table(2, Some(1), &[]);
        let tables = source(&[base, derived.clone()]);
        let resolver = MethodResolver::new(&tables);
        let start = ClassHandle::new(derived);

        assert!(resolver
            .resolve_field(&start, "count", "I")
            .unwrap()
            .found()
            .is_some());
        assert!(resolver.resolve(&start, "count", "I").unwrap().is_not_found());
    }

    #[test]
    fn cycle_detected() {
        let a = table(1, Some(2), &[]);
        let b = table(2, Some(1), &[]);
        let tables = source(&[a.clone(), b]);
        let resolver = MethodResolver::new(&tables).with_max_depth(16);

        match resolver.resolve(&ClassHandle::new(a), "run", "()V") {
            Err(Error::CyclicHierarchy { class, depth }) => {
                assert_eq!(class, ClassId::new(1));
                assert_eq!(depth, 16);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn self_cycle_detected_with_default_depth() {
        let a = table(1, Some(1), &[]);
        let tables = source(&[a.clone()]);
        let resolver = MethodResolver::new(&tables);
        assert!(matches!(
            resolver.resolve(&ClassHandle::new(a), "run", "()V"),
            Err(Error::CyclicHierarchy { .. })
        ));
    }

    #[test]
    fn deep_but_finite_hierarchy() {
        let mut tables = vec![table(
            1,
            None,
            &[RawMember::method(ClassId::new(1), "root", "()V", AccessFlags::PUBLIC)],
        )];
        for class in 2..=500 {
            tables.push(table(class, Some(class - 1), &[]));
        }
        let leaf = tables.last().unwrap().clone();
        let tables = source(&tables);

        let resolver = MethodResolver::new(&tables);
        let found = resolver.resolve(&ClassHandle::new(leaf.clone()), "root", "()V");
        assert!(found.unwrap().found().is_some());

        let shallow = MethodResolver::new(&tables).with_max_depth(100);
        assert!(matches!(
            shallow.resolve(&ClassHandle::new(leaf), "root", "()V"),
            Err(Error::CyclicHierarchy { .. })
        ));
    }

    #[test]
    fn missing_superclass() {
        let orphan = table(5, Some(4), &[]);
        let tables = source(&[orphan.clone()]);
        let resolver = MethodResolver::new(&tables);
        match resolver.resolve(&ClassHandle::new(orphan), "run", "()V") {
            Err(Error::MissingSuperclass { class, superclass }) => {
                assert_eq!(class, ClassId::new(5));
                assert_eq!(superclass, ClassId::new(4));
            }
            other => panic!("expected missing superclass, got {other:?}"),
        }
    }
}
