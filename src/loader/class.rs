//! Class definitions, handles and lifecycle states.

use std::sync::atomic::{AtomicU8, Ordering};

use strum::{Display, EnumIter};

use crate::metadata::{
    member::RawMember,
    table::{ClassMetadataTable, ClassMetadataTableRc},
    token::{ClassId, LoaderId, ModuleId},
};

/// Lifecycle of one class identity
///
/// `Unloaded -> Building -> Published`, then either back to `Unloaded` when the defining
/// loader goes away, or through `Building` again on redefinition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[repr(u8)]
pub enum ClassState {
    /// No table is published
    Unloaded = 0,
    /// A table is being built; the previous one, if any, is still published
    Building = 1,
    /// A fully built table is published
    Published = 2,
}

impl ClassState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ClassState::Building,
            2 => ClassState::Published,
            _ => ClassState::Unloaded,
        }
    }
}

/// Atomic cell holding a [`ClassState`]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new() -> Self {
        StateCell(AtomicU8::new(ClassState::Unloaded as u8))
    }

    pub(crate) fn get(&self) -> ClassState {
        ClassState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: ClassState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

/// Parsed class metadata handed to the coordinator by the class-file parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDefinition {
    /// Identity of the class
    pub class: ClassId,
    /// Binary name
    pub name: String,
    /// Direct superclass, `None` for the hierarchy root
    pub super_class: Option<ClassId>,
    /// Module the class belongs to
    pub module: ModuleId,
    /// Defining loader
    pub loader: LoaderId,
    /// Declared members in class-file order
    pub members: Vec<RawMember>,
}

impl ClassDefinition {
    /// A root class without members in the unnamed module of the boot loader
    pub fn new(class: ClassId, name: impl Into<String>) -> Self {
        ClassDefinition {
            class,
            name: name.into(),
            super_class: None,
            module: ModuleId::UNNAMED,
            loader: LoaderId::BOOT,
            members: Vec::new(),
        }
    }

    /// Set the direct superclass
    #[must_use]
    pub fn with_super(mut self, super_class: ClassId) -> Self {
        self.super_class = Some(super_class);
        self
    }

    /// Set the module
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

    /// Set the declared members
    #[must_use]
    pub fn with_members(mut self, members: Vec<RawMember>) -> Self {
        self.members = members;
        self
    }
}

/// A published class, pinned to the table that was current when the handle was taken.
///
/// Redefinition publishes a new table without touching the one a handle refers to, so
/// lookups through an old handle stay consistent. Take a fresh handle from the
/// [`crate::ClassLoadCoordinator`] to observe a redefinition.
#[derive(Clone)]
pub struct ClassHandle {
    table: ClassMetadataTableRc,
}

impl ClassHandle {
    /// Wrap a table
    pub fn new(table: ClassMetadataTableRc) -> Self {
        ClassHandle { table }
    }

    /// Identity of the class
    #[must_use]
    pub fn id(&self) -> ClassId {
        self.table.class
    }

    /// Binary name of the class
    #[must_use]
    pub fn name(&self) -> &str {
        &self.table.name
    }

    /// Direct superclass
    #[must_use]
    pub fn super_class(&self) -> Option<ClassId> {
        self.table.super_class
    }

    /// The table this handle is pinned to
    #[must_use]
    pub fn table(&self) -> &ClassMetadataTableRc {
        &self.table
    }
}

impl std::ops::Deref for ClassHandle {
    type Target = ClassMetadataTable;

    fn deref(&self) -> &Self::Target {
        &self.table
    }
}

impl std::fmt::Debug for ClassHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassHandle")
            .field("class", &self.table.class)
            .field("name", &self.table.name)
            .field("version", &self.table.version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn state_cell_round_trips_every_state() {
        let cell = StateCell::new();
        assert_eq!(cell.get(), ClassState::Unloaded);
        for state in ClassState::iter() {
            cell.set(state);
            assert_eq!(cell.get(), state);
        }
    }

    #[test]
    fn definition_builder() {
        let def = ClassDefinition::new(ClassId::new(3), "Qux")
            .with_super(ClassId::new(2))
            .with_module(ModuleId::new(4))
            .with_loader(LoaderId::new(5));
        assert_eq!(def.super_class, Some(ClassId::new(2)));
        assert_eq!(def.module, ModuleId::new(4));
        assert_eq!(def.loader, LoaderId::new(5));
        assert!(def.members.is_empty());
    }
}
