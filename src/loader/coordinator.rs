//! Publication of class tables.
//!
//! The [`ClassLoadCoordinator`] owns every published [`crate::ClassMetadataTable`]. Building a
//! table happens under a per-class mutex, so two threads defining or redefining the same class
//! never build concurrently; different classes build in parallel.
//!
//! Tables live in a lock-free skip map keyed by `(class, version)`. A redefinition links the
//! entry of the new version before it unlinks the previous one, and readers take the highest
//! live version of a class. A reader therefore always sees either the old table or the new
//! one, never a partial build and never a gap.
//!
//! Resolution ([`ClassLoadCoordinator::resolve`], [`ClassLoadCoordinator::lookup_field`]) takes
//! no locks at all and may run while a redefinition of any class in the chain is in flight.
//!
//! # Examples
//!
//! ```rust
//! use methodtable::{AccessFlags, ClassDefinition, ClassId, ClassLoadCoordinator, RawMember};
//!
//! let loader = ClassLoadCoordinator::new();
//! let foo = ClassId::new(2);
//! let qux = ClassId::new(3);
//!
//! loader.load_class(&ClassDefinition::new(foo, "Foo").with_members(vec![
//!     RawMember::method(foo, "bar", "(I)V", AccessFlags::PUBLIC),
//! ]))?;
//! let handle = loader.load_class(&ClassDefinition::new(qux, "Qux").with_super(foo))?;
//!
//! let found = loader.resolve(&handle, "bar", "(I)V")?;
//! assert_eq!(found.found().unwrap().declaring_class, foo);
//! # Ok::<(), methodtable::Error>(())
//! ```

use std::{
    ops::Bound,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;
use log::{debug, warn};

use crate::{
    loader::{ClassDefinition, ClassHandle, ClassState, LoaderConfig, StateCell},
    metadata::{
        resolver::{MethodResolver, Resolution, TableSource},
        table::{ClassMetadataTableRc, MethodTableBuilder},
        token::{ClassId, LoaderId, ModuleId},
    },
    module::AccessChecker,
    Error::{ClassNotLoaded, MissingSuperclass},
    Result,
};

/// Key of one published table
type PublicationKey = (ClassId, u32);

/// Per-class build lock and lifecycle state.
///
/// A slot exists only while its class is being loaded or is published. Whoever holds
/// `building` and removes the slot from the map retires it; threads still waiting on a retired
/// slot start over with a fresh one.
struct ClassSlot {
    state: StateCell,
    building: Mutex<()>,
}

impl ClassSlot {
    fn new() -> Self {
        ClassSlot {
            state: StateCell::new(),
            building: Mutex::new(()),
        }
    }
}

/// Counters kept by a [`ClassLoadCoordinator`]
#[derive(Debug, Default)]
pub struct LoaderStats {
    loads: AtomicUsize,
    redefinitions: AtomicUsize,
    unloads: AtomicUsize,
    failures: AtomicUsize,
    members: AtomicUsize,
}

impl LoaderStats {
    /// Number of first-time publications
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    /// Number of successful redefinitions
    pub fn redefinitions(&self) -> usize {
        self.redefinitions.load(Ordering::Relaxed)
    }

    /// Number of classes removed by [`ClassLoadCoordinator::unload_loader`]
    pub fn unloads(&self) -> usize {
        self.unloads.load(Ordering::Relaxed)
    }

    /// Number of loads and redefinitions that failed to build
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// Total number of members in every table ever published
    pub fn members(&self) -> usize {
        self.members.load(Ordering::Relaxed)
    }
}

/// Builds, publishes, redefines and unloads class tables
pub struct ClassLoadCoordinator {
    config: LoaderConfig,
    published: SkipMap<PublicationKey, ClassMetadataTableRc>,
    slots: DashMap<ClassId, Arc<ClassSlot>>,
    stats: LoaderStats,
}

impl ClassLoadCoordinator {
    /// Create a coordinator with the default [`LoaderConfig`]
    pub fn new() -> Self {
        Self::with_config(LoaderConfig::default())
    }

    /// Create a coordinator with a custom configuration
    ///
    /// ## Arguments
    /// * 'config' - Validation, sorting and resolution settings
    pub fn with_config(config: LoaderConfig) -> Self {
        ClassLoadCoordinator {
            config,
            published: SkipMap::new(),
            slots: DashMap::new(),
            stats: LoaderStats::default(),
        }
    }

    /// The configuration in use
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load counters
    pub fn stats(&self) -> &LoaderStats {
        &self.stats
    }

    /// Build and publish the table of a class that is not yet loaded.
    ///
    /// If the class is already published, the existing handle is returned and `definition`
    /// is ignored: the first definer wins.
    ///
    /// ## Arguments
    /// * 'definition' - Parsed class metadata
    ///
    /// # Errors
    /// Returns the build errors of [`MethodTableBuilder::build`], or
    /// [`crate::Error::MissingSuperclass`] if [`LoaderConfig::require_loaded_superclass`] is
    /// set and the superclass has no published table. On error the class stays unloaded.
    pub fn load_class(&self, definition: &ClassDefinition) -> Result<ClassHandle> {
        let class = definition.class;
        self.with_slot(class, true, |slot| self.load_locked(slot, definition))
            .unwrap_or(Err(ClassNotLoaded(class)))
    }

    fn load_locked(&self, slot: &ClassSlot, definition: &ClassDefinition) -> Result<ClassHandle> {
        let class = definition.class;
        if let Some(existing) = self.published(class) {
            return Ok(ClassHandle::new(existing));
        }

        if self.config.require_loaded_superclass {
            if let Some(superclass) = definition.super_class {
                if self.published(superclass).is_none() {
                    self.slots.remove(&class);
                    self.stats.failures.fetch_add(1, Ordering::Relaxed);
                    return Err(MissingSuperclass { class, superclass });
                }
            }
        }

        slot.state.set(ClassState::Building);
        let table = match self.builder(definition, definition.loader, 0).build(&definition.members) {
            Ok(table) => Arc::new(table),
            Err(error) => {
                slot.state.set(ClassState::Unloaded);
                self.slots.remove(&class);
                self.stats.failures.fetch_add(1, Ordering::Relaxed);
                warn!("failed to load {} ({class}): {error}", definition.name);
                return Err(error);
            }
        };

        self.published.insert((class, table.version), table.clone());
        slot.state.set(ClassState::Published);
        self.stats.loads.fetch_add(1, Ordering::Relaxed);
        self.stats
            .members
            .fetch_add(table.len(), Ordering::Relaxed);
        debug!(
            "published {} ({class}) with {} methods and {} fields",
            table.name,
            table.methods().len(),
            table.fields().len()
        );

        Ok(ClassHandle::new(table))
    }

    /// Replace the table of a published class.
    ///
    /// The new table gets the next version number and keeps the defining loader of the
    /// current one. Handles taken before the swap keep seeing the old table; resolvers that
    /// fetch the class afterwards see the new one. If the build fails the current table stays
    /// published.
    ///
    /// # Errors
    /// Returns [`crate::Error::ClassNotLoaded`] if the class has no published table, or the
    /// build errors of [`MethodTableBuilder::build`].
    pub fn redefine_class(&self, definition: &ClassDefinition) -> Result<ClassHandle> {
        let class = definition.class;
        self.with_slot(class, false, |slot| self.redefine_locked(slot, definition))
            .unwrap_or(Err(ClassNotLoaded(class)))
    }

    fn redefine_locked(
        &self,
        slot: &ClassSlot,
        definition: &ClassDefinition,
    ) -> Result<ClassHandle> {
        let class = definition.class;
        let Some(current) = self.published(class) else {
            return Err(ClassNotLoaded(class));
        };
        let version = current.version.checked_add(1).ok_or_else(|| {
            malformed_error!("{} ({class}) has no redefinition versions left", current.name)
        })?;

        slot.state.set(ClassState::Building);
        let table = match self
            .builder(definition, current.loader, version)
            .build(&definition.members)
        {
            Ok(table) => Arc::new(table),
            Err(error) => {
                slot.state.set(ClassState::Published);
                self.stats.failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    "failed to redefine {} ({class}), keeping version {}: {error}",
                    current.name, current.version
                );
                return Err(error);
            }
        };

        // Link the new version before retiring the old one so lookups never find neither
        self.published.insert((class, version), table.clone());
        self.published.remove(&(class, current.version));
        slot.state.set(ClassState::Published);
        self.stats.redefinitions.fetch_add(1, Ordering::Relaxed);
        self.stats
            .members
            .fetch_add(table.len(), Ordering::Relaxed);
        debug!("redefined {} ({class}) as version {version}", table.name);

        Ok(ClassHandle::new(table))
    }

    /// Remove every class defined by `loader`.
    ///
    /// Handles and resolutions already taken stay valid; later lookups of the removed
    /// classes see them as unloaded. The per-class bookkeeping is released as well.
    ///
    /// # Returns
    /// The number of classes removed
    pub fn unload_loader(&self, loader: LoaderId) -> usize {
        let mut candidates: Vec<ClassId> = self
            .published
            .iter()
            .filter(|entry| entry.value().loader == loader)
            .map(|entry| entry.key().0)
            .collect();
        candidates.dedup();

        let mut removed = 0;
        for class in candidates {
            let unloaded = self.with_slot(class, false, |slot| {
                let owned = self
                    .published(class)
                    .is_some_and(|table| table.loader == loader);
                if owned {
                    self.retract(class);
                    slot.state.set(ClassState::Unloaded);
                    self.slots.remove(&class);
                }
                owned
            });
            if unloaded == Some(true) {
                removed += 1;
            }
        }

        self.stats.unloads.fetch_add(removed, Ordering::Relaxed);
        debug!("unloaded {removed} classes of {loader}");
        removed
    }

    /// Current lifecycle state of `class`
    pub fn state(&self, class: ClassId) -> ClassState {
        self.slots
            .get(&class)
            .map_or(ClassState::Unloaded, |entry| entry.value().state.get())
    }

    /// Handle on the currently published table of `class`
    pub fn handle(&self, class: ClassId) -> Option<ClassHandle> {
        self.published(class).map(ClassHandle::new)
    }

    /// Returns true if `class` has a published table
    pub fn is_loaded(&self, class: ClassId) -> bool {
        self.published(class).is_some()
    }

    /// Number of published classes
    pub fn class_count(&self) -> usize {
        let mut count = 0;
        let mut last = None;
        for entry in self.published.iter() {
            let class = entry.key().0;
            if last != Some(class) {
                count += 1;
                last = Some(class);
            }
        }
        count
    }

    /// Resolver over the published tables, bounded by the configured hierarchy depth
    pub fn resolver(&self) -> MethodResolver<'_, Self> {
        MethodResolver::new(self).with_max_depth(self.config.max_hierarchy_depth)
    }

    /// Resolve a method starting at `start`
    ///
    /// # Errors
    /// See [`MethodResolver::resolve`].
    pub fn resolve(&self, start: &ClassHandle, name: &str, descriptor: &str) -> Result<Resolution> {
        self.resolver().resolve(start, name, descriptor)
    }

    /// Resolve a field starting at `start`
    ///
    /// # Errors
    /// See [`MethodResolver::resolve_field`].
    pub fn lookup_field(
        &self,
        start: &ClassHandle,
        name: &str,
        descriptor: &str,
    ) -> Result<Resolution> {
        self.resolver().resolve_field(start, name, descriptor)
    }

    /// Resolve a method and check access from `requesting`
    ///
    /// # Errors
    /// See [`MethodResolver::resolve_accessible`].
    pub fn resolve_accessible(
        &self,
        checker: &AccessChecker<'_>,
        requesting: ModuleId,
        start: &ClassHandle,
        name: &str,
        descriptor: &str,
    ) -> Result<Resolution> {
        self.resolver()
            .resolve_accessible(checker, requesting, start, name, descriptor)
    }

    /// Run `f` with the build lock of the live slot of `class` held.
    ///
    /// Returns `None` if `create` is false and the class has no slot.
    fn with_slot<R>(
        &self,
        class: ClassId,
        create: bool,
        f: impl FnOnce(&ClassSlot) -> R,
    ) -> Option<R> {
        loop {
            let slot = if create {
                self.slots
                    .entry(class)
                    .or_insert_with(|| Arc::new(ClassSlot::new()))
                    .value()
                    .clone()
            } else {
                self.slots.get(&class).map(|entry| entry.value().clone())?
            };
            let _building = lock!(slot.building);

            let live = self
                .slots
                .get(&class)
                .is_some_and(|entry| Arc::ptr_eq(entry.value(), &slot));
            if live {
                return Some(f(&slot));
            }
        }
    }

    /// Unlink every published version of `class`
    fn retract(&self, class: ClassId) {
        let keys: Vec<PublicationKey> = self
            .published
            .range((class, 0)..=(class, u32::MAX))
            .map(|entry| *entry.key())
            .collect();
        for key in keys {
            self.published.remove(&key);
        }
    }

    fn builder(
        &self,
        definition: &ClassDefinition,
        loader: LoaderId,
        version: u32,
    ) -> MethodTableBuilder {
        MethodTableBuilder::new(definition.class, definition.name.clone())
            .with_super(definition.super_class)
            .with_module(definition.module)
            .with_loader(loader)
            .with_version(version)
            .with_config(self.config)
    }
}

impl TableSource for ClassLoadCoordinator {
    fn published(&self, class: ClassId) -> Option<ClassMetadataTableRc> {
        self.published
            .upper_bound(Bound::Included(&(class, u32::MAX)))
            .filter(|entry| entry.key().0 == class)
            .map(|entry| entry.value().clone())
    }
}

impl Default for ClassLoadCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
