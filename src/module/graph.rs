//! The module read graph.
//!
//! [`ModuleReadGraph`] owns the set of registered modules and the directed "reads" relation
//! between them. It is an explicit object passed by reference to whoever needs it (most
//! notably the [`crate::AccessChecker`]), never a hidden global.
//!
//! # Concurrency
//!
//! - Read edges live in a lock-free [`SkipSet`]; [`ModuleReadGraph::can_read`] never blocks
//! - Module registration and edge insertion are serialized by a single writer mutex, so that
//!   validation and insertion happen atomically with respect to other writers
//! - Modules are stored in an append-only [`boxcar::Vec`], ids are stable for the lifetime of
//!   the graph
//!
//! # Readability Rules
//!
//! - Every module reads itself
//! - The unnamed module, and every automatic module, reads and is read by every module
//! - Otherwise `a` reads `b` iff the edge `a -> b` was added with
//!   [`ModuleReadGraph::add_reads`]
//!
//! Edges are never removed; the relation grows monotonically and may contain cycles.

use std::sync::Mutex;

use crossbeam_skiplist::SkipSet;
use dashmap::DashMap;
use log::debug;
use strum::{Display, EnumIter};

use crate::{metadata::token::ModuleId, Error::InvalidArgument, Result};

/// Name the unnamed module is registered under
pub const ALL_UNNAMED: &str = "ALL-UNNAMED";

/// The flavour of a registered module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ModuleKind {
    /// Explicit module, reads only what it was given edges to
    Named,
    /// Automatic module, reads and is read by everything
    Automatic,
    /// The unnamed module
    Unnamed,
}

/// A registered module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Identity assigned at registration
    pub id: ModuleId,
    /// Module name
    pub name: String,
    /// Module flavour
    pub kind: ModuleKind,
}

impl ModuleInfo {
    /// Unnamed and automatic modules are open in both directions
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.kind, ModuleKind::Automatic | ModuleKind::Unnamed)
    }
}

/// Directed read permission `from -> to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleReadEdge {
    /// Reading module
    pub from: ModuleId,
    /// Module being read
    pub to: ModuleId,
}

/// Registered modules plus the read relation between them
pub struct ModuleReadGraph {
    /// Module at index `i` has id `i + 1`
    modules: boxcar::Vec<ModuleInfo>,
    names: DashMap<String, ModuleId>,
    edges: SkipSet<ModuleReadEdge>,
    writer: Mutex<()>,
}

impl ModuleReadGraph {
    /// Create a graph that contains only the unnamed module
    #[must_use]
    pub fn new() -> Self {
        let graph = ModuleReadGraph {
            modules: boxcar::Vec::new(),
            names: DashMap::new(),
            edges: SkipSet::new(),
            writer: Mutex::new(()),
        };

        let index = graph.modules.push(ModuleInfo {
            id: ModuleId::UNNAMED,
            name: ALL_UNNAMED.to_string(),
            kind: ModuleKind::Unnamed,
        });
        debug_assert_eq!(index + 1, ModuleId::UNNAMED.value() as usize);
        graph.names.insert(ALL_UNNAMED.to_string(), ModuleId::UNNAMED);
        graph
    }

    /// Register a named module
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the name is empty or already registered.
    pub fn define_module(&self, name: &str) -> Result<ModuleId> {
        self.register(name, ModuleKind::Named)
    }

    /// Register an automatic module
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the name is empty or already registered.
    pub fn define_automatic_module(&self, name: &str) -> Result<ModuleId> {
        self.register(name, ModuleKind::Automatic)
    }

    fn register(&self, name: &str, kind: ModuleKind) -> Result<ModuleId> {
        if name.is_empty() {
            return Err(InvalidArgument("module name must not be empty".to_string()));
        }

        let _guard = lock!(self.writer);
        if self.names.contains_key(name) {
            return Err(InvalidArgument(format!("module {name} is already defined")));
        }

        let index = self.modules.count();
        let id = ModuleId::new(u32::try_from(index + 1).map_err(|_| {
            InvalidArgument(format!("cannot register module {name}, id space exhausted"))
        })?);
        self.modules.push(ModuleInfo {
            id,
            name: name.to_string(),
            kind,
        });
        self.names.insert(name.to_string(), id);

        debug!("defined {kind} module {name} as {id}");
        Ok(id)
    }

    /// Look up a registered module by id
    #[must_use]
    pub fn module(&self, id: ModuleId) -> Option<&ModuleInfo> {
        if id.is_null() {
            return None;
        }
        self.modules.get(id.value() as usize - 1)
    }

    /// Look up a registered module by name
    #[must_use]
    pub fn module_by_name(&self, name: &str) -> Option<ModuleId> {
        self.names.get(name).map(|entry| *entry.value())
    }

    /// Number of registered modules, including the unnamed module
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.modules.count()
    }

    /// Returns the module or an `InvalidArgument` error naming the role it was passed in
    pub(crate) fn require(&self, id: ModuleId, role: &str) -> Result<&ModuleInfo> {
        if id.is_null() {
            return Err(InvalidArgument(format!("{role} module is null")));
        }
        self.module(id)
            .ok_or_else(|| InvalidArgument(format!("{role} module {id} is not defined")))
    }

    /// Add the read edge `from -> to`.
    ///
    /// Adding an edge that already exists, or a self edge, is a no-op.
    ///
    /// # Returns
    /// `true` if a new edge was stored
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if either module is null or not registered.
    /// The graph is not modified in that case.
    pub fn add_reads(&self, from: ModuleId, to: ModuleId) -> Result<bool> {
        let _guard = lock!(self.writer);
        self.require(from, "source")?;
        self.require(to, "target")?;

        if from == to {
            return Ok(false);
        }

        let edge = ModuleReadEdge { from, to };
        if self.edges.contains(&edge) {
            return Ok(false);
        }
        self.edges.insert(edge);
        debug!("{from} now reads {to}");
        Ok(true)
    }

    /// Returns true if code in `from` can read types of `to`
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if either module is null or not registered.
    pub fn can_read(&self, from: ModuleId, to: ModuleId) -> Result<bool> {
        let source = self.require(from, "source")?;
        let target = self.require(to, "target")?;

        if from == to || source.is_open() || target.is_open() {
            return Ok(true);
        }
        Ok(self.edges.contains(&ModuleReadEdge { from, to }))
    }

    /// All modules `from` has explicit edges to, in id order
    #[must_use]
    pub fn reads(&self, from: ModuleId) -> Vec<ModuleId> {
        let lower = ModuleReadEdge {
            from,
            to: ModuleId::NULL,
        };
        let upper = ModuleReadEdge {
            from,
            to: ModuleId::new(u32::MAX),
        };
        self.edges
            .range(lower..=upper)
            .map(|entry| entry.value().to)
            .collect()
    }

    /// Number of explicit edges
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl Default for ModuleReadGraph {
    fn default() -> Self {
        Self::new()
    }
}
