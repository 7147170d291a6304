//! Launcher-style `--add-reads` option handling.
//!
//! Values have the form `source=target(,target)*`, where a target may be
//! [`ALL_UNNAMED`](crate::module::ALL_UNNAMED). Unlike the core graph, which treats repeated
//! edges as no-ops, this layer rejects a target that is specified more than once for the same
//! source, mirroring what a command line user would expect to be told about.
//!
//! ```rust
//! use methodtable::{AddReadsOptions, ModuleReadGraph};
//!
//! let graph = ModuleReadGraph::new();
//! let logging = graph.define_module("java.logging")?;
//! let scripting = graph.define_module("java.scripting")?;
//!
//! let options = AddReadsOptions::parse(["java.logging=java.scripting,ALL-UNNAMED"])?;
//! assert_eq!(options.apply(&graph)?, 2);
//! assert!(graph.can_read(logging, scripting)?);
//! # Ok::<(), methodtable::Error>(())
//! ```

use std::collections::BTreeMap;

use crate::{metadata::token::ModuleId, module::ModuleReadGraph, Error::InvalidArgument, Result};

/// One parsed `source=target(,target)*` value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddReadsOption {
    /// Reading module name
    pub source: String,
    /// Names of the modules to be read
    pub targets: Vec<String>,
}

impl AddReadsOption {
    /// Parse a single option value
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the value has no `=`, or the source or any
    /// target is empty.
    pub fn parse(value: &str) -> Result<Self> {
        let Some((source, targets)) = value.split_once('=') else {
            return Err(InvalidArgument(format!(
                "--add-reads {value}: expected <source>=<target>(,<target>)*"
            )));
        };

        let source = source.trim();
        if source.is_empty() {
            return Err(InvalidArgument(format!("--add-reads {value}: missing source")));
        }

        let targets: Vec<String> = targets.split(',').map(|t| t.trim().to_string()).collect();
        if targets.iter().any(String::is_empty) {
            return Err(InvalidArgument(format!("--add-reads {value}: empty target")));
        }

        Ok(AddReadsOption {
            source: source.to_string(),
            targets,
        })
    }
}

/// All `--add-reads` values of one invocation, merged by source module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddReadsOptions {
    reads: BTreeMap<String, Vec<String>>,
}

impl AddReadsOptions {
    /// Parse and merge option values
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if a value is malformed, or if a target is
    /// specified more than once for the same source, whether within one value or across
    /// several.
    pub fn parse<'v>(values: impl IntoIterator<Item = &'v str>) -> Result<Self> {
        let mut reads: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for value in values {
            let option = AddReadsOption::parse(value)?;
            let targets = reads.entry(option.source.clone()).or_default();
            for target in option.targets {
                if targets.contains(&target) {
                    return Err(InvalidArgument(format!(
                        "--add-reads {}: {target} specified more than once",
                        option.source
                    )));
                }
                targets.push(target);
            }
        }

        Ok(AddReadsOptions { reads })
    }

    /// Targets requested for `source`, in the order given
    #[must_use]
    pub fn targets(&self, source: &str) -> &[String] {
        self.reads
            .get(source)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns true if no option was given
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }

    /// Add every requested edge to `graph`.
    ///
    /// All module names are resolved before the first edge is added, so an unknown name
    /// leaves the graph untouched.
    ///
    /// # Returns
    /// The number of edges that were not present before
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if a module name is not registered.
    pub fn apply(&self, graph: &ModuleReadGraph) -> Result<usize> {
        let lookup = |name: &str| -> Result<ModuleId> {
            graph
                .module_by_name(name)
                .ok_or_else(|| InvalidArgument(format!("--add-reads: unknown module {name}")))
        };

        let mut edges = Vec::new();
        for (source, targets) in &self.reads {
            let from = lookup(source.as_str())?;
            for target in targets {
                edges.push((from, lookup(target.as_str())?));
            }
        }

        let mut added = 0;
        for (from, to) in edges {
            if graph.add_reads(from, to)? {
                added += 1;
            }
        }
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{module::ALL_UNNAMED, Error};

    #[test]
    fn parse_single() {
        let option = AddReadsOption::parse("m1=m2, m3").unwrap();
        assert_eq!(option.source, "m1");
        assert_eq!(option.targets, ["m2", "m3"]);

        assert!(AddReadsOption::parse("m1").is_err());
        assert!(AddReadsOption::parse("=m2").is_err());
        assert!(AddReadsOption::parse("m1=").is_err());
        assert!(AddReadsOption::parse("m1=m2,,m3").is_err());
    }

    #[test]
    fn merge_by_source() {
        let options = AddReadsOptions::parse(["m1=m2", "m1=m3", "m2=ALL-UNNAMED"]).unwrap();
        assert_eq!(options.targets("m1"), ["m2", "m3"]);
        assert_eq!(options.targets("m2"), [ALL_UNNAMED]);
        assert!(options.targets("m3").is_empty());
        assert!(!options.is_empty());
        assert!(AddReadsOptions::parse(std::iter::empty()).unwrap().is_empty());
    }

    #[test]
    fn duplicate_target_rejected() {
        match AddReadsOptions::parse(["m1=m2", "m1=m2"]) {
            Err(Error::InvalidArgument(message)) => {
                assert!(message.contains("specified more than once"))
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert!(AddReadsOptions::parse(["m1=m2,m2"]).is_err());
        assert!(AddReadsOptions::parse(["m1=m2", "m3=m2"]).is_ok());
    }

    #[test]
    fn apply_to_graph() {
        let graph = ModuleReadGraph::new();
        let m1 = graph.define_module("m1").unwrap();
        let m2 = graph.define_module("m2").unwrap();
        graph.add_reads(m1, m2).unwrap();

        let options = AddReadsOptions::parse(["m1=m2,ALL-UNNAMED", "m2=m1"]).unwrap();
        assert_eq!(options.apply(&graph).unwrap(), 2);
        assert!(graph.can_read(m2, m1).unwrap());
        assert_eq!(graph.edge_count(), 3);

        // Applying again is harmless at the graph level
        assert_eq!(options.apply(&graph).unwrap(), 0);
    }

    #[test]
    fn unknown_module_leaves_graph_untouched() {
        let graph = ModuleReadGraph::new();
        graph.define_module("m1").unwrap();
        graph.define_module("m2").unwrap();

        let options = AddReadsOptions::parse(["m1=m2", "m2=nope"]).unwrap();
        assert!(matches!(
            options.apply(&graph),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(graph.edge_count(), 0);
    }
}
