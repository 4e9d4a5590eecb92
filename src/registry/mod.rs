// src/registry/mod.rs

//! Target registry.
//!
//! - [`target`] defines the [`Target`] trait and the config-backed
//!   [`ConfiguredTarget`].
//! - [`graph`] holds the dependency graph and the stable topological sort.
//!
//! A [`Registry`] is built once per invocation and is read-only afterwards.
//! Construction rejects dangling `depends_on` references first, then cycles,
//! so the cycle detector only ever sees declared targets.

pub mod graph;
pub mod target;

use std::collections::HashMap;

use tracing::debug;

use crate::config::model::ConfigFile;
use crate::errors::{MonorunError, Result};
use crate::types::TargetType;

pub use crate::config::model::CommandDefinition;
pub use graph::DependencyGraph;
pub use target::{CommandStatus, ConfiguredTarget, Target};

#[derive(Debug)]
pub struct Registry {
    /// Declaration order.
    targets: Vec<Box<dyn Target>>,
    index: HashMap<String, usize>,
    graph: DependencyGraph,
}

impl Registry {
    /// Build a registry from a validated [`ConfigFile`].
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let targets = cfg
            .targets
            .iter()
            .cloned()
            .map(|t| Box::new(ConfiguredTarget::from(t)) as Box<dyn Target>)
            .collect();
        Self::new(targets)
    }

    /// Build a registry from arbitrary targets, in declaration order.
    pub fn new(targets: Vec<Box<dyn Target>>) -> Result<Self> {
        let mut index = HashMap::with_capacity(targets.len());
        for (i, target) in targets.iter().enumerate() {
            if index.insert(target.name().to_string(), i).is_some() {
                return Err(MonorunError::ConfigError(format!(
                    "target '{}' is declared more than once",
                    target.name()
                )));
            }
        }

        let mut edges = Vec::new();
        for (i, target) in targets.iter().enumerate() {
            for dep in target.depends_on() {
                let Some(&dep_idx) = index.get(dep) else {
                    return Err(MonorunError::DanglingDependency {
                        target: target.name().to_string(),
                        missing: dep.clone(),
                    });
                };
                edges.push((dep_idx, i));
            }
        }

        let registry = Self {
            graph: DependencyGraph::new(targets.len(), edges),
            targets,
            index,
        };

        // Fail at construction rather than on first use.
        let order = registry.topological_order()?;
        debug!(
            order = ?order.iter().map(|t| t.name()).collect::<Vec<_>>(),
            "registry built"
        );

        Ok(registry)
    }

    /// Exact-name lookup.
    pub fn get(&self, name: &str) -> Option<&dyn Target> {
        self.index.get(name).map(|&i| self.targets[i].as_ref())
    }

    /// All targets in declaration order.
    pub fn all(&self) -> Vec<&dyn Target> {
        self.targets.iter().map(|t| t.as_ref()).collect()
    }

    pub fn by_type(&self, target_type: TargetType) -> Vec<&dyn Target> {
        self.targets
            .iter()
            .map(|t| t.as_ref())
            .filter(|t| t.target_type() == target_type)
            .collect()
    }

    pub fn languages(&self) -> Vec<&dyn Target> {
        self.by_type(TargetType::Language)
    }

    pub fn auxiliary(&self) -> Vec<&dyn Target> {
        self.by_type(TargetType::Auxiliary)
    }

    /// Every target, each after all of its (transitive) dependencies.
    ///
    /// Among targets with no ordering constraint between them, declaration
    /// order wins, so repeated calls return the same sequence.
    pub fn topological_order(&self) -> Result<Vec<&dyn Target>> {
        match self.graph.stable_order() {
            Ok(order) => Ok(order.into_iter().map(|i| self.targets[i].as_ref()).collect()),
            Err(cycle) => {
                let members: Vec<String> = cycle
                    .iter()
                    .map(|&i| self.targets[i].name().to_string())
                    .collect();
                Err(MonorunError::DependencyCycle {
                    target: members.first().cloned().unwrap_or_default(),
                    members,
                })
            }
        }
    }

    /// Direct dependencies of `name` (empty for unknown names).
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.get(name).map(|t| t.depends_on()).unwrap_or(&[])
    }

    /// Names of targets that list `name` directly in `depends_on`, in declaration order.
    pub fn dependents_of(&self, name: &str) -> Vec<&str> {
        self.targets
            .iter()
            .filter(|t| t.depends_on().iter().any(|d| d == name))
            .map(|t| t.name())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
