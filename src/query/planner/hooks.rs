// Planner Hook Chain
//
// This module defines the relation-info extension point: hooks that may
// rewrite a relation's planning metadata after the catalog has filled it in.

use std::sync::Arc;

use log::trace;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::common::types::ObjectId;
use super::rel_info::RelOptInfo;

/// Errors raised while gathering relation metadata for planning
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("relation lookup failed during planning: {0}")]
    RelationLookup(#[from] CatalogError),
}

/// Result type for planning operations
pub type PlanResult<T> = Result<T, PlanError>;

/// A handler for the relation-info extension point
pub trait RelationInfoHook: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Inspect and possibly rewrite planning metadata for `relation`.
    /// `inhparent` is set when planning an inheritance parent as a whole.
    fn get_relation_info(&self, relation: ObjectId, inhparent: bool, rel: &mut RelOptInfo) -> PlanResult<()>;
}

/// Ordered chain of relation-info hooks.
///
/// Hooks are kept in installation order. Dispatch starts at the most recently
/// installed hook and works back to the first, so each hook runs before the
/// hooks installed ahead of it and they see its changes.
#[derive(Default)]
pub struct HookChain {
    hooks: Vec<Arc<dyn RelationInfoHook>>,
}

impl HookChain {
    pub fn new() -> Self {
        HookChain { hooks: Vec::new() }
    }

    /// Install a hook. Installing the same hook twice is a no-op; returns
    /// whether the hook was added.
    pub fn install(&mut self, hook: Arc<dyn RelationInfoHook>) -> bool {
        if self.hooks.iter().any(|h| Arc::ptr_eq(h, &hook)) {
            return false;
        }
        self.hooks.push(hook);
        true
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Names of installed hooks, in installation order
    pub fn names(&self) -> Vec<String> {
        self.hooks.iter().map(|h| h.name().to_string()).collect()
    }

    /// Run every hook for one relation. The first error stops the chain.
    pub fn run(&self, relation: ObjectId, inhparent: bool, rel: &mut RelOptInfo) -> PlanResult<()> {
        for hook in self.hooks.iter().rev() {
            trace!("running relation info hook {} for relation {}", hook.name(), relation);
            hook.get_relation_info(relation, inhparent, rel)?;
        }
        Ok(())
    }
}
