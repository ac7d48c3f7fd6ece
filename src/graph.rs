//! The per-module usage graph.
//!
//! Nodes are top-level symbols and tracked pure-expression dependencies.
//! During traversal the graph only ever grows: unset, then a set of targets,
//! then possibly always-used. Flattening collapses symbol-to-symbol edges so
//! every remaining value speaks in export names.

use crate::dep::DependencyId;
use crate::symbol::TopLevelSymbol;
use ahash::HashMap;
use ahash::HashSet;

/// A node the graph records usage for.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum GraphKey {
  Symbol(TopLevelSymbol),
  Dep(DependencyId),
}

/// One recorded reason a node is reachable.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Target {
  /// Leaf: reachable when this export name is consumed.
  Export(String),
  /// Internal edge: reachable whenever this symbol is.
  Symbol(TopLevelSymbol),
}

/// A node's recorded usage. Absence from the graph means never used.
#[derive(Clone, PartialEq, Debug)]
pub enum Usage {
  /// Unconditionally reachable. Absorbing: never downgraded.
  Always,
  /// Reachable via these targets, insertion-ordered and deduplicated.
  Targets(Vec<Target>),
}

#[derive(Default)]
pub struct UsageGraph {
  values: HashMap<GraphKey, Usage>,
  // Expansion happens in first-recorded order; together with the
  // eager-removal rule this keeps cyclic collapses deterministic for a given
  // event sequence.
  order: Vec<GraphKey>,
}

impl UsageGraph {
  pub fn new() -> Self {
    Self::default()
  }

  /// The node's current value; `None` means no usage was ever recorded.
  pub fn usage(&self, key: GraphKey) -> Option<&Usage> {
    self.values.get(&key)
  }

  /// Records that `key` is reachable whenever `target` is. No-op once `key`
  /// is already unconditionally used.
  pub fn add_target(&mut self, key: GraphKey, target: Target) {
    match self.values.get_mut(&key) {
      Some(Usage::Always) => {}
      Some(Usage::Targets(targets)) => {
        if !targets.contains(&target) {
          targets.push(target);
        };
      }
      None => {
        self.order.push(key);
        self.values.insert(key, Usage::Targets(vec![target]));
      }
    };
  }

  /// Records that `key` is reachable unconditionally, replacing any partial
  /// target set.
  pub fn set_always_used(&mut self, key: GraphKey) {
    if !self.values.contains_key(&key) {
      self.order.push(key);
    };
    self.values.insert(key, Usage::Always);
  }

  /// Collapses symbol-to-symbol edges so every node's value contains only
  /// export-name leaves or the always-used sentinel. Nodes nothing reaches
  /// revert to unset.
  ///
  /// Terminates on arbitrary cycles: a key leaves the unresolved set before
  /// its children are expanded, so a cycle back into it reads the value it
  /// holds at that moment instead of recursing again.
  pub fn flatten(&mut self) {
    let mut unresolved: HashSet<GraphKey> = self.values.keys().copied().collect();
    let keys = self.order.clone();
    for key in keys {
      self.flatten_key(key, &mut unresolved);
    }
  }

  fn flatten_key(&mut self, key: GraphKey, unresolved: &mut HashSet<GraphKey>) {
    if !unresolved.remove(&key) {
      // Already resolved, or mid-expansion further up the stack.
      return;
    };
    let targets = match self.values.get_mut(&key) {
      Some(Usage::Targets(targets)) => std::mem::take(targets),
      // Always-used needs no expansion; unset nodes are not in the map.
      _ => return,
    };
    let mut leaves: Vec<Target> = Vec::new();
    for target in targets {
      match target {
        Target::Export(_) => {
          if !leaves.contains(&target) {
            leaves.push(target);
          };
        }
        Target::Symbol(sym) => {
          let child = GraphKey::Symbol(sym);
          self.flatten_key(child, unresolved);
          if matches!(self.values.get(&child), Some(Usage::Always)) {
            // An unconditionally used dependent makes this node
            // unconditionally used; remaining targets are irrelevant.
            self.values.insert(key, Usage::Always);
            return;
          };
          if let Some(Usage::Targets(child_leaves)) = self.values.get(&child) {
            for leaf in child_leaves.clone() {
              if !leaves.contains(&leaf) {
                leaves.push(leaf);
              };
            }
          };
        }
      };
    }
    if leaves.is_empty() {
      self.values.remove(&key);
    } else {
      self.values.insert(key, Usage::Targets(leaves));
    };
  }
}
