use crate::graph::Target;
use crate::graph::Usage;
use crate::loc::Loc;
use crate::symbol::TopLevelSymbol;
use ahash::HashSet;
use itertools::Itertools;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use serde::Serialize;

/// Index of one tracked dependency within its module's pending set.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct DependencyId(pub(crate) u32);

impl DependencyId {
  pub fn index(&self) -> usize {
    self.0 as usize
  }
}

/// Published fate of one tracked usage point.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum UsageDecision {
  /// No export ever reaches the expression; it can be elided.
  Unused,
  /// Reachable regardless of which exports are consumed.
  Always,
  /// Reachable exactly when one of these export names is consumed. Sorted.
  Exports(Vec<String>),
}

impl UsageDecision {
  /// Answers the emit-or-elide question for a consumer that knows which
  /// export names of the module are actually used.
  pub fn is_used_by(&self, used_exports: &HashSet<String>) -> bool {
    match self {
      UsageDecision::Unused => false,
      UsageDecision::Always => true,
      UsageDecision::Exports(names) => names.iter().any(|name| used_exports.contains(name)),
    }
  }

  pub(crate) fn from_graph(usage: Option<&Usage>) -> UsageDecision {
    match usage {
      None => UsageDecision::Unused,
      Some(Usage::Always) => UsageDecision::Always,
      Some(Usage::Targets(targets)) => UsageDecision::Exports(
        targets
          .iter()
          .filter_map(|target| match target {
            Target::Export(name) => Some(name.clone()),
            // Flattening leaves no symbol edges behind.
            Target::Symbol(_) => None,
          })
          .sorted()
          .dedup()
          .collect(),
      ),
    }
  }
}

/// One pure top-level initializer whose emission depends on whether any
/// export reaches it.
#[derive(Debug)]
pub struct PureExprDependency {
  loc: Loc,
  symbol: TopLevelSymbol,
  // Written exactly once at publication. Sync so surrounding drivers can move
  // whole module analyses across worker threads.
  usage: OnceCell<UsageDecision>,
}

impl PureExprDependency {
  pub(crate) fn new(loc: Loc, symbol: TopLevelSymbol) -> Self {
    Self {
      loc,
      symbol,
      usage: OnceCell::new(),
    }
  }

  /// Span of the tracked initializer expression.
  pub fn loc(&self) -> Loc {
    self.loc
  }

  /// The binding whose fate this dependency shares.
  pub fn symbol(&self) -> TopLevelSymbol {
    self.symbol
  }

  /// The published decision; `None` until the module's finish event has run.
  pub fn usage(&self) -> Option<&UsageDecision> {
    self.usage.get()
  }

  pub(crate) fn publish(&self, decision: UsageDecision) {
    // Publication runs once per module; a second write is ignored.
    let _ = self.usage.set(decision);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn used(names: &[&str]) -> HashSet<String> {
    names.iter().map(|n| n.to_string()).collect()
  }

  #[test]
  fn is_used_by_consults_the_export_set() {
    let decision = UsageDecision::Exports(vec!["a".to_string(), "b".to_string()]);
    assert!(decision.is_used_by(&used(&["b", "z"])));
    assert!(!decision.is_used_by(&used(&["z"])));
    assert!(UsageDecision::Always.is_used_by(&used(&[])));
    assert!(!UsageDecision::Unused.is_used_by(&used(&["a"])));
  }

  #[test]
  fn publication_is_write_once() {
    let mut registry = crate::symbol::SymbolRegistry::new();
    let dep = PureExprDependency::new(Loc(0, 4), registry.get_or_create("a"));
    assert_eq!(dep.usage(), None);
    dep.publish(UsageDecision::Unused);
    dep.publish(UsageDecision::Always);
    assert_eq!(dep.usage(), Some(&UsageDecision::Unused));
  }
}
