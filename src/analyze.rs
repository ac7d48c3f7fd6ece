//! Per-module analysis context and the traversal event protocol.
//!
//! The surrounding toolchain walks a parsed module in source order and calls
//! into [`ModuleAnalysis`] as it goes; [`ModuleAnalysis::finish`] flattens the
//! recorded graph and publishes one decision per tracked dependency. The pass
//! is synchronous and owns no state beyond the module it was created for;
//! analyzing modules in parallel means one `ModuleAnalysis` each.

use crate::dep::DependencyId;
use crate::dep::PureExprDependency;
use crate::dep::UsageDecision;
use crate::expr::Expr;
use crate::graph::GraphKey;
use crate::graph::Target;
use crate::graph::UsageGraph;
use crate::loc::Loc;
use crate::pure::has_pure_annotation;
use crate::pure::is_pure_expr;
use crate::symbol::SymbolRegistry;
use crate::symbol::TopLevelSymbol;
use crate::symbol::DEFAULT_EXPORT;
use ahash::HashMap;
use ahash::HashMapExt;
use tracing::debug;
use tracing::debug_span;

/// Stable identity for a syntax-tree node, assigned by the traversal (a
/// preorder counter, or the node's source position). The analysis never
/// inspects it; it only keys side tables.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(pub u64);

/// Analysis state for one module, alive for exactly one traversal.
pub struct ModuleAnalysis<'a> {
  source: &'a str,
  symbols: SymbolRegistry,
  graph: UsageGraph,
  // Pending set: one entry per accepted pure initializer, in source order.
  pending: Vec<PureExprDependency>,
  // Declaration statements and declarators that carry a top-level symbol.
  decl_symbols: HashMap<NodeId, TopLevelSymbol>,
  // Declarators whose initializer was accepted as a tracked dependency.
  decl_deps: HashMap<NodeId, DependencyId>,
  // The declaration whose body is currently being walked, if any.
  current: Option<TopLevelSymbol>,
  bailed_out: bool,
}

impl<'a> ModuleAnalysis<'a> {
  /// Module entry: a fresh graph and pending set for one traversal.
  pub fn new(source: &'a str) -> Self {
    Self {
      source,
      symbols: SymbolRegistry::new(),
      graph: UsageGraph::new(),
      pending: Vec::new(),
      decl_symbols: HashMap::new(),
      decl_deps: HashMap::new(),
      current: None,
      bailed_out: false,
    }
  }

  /// Pre-visit of a top-level function declaration, class declaration, or a
  /// variable declarator initialized with a function, arrow, or class
  /// expression.
  ///
  /// Registers the declared name (a synthetic one when `name` is `None`, for
  /// an anonymous default export) so later references resolve to it, and ties
  /// `node` to the symbol so the statement visit can enter its context.
  pub fn pre_declaration(&mut self, node: NodeId, name: Option<&str>) -> TopLevelSymbol {
    let sym = self.symbols.get_or_create(name.unwrap_or(DEFAULT_EXPORT));
    self.decl_symbols.insert(node, sym);
    sym
  }

  /// Visit of a top-level statement or declarator: enters the attribution
  /// context of the declaration registered for `node`, or leaves tracked
  /// context entirely for statements that are not declarations.
  pub fn statement(&mut self, node: NodeId) {
    self.current = self.decl_symbols.get(&node).copied();
  }

  /// Pre-visit of a plain top-level declarator's initializer.
  ///
  /// When the initializer is accepted as pure — by shape, or by a
  /// `@__PURE__`/`#__PURE__` annotation sitting between `name_loc` and
  /// `init_loc` — this registers a tracked dependency whose fate is the
  /// declarator's own symbol, and enters that symbol's context so references
  /// inside the initializer (including self-recursive ones) attribute to it.
  /// Returns `None`, with no context change, otherwise.
  pub fn pre_initializer(
    &mut self,
    node: NodeId,
    name: &str,
    name_loc: Loc,
    init_loc: Loc,
    init: &Expr,
  ) -> Option<DependencyId> {
    if !is_pure_expr(init) && !has_pure_annotation(self.source, name_loc.end(), init_loc.start()) {
      return None;
    };
    let sym = self.symbols.get_or_create(name);
    let id = DependencyId(self.pending.len() as u32);
    self.pending.push(PureExprDependency::new(init_loc, sym));
    self.graph.add_target(GraphKey::Dep(id), Target::Symbol(sym));
    self.decl_deps.insert(node, id);
    self.current = Some(sym);
    Some(id)
  }

  /// Post-visit of a declarator accepted by
  /// [`ModuleAnalysis::pre_initializer`]: leaves the declarator's context.
  pub fn post_initializer(&mut self) {
    self.current = None;
  }

  /// A reference to `name` resolved somewhere in the module, at any nesting
  /// depth.
  ///
  /// Attributed to the declaration currently being walked; a reference in
  /// plain top-level statement code is an unconditional use.
  pub fn identifier(&mut self, name: &str) {
    let Some(sym) = self.symbols.get(name) else {
      return;
    };
    match self.current {
      Some(from) => self
        .graph
        .add_target(GraphKey::Symbol(sym), Target::Symbol(from)),
      None => self.graph.set_always_used(GraphKey::Symbol(sym)),
    };
  }

  /// Simple assignment `name = …` at any depth. A plain store is not a use.
  ///
  /// Returns whether `name` is tracked, in which case the traversal must not
  /// emit an identifier event for the assignment target (the right-hand side
  /// is still walked normally).
  pub fn assignment(&mut self, name: &str) -> bool {
    self.symbols.get(name).is_some()
  }

  /// The module/export collaborator reports that the binding `local` is
  /// exposed under the export name `exported`.
  pub fn add_export(&mut self, local: &str, exported: &str) {
    let sym = self.symbols.get_or_create(local);
    self
      .graph
      .add_target(GraphKey::Symbol(sym), Target::Export(exported.to_string()));
  }

  /// The module contains a construct that defeats scoped attribution (direct
  /// `eval`, `with`). Every tracked dependency will publish as
  /// unconditionally used and nothing will be eliminated from this module.
  pub fn bailout(&mut self) {
    if !self.bailed_out {
      debug!("module usage analysis bailed out");
      self.bailed_out = true;
    };
  }

  /// Module finish: flattens the graph and publishes one write-once decision
  /// per pending dependency. Runs exactly once, after every other event; a
  /// module whose traversal fails upstream simply drops the analysis without
  /// publishing.
  pub fn finish(mut self) -> ModuleUsage {
    let span = debug_span!(
      "publish_usage",
      symbols = self.symbols.len(),
      pending = self.pending.len(),
    );
    let _entered = span.entered();
    if self.bailed_out {
      for dep in &self.pending {
        dep.publish(UsageDecision::Always);
      }
    } else {
      self.graph.flatten();
      for (i, dep) in self.pending.iter().enumerate() {
        let key = GraphKey::Dep(DependencyId(i as u32));
        dep.publish(UsageDecision::from_graph(self.graph.usage(key)));
      }
    };
    ModuleUsage {
      symbols: self.symbols,
      graph: self.graph,
      pending: self.pending,
      decl_deps: self.decl_deps,
      bailed_out: self.bailed_out,
    }
  }
}

/// Read-only result of one module's analysis, handed to code generation.
pub struct ModuleUsage {
  symbols: SymbolRegistry,
  graph: UsageGraph,
  pending: Vec<PureExprDependency>,
  decl_deps: HashMap<NodeId, DependencyId>,
  bailed_out: bool,
}

impl ModuleUsage {
  /// Every tracked dependency in source order, decisions published.
  pub fn dependencies(&self) -> &[PureExprDependency] {
    &self.pending
  }

  pub fn dependency(&self, id: DependencyId) -> Option<&PureExprDependency> {
    self.pending.get(id.index())
  }

  /// The dependency registered for a declarator node, if its initializer was
  /// accepted.
  pub fn dependency_for(&self, node: NodeId) -> Option<DependencyId> {
    self.decl_deps.get(&node).copied()
  }

  /// Flattened usage of a declared top-level name, for tooling and tests.
  pub fn symbol_usage(&self, name: &str) -> UsageDecision {
    if self.bailed_out {
      return UsageDecision::Always;
    };
    let Some(sym) = self.symbols.get(name) else {
      return UsageDecision::Unused;
    };
    UsageDecision::from_graph(self.graph.usage(GraphKey::Symbol(sym)))
  }

  pub fn bailed_out(&self) -> bool {
    self.bailed_out
  }
}
