use ahash::HashMap;
use ahash::HashMapExt;
use serde::Serialize;

/// Synthetic declared name for an anonymous `export default` declaration.
pub const DEFAULT_EXPORT: &str = "*default*";

/// Identifies one top-level declaration within a single module.
///
/// Symbols are cheap copyable ids; the registry that created one owns its
/// declared name. A symbol is never shared across modules.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct TopLevelSymbol(u32);

impl TopLevelSymbol {
  pub fn id(&self) -> u32 {
    self.0
  }
}

/// Per-module table of top-level declared names.
#[derive(Default, Debug)]
pub struct SymbolRegistry {
  names: Vec<String>,
  by_name: HashMap<String, TopLevelSymbol>,
}

impl SymbolRegistry {
  pub fn new() -> Self {
    Self {
      names: Vec::new(),
      by_name: HashMap::new(),
    }
  }

  /// Returns the symbol already bound to `name`, or binds a new one.
  ///
  /// Idempotent: redeclaring the same top-level name reuses the existing
  /// identity, so the last registration is authoritative.
  pub fn get_or_create(&mut self, name: &str) -> TopLevelSymbol {
    if let Some(sym) = self.by_name.get(name) {
      return *sym;
    };
    let sym = TopLevelSymbol(self.names.len() as u32);
    self.names.push(name.to_string());
    self.by_name.insert(name.to_string(), sym);
    sym
  }

  /// Resolves a previously bound name.
  pub fn get(&self, name: &str) -> Option<TopLevelSymbol> {
    self.by_name.get(name).copied()
  }

  /// The declared name of `sym`.
  pub fn name(&self, sym: TopLevelSymbol) -> &str {
    &self.names[sym.0 as usize]
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }
}
