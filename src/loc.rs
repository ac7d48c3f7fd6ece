use serde::Deserialize;
use serde::Serialize;

/// A half-open `[start, end)` byte range within a module's UTF-8 source.
///
/// Offsets always refer to the original source text the module was parsed
/// from; the analysis never rewrites source, so a range stays valid for the
/// lifetime of the module's pass.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Loc(pub usize, pub usize);

impl Loc {
  pub fn start(&self) -> usize {
    self.0
  }

  pub fn end(&self) -> usize {
    self.1
  }

  pub fn len(&self) -> usize {
    self.1.saturating_sub(self.0)
  }

  pub fn is_empty(&self) -> bool {
    self.1 <= self.0
  }
}
