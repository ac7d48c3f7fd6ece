//! Conservative syntactic purity.
//!
//! Anything not provably free of observable side effects is impure. Missing a
//! pure expression only costs an optimization; calling an effectful
//! expression pure would let the optimizer delete live code.

use crate::expr::Expr;

/// Upper bound on the bytes allowed between the end of a binding identifier
/// and the start of its initializer, not counting block comments, for a
/// purity annotation to attach.
pub const MAX_ANNOTATION_GAP: usize = 9;

/// Returns whether evaluating `expr` provably has no observable side effects.
///
/// Only bare identifier references, literals, and conditionals whose three
/// operands are recursively pure qualify. Calls, member accesses, object and
/// array construction, template interpolation, `new`, and unrecognized shapes
/// can all run arbitrary code (getters, `valueOf`, iterators), so they never
/// do.
pub fn is_pure_expr(expr: &Expr) -> bool {
  match expr {
    Expr::Id(_) => true,
    Expr::LitNull
    | Expr::LitBool(_)
    | Expr::LitNum(_)
    | Expr::LitStr(_)
    | Expr::LitBigInt(_)
    | Expr::LitRegex(_) => true,
    Expr::Cond(cond) => {
      is_pure_expr(&cond.test) && is_pure_expr(&cond.consequent) && is_pure_expr(&cond.alternate)
    }
    _ => false,
  }
}

/// Detects a `/* @__PURE__ */` (or `#__PURE__`) annotation between the end of
/// a binding identifier and the start of its initializer.
///
/// The annotation only attaches when the non-comment characters in that gap
/// total at most [`MAX_ANNOTATION_GAP`] bytes, i.e. the comment sits directly
/// in the `name = init` punctuation. Line comments never count; tooling only
/// emits the block form, since a line comment would swallow the initializer.
pub fn has_pure_annotation(source: &str, binding_end: usize, init_start: usize) -> bool {
  let Some(gap) = source.get(binding_end..init_start) else {
    return false;
  };
  let mut annotated = false;
  let mut comment_bytes = 0;
  let mut rest = gap;
  while let Some(open) = rest.find("/*") {
    let Some(close) = rest[open + 2..].find("*/") else {
      // Unterminated comment; whatever remains counts against the gap.
      break;
    };
    let body = &rest[open + 2..open + 2 + close];
    if is_pure_marker(body) {
      annotated = true;
    };
    comment_bytes += close + 4;
    rest = &rest[open + 2 + close + 2..];
  }
  annotated && gap.len() - comment_bytes <= MAX_ANNOTATION_GAP
}

fn is_pure_marker(body: &str) -> bool {
  let trimmed = body.trim();
  let trimmed = trimmed
    .strip_prefix('@')
    .or_else(|| trimmed.strip_prefix('#'))
    .unwrap_or(trimmed);
  trimmed == "__PURE__"
}
