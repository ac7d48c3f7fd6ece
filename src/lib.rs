//! Per-module JavaScript top-level usage analysis for tree shaking.
//!
//! Driven by an external syntax traversal in strict source order, this crate
//! determines, for every top-level declaration of a module, whether it is
//! ever observably used and, if so, through which export names. A downstream
//! code generator uses the published decisions to elide declarations (and
//! their side-effect-free initializer expressions) no consumer reaches.
//!
//! The analysis is deliberately conservative: only bare identifiers,
//! literals, recursively pure conditionals, and `/* @__PURE__ */`-annotated
//! initializers are ever candidates for elision, and any reference the pass
//! cannot attribute to a tracked declaration counts as an unconditional use.
//!
//! ```
//! use usage_js::expr::CallExpr;
//! use usage_js::expr::Expr;
//! use usage_js::loc::Loc;
//! use usage_js::ModuleAnalysis;
//! use usage_js::NodeId;
//! use usage_js::UsageDecision;
//!
//! let source = "const shown = /* @__PURE__ */ render(); export function page() { return shown; }";
//! let mut analysis = ModuleAnalysis::new(source);
//!
//! // Pre-pass over top-level declarations.
//! let page_stmt = NodeId(1);
//! analysis.pre_declaration(page_stmt, Some("page"));
//!
//! // `const shown = /* @__PURE__ */ render();`
//! let shown_decl = NodeId(0);
//! analysis.statement(shown_decl);
//! let init = Expr::Call(Box::new(CallExpr {
//!   callee: Expr::Id("render".to_string()),
//!   arguments: Vec::new(),
//! }));
//! let dep = analysis
//!   .pre_initializer(shown_decl, "shown", Loc(6, 11), Loc(30, 38), &init)
//!   .unwrap();
//! analysis.identifier("render");
//! analysis.post_initializer();
//!
//! // `export function page() { return shown; }`
//! analysis.statement(page_stmt);
//! analysis.add_export("page", "page");
//! analysis.identifier("shown");
//!
//! let usage = analysis.finish();
//! assert_eq!(
//!   usage.dependency(dep).unwrap().usage(),
//!   Some(&UsageDecision::Exports(vec!["page".to_string()]))
//! );
//! ```

pub mod analyze;
pub mod dep;
pub mod expr;
pub mod graph;
pub mod loc;
pub mod pure;
pub mod symbol;

pub use analyze::ModuleAnalysis;
pub use analyze::ModuleUsage;
pub use analyze::NodeId;
pub use dep::DependencyId;
pub use dep::PureExprDependency;
pub use dep::UsageDecision;
pub use symbol::TopLevelSymbol;
pub use symbol::DEFAULT_EXPORT;
