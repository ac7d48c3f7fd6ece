use proptest::prelude::*;
use usage_js::graph::GraphKey;
use usage_js::graph::Target;
use usage_js::graph::Usage;
use usage_js::graph::UsageGraph;
use usage_js::symbol::SymbolRegistry;
use usage_js::symbol::TopLevelSymbol;

const NODES: usize = 8;

#[derive(Clone, Debug)]
enum Edge {
  // Node gains an export-name leaf.
  Leaf(usize, u8),
  // Node gains an edge to another node (cycles and self-edges included).
  Internal(usize, usize),
  // Node becomes unconditionally used.
  Always(usize),
}

fn edges() -> impl Strategy<Value = Vec<Edge>> {
  prop::collection::vec(
    prop_oneof![
      (0..NODES, 0..4u8).prop_map(|(i, l)| Edge::Leaf(i, l)),
      (0..NODES, 0..NODES).prop_map(|(i, j)| Edge::Internal(i, j)),
      (0..NODES).prop_map(Edge::Always),
    ],
    0..48,
  )
}

fn symbols() -> (Vec<TopLevelSymbol>, SymbolRegistry) {
  let mut registry = SymbolRegistry::new();
  let syms = (0..NODES)
    .map(|i| registry.get_or_create(&format!("s{i}")))
    .collect();
  (syms, registry)
}

fn apply(graph: &mut UsageGraph, syms: &[TopLevelSymbol], edges: &[Edge]) {
  for edge in edges {
    match *edge {
      Edge::Leaf(i, l) => {
        graph.add_target(GraphKey::Symbol(syms[i]), Target::Export(format!("e{l}")))
      }
      Edge::Internal(i, j) => graph.add_target(GraphKey::Symbol(syms[i]), Target::Symbol(syms[j])),
      Edge::Always(i) => graph.set_always_used(GraphKey::Symbol(syms[i])),
    }
  }
}

fn build(edges: &[Edge]) -> (UsageGraph, Vec<TopLevelSymbol>) {
  let (syms, _registry) = symbols();
  let mut graph = UsageGraph::new();
  apply(&mut graph, &syms, edges);
  (graph, syms)
}

// `after` keeps at least everything `before` resolved to.
fn covers(after: Option<&Usage>, before: Option<&Usage>) -> bool {
  match (after, before) {
    (_, None) => true,
    (Some(Usage::Always), _) => true,
    (None, Some(_)) => false,
    (Some(Usage::Targets(_)), Some(Usage::Always)) => false,
    (Some(Usage::Targets(a)), Some(Usage::Targets(b))) => b.iter().all(|t| a.contains(t)),
  }
}

proptest! {
  // Termination is implicit: the test completing at all means no cycle
  // recursed forever.
  #[test]
  fn flattening_leaves_only_leaves(edges in edges()) {
    let (mut graph, syms) = build(&edges);
    graph.flatten();
    for sym in syms {
      match graph.usage(GraphKey::Symbol(sym)) {
        None | Some(Usage::Always) => {}
        Some(Usage::Targets(targets)) => {
          prop_assert!(!targets.is_empty());
          prop_assert!(targets.iter().all(|t| matches!(t, Target::Export(_))));
        }
      }
    }
  }

  #[test]
  fn flattening_is_idempotent(edges in edges()) {
    let (mut graph, syms) = build(&edges);
    graph.flatten();
    let first: Vec<_> = syms.iter().map(|s| graph.usage(GraphKey::Symbol(*s)).cloned()).collect();
    graph.flatten();
    let second: Vec<_> = syms.iter().map(|s| graph.usage(GraphKey::Symbol(*s)).cloned()).collect();
    prop_assert_eq!(first, second);
  }

  #[test]
  fn always_used_is_absorbing(edges in edges(), more in edges(), pick in 0..NODES) {
    let (mut graph, syms) = build(&edges);
    let key = GraphKey::Symbol(syms[pick]);
    graph.set_always_used(key);
    graph.flatten();
    prop_assert_eq!(graph.usage(key), Some(&Usage::Always));
    // Recording more usage over the flattened graph and re-flattening never
    // narrows the sentinel.
    apply(&mut graph, &syms, &more);
    graph.flatten();
    prop_assert_eq!(graph.usage(key), Some(&Usage::Always));
  }

  #[test]
  fn direct_additions_grow_resolutions_monotonically(
    edges in edges(),
    pick in 0..NODES,
    leaf in 0..4u8,
  ) {
    let (mut before, syms) = build(&edges);
    before.flatten();

    // Same event sequence plus one trailing direct leaf on `pick`.
    let mut appended = edges.clone();
    appended.push(Edge::Leaf(pick, leaf));
    let (mut after, _) = build(&appended);
    after.flatten();

    for sym in syms {
      let key = GraphKey::Symbol(sym);
      prop_assert!(
        covers(after.usage(key), before.usage(key)),
        "resolution shrank for {:?}: {:?} -> {:?}",
        key,
        before.usage(key),
        after.usage(key),
      );
    }
  }
}
