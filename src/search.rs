// The heuristic search driver (component H): weighted A* over the graph of
// expressions and rewriting steps, with landmark-based heuristic tightening
// on success and cooperative cancellation. Per spec §9's design note, the
// source's global mutable rule store becomes a `ProofContext` value here:
// signature, rule store, and the cross-call `h_cache` are fields threaded
// through the API rather than process globals, though nothing stops a
// caller from holding one `ProofContext` for a whole session.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Instant;

use fxhash::{FxHashMap, FxHashSet};
use ordered_float::OrderedFloat;

use crate::distance::{distance, estimate_cost, DistanceCache};
use crate::environment::Environment;
use crate::expr::Expr;
use crate::proof::{Proof, ProofStep};
use crate::rules::{successors, Applied};

/// Weighting parameter and cooperative-cancellation knobs for one `prove`
/// call (spec §4.8, §5).
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// ε ≥ 1 in the weighted-A* priority `g + ε·h`. Default 1 (plain A*).
    pub epsilon: f64,
    /// Emits a progress line per pop/successor/landmark-update, the way the
    /// teacher's `Prover::verbose` gates its own `println!` diagnostics.
    pub verbose: bool,
    /// Checked between pops; `None` means unbounded (spec §7 kind 4: no
    /// internal fuse, the caller must bound search externally if it wants
    /// one).
    pub deadline: Option<Instant>,
}

impl Default for SearchConfig {
    fn default() -> SearchConfig {
        SearchConfig { epsilon: 1.0, verbose: false, deadline: None }
    }
}

/// The result of one `prove` call. There is no `Result<_, Error>` here:
/// spec §7 is explicit that an unprovable or badly typed statement is not a
/// crash, it is a search outcome like any other.
#[derive(Debug, Clone)]
pub enum Outcome {
    Success(Proof),
    Exhausted,
    Interrupted,
}

/// Holds everything a `prove` call needs across invocations: the rule store
/// and signature (via `Environment`), the monotone-growing heuristic cache,
/// and the edit-distance memo table. The only process-wide mutable state
/// spec §5 describes, gathered into one value instead of left as globals.
pub struct ProofContext {
    pub env: Environment,
    h_cache: FxHashMap<Expr, u32>,
    distances: DistanceCache,
}

impl ProofContext {
    pub fn new(env: Environment) -> ProofContext {
        ProofContext { env, h_cache: FxHashMap::default(), distances: DistanceCache::default() }
    }

    pub fn peano() -> ProofContext {
        ProofContext::new(Environment::peano())
    }

    fn heuristic(&mut self, e: &Expr) -> u32 {
        if let Some(h) = self.h_cache.get(e) {
            return *h;
        }
        let h = estimate_cost(&mut self.distances, e);
        self.h_cache.insert(e.clone(), h);
        h
    }

    /// Attempts to prove `stmt`: rewrite it to `true` via a sequence of rule
    /// applications. On success, `stmt` itself is appended to the rule
    /// store as a reusable lemma (spec §3.3) and every previously visited
    /// node's heuristic is tightened by the triangle inequality (spec §4.8
    /// step 2's landmark update).
    pub fn prove(&mut self, stmt: &Expr, config: &SearchConfig) -> Outcome {
        let mut open: BinaryHeap<Reverse<(OrderedFloat<f64>, u64, Expr)>> = BinaryHeap::new();
        let mut g: FxHashMap<Expr, u32> = FxHashMap::default();
        let mut pred: FxHashMap<Expr, (Applied, Expr)> = FxHashMap::default();
        let mut closed: FxHashSet<Expr> = FxHashSet::default();
        let mut seq: u64 = 0;

        g.insert(stmt.clone(), 0);
        let h0 = self.heuristic(stmt);
        open.push(Reverse((OrderedFloat(h0 as f64 * config.epsilon), seq, stmt.clone())));
        seq += 1;

        while let Some(Reverse((_, _, current))) = open.pop() {
            if let Some(deadline) = config.deadline {
                if Instant::now() >= deadline {
                    return Outcome::Interrupted;
                }
            }

            if closed.contains(&current) || current.is_falsehood() {
                continue;
            }

            if current.is_truth() {
                self.env.rules.push(stmt.clone());
                let g_current = g[&current];
                for (n, g_n) in g.iter() {
                    let tightened = g_current.saturating_sub(*g_n);
                    let entry = self.h_cache.entry(n.clone()).or_insert(0);
                    *entry = (*entry).max(tightened);
                }
                if config.verbose {
                    println!("proved in {} rewriting step(s)", g_current);
                }
                return Outcome::Success(reconstruct(stmt, &pred));
            }

            closed.insert(current.clone());
            let typ = self.env.signature.type_of(&current);
            let g_cur = g[&current];

            for (applied, next) in successors(&self.env.signature, &self.env.rules, &current, &typ) {
                if next == current {
                    continue;
                }
                let step_cost = distance(&mut self.distances, &current, &next);
                let g_next = g_cur + step_cost;

                let improves = match g.get(&next) {
                    Some(existing) => g_next < *existing,
                    None => true,
                };
                if improves {
                    pred.insert(next.clone(), (applied, current.clone()));
                    g.insert(next.clone(), g_next);
                    let h_next = self.heuristic(&next);
                    open.push(Reverse((
                        OrderedFloat(g_next as f64 + config.epsilon * h_next as f64),
                        seq,
                        next,
                    )));
                    seq += 1;
                    if config.verbose {
                        println!("  queued (g={}, h={})", g_next, h_next);
                    }
                }
            }
        }

        Outcome::Exhausted
    }
}

/// Walks `pred` backward from `true` to `stmt`, then reverses, producing the
/// forward-order path spec §3.4 describes.
fn reconstruct(stmt: &Expr, pred: &FxHashMap<Expr, (Applied, Expr)>) -> Proof {
    let mut steps = Vec::new();
    let mut current = Expr::truth();
    while &current != stmt {
        let (applied, parent) = pred.get(&current).expect("broken predecessor chain").clone();
        steps.push(ProofStep { applied, result: current });
        current = parent;
    }
    steps.reverse();
    Proof { steps }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn goal(src: &str, ctx: &ProofContext) -> Expr {
        parse(src, &ctx.env.signature).unwrap()
    }

    #[test]
    fn test_prove_axiom_in_one_step() {
        let mut ctx = ProofContext::peano();
        let stmt = goal("0 + N = N", &ctx);
        match ctx.prove(&stmt, &SearchConfig::default()) {
            Outcome::Success(proof) => {
                assert_eq!(proof.len(), 1);
                assert!(proof.steps.last().unwrap().result.is_truth());
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_prove_right_identity_by_induction() {
        let mut ctx = ProofContext::peano();
        let stmt = goal("M + 0 = M", &ctx);
        match ctx.prove(&stmt, &SearchConfig::default()) {
            Outcome::Success(proof) => {
                assert!(proof.len() <= 10);
                assert!(proof.steps.last().unwrap().result.is_truth());
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_prove_symmetry_in_one_step() {
        let mut ctx = ProofContext::peano();
        let stmt = goal("X = Y implies Y = X", &ctx);
        match ctx.prove(&stmt, &SearchConfig::default()) {
            Outcome::Success(proof) => assert_eq!(proof.len(), 1),
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_prove_multiplication_zero_axiom() {
        let mut ctx = ProofContext::peano();
        let stmt = goal("0 * N = 0", &ctx);
        match ctx.prove(&stmt, &SearchConfig::default()) {
            Outcome::Success(proof) => assert_eq!(proof.len(), 1),
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_prove_twice_is_one_step_second_time() {
        let mut ctx = ProofContext::peano();
        let stmt = goal("M + 0 = M", &ctx);
        let first = ctx.prove(&stmt, &SearchConfig::default());
        assert!(matches!(first, Outcome::Success(_)));
        match ctx.prove(&stmt, &SearchConfig::default()) {
            Outcome::Success(proof) => assert_eq!(proof.len(), 1),
            other => panic!("expected one-step replay, got {:?}", other),
        }
    }

    #[test]
    fn test_landmark_update_never_decreases_h_cache() {
        let mut ctx = ProofContext::peano();
        let stmt = goal("0 + N = N", &ctx);
        let before: Vec<(Expr, u32)> = ctx.h_cache.iter().map(|(k, v)| (k.clone(), *v)).collect();
        ctx.prove(&stmt, &SearchConfig::default());
        for (k, v) in before {
            assert!(ctx.h_cache.get(&k).copied().unwrap_or(v) >= v);
        }
    }

    #[test]
    fn test_prove_disproof_leaves_rule_store_unchanged() {
        // The search space here is unbounded (spec §7 kind 4: no internal
        // fuse), so this negative case must supply an external deadline
        // rather than rely on `open` ever running dry.
        let mut ctx = ProofContext::peano();
        let before = ctx.env.rules.len();
        let stmt = goal("0 = s 0", &ctx);
        let config = SearchConfig {
            deadline: Some(Instant::now() + std::time::Duration::from_millis(200)),
            ..SearchConfig::default()
        };
        let outcome = ctx.prove(&stmt, &config);
        assert!(matches!(outcome, Outcome::Exhausted | Outcome::Interrupted));
        assert_eq!(ctx.env.rules.len(), before);
    }

    #[test]
    fn test_prove_respects_deadline() {
        let mut ctx = ProofContext::peano();
        let stmt = goal("0 = s 0", &ctx);
        let config = SearchConfig { deadline: Some(Instant::now()), ..SearchConfig::default() };
        // The deadline has already passed by the time we pop the first node.
        match ctx.prove(&stmt, &config) {
            Outcome::Interrupted | Outcome::Exhausted => {}
            other => panic!("expected interruption or exhaustion, got {:?}", other),
        }
    }
}
