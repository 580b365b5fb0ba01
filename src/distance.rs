// Generalized tree edit distance and the admissible heuristic built on top
// of it (component G).

use fxhash::FxHashMap;

use crate::expr::{deep_length, flatten, Expr};

/// Memoization table keyed by an unordered-in-spirit but here literally
/// ordered pair of expressions, since `distance` is symmetric but cheaper
/// to cache per call-order than to canonicalize on every lookup.
pub type DistanceCache = FxHashMap<(Expr, Expr), u32>;

/// `distance(e1, e2)`: a generalized tree edit distance, memoized on
/// `(e1, e2)`. Symmetric and non-negative; `distance(e, e) == 0`.
pub fn distance(cache: &mut DistanceCache, a: &Expr, b: &Expr) -> u32 {
    if a == b {
        return 0;
    }
    let key = (a.clone(), b.clone());
    if let Some(d) = cache.get(&key) {
        return *d;
    }
    let result = distance_uncached(cache, a, b);
    cache.insert(key, result);
    result
}

fn distance_uncached(cache: &mut DistanceCache, a: &Expr, b: &Expr) -> u32 {
    match (a, b) {
        (Expr::App(ha, aargs), Expr::App(hb, bargs)) if ha == "and" && hb == "and" => {
            pairwise_and_distance(cache, aargs, bargs)
        }
        (Expr::App(ha, aargs), _) if ha == "and" => sum_distance_to(cache, aargs, b),
        (_, Expr::App(hb, bargs)) if hb == "and" => sum_distance_to(cache, bargs, a),

        (Expr::App(ha, aargs), _) if ha == "or" => min_distance_to(cache, aargs, b),
        (_, Expr::App(hb, bargs)) if hb == "or" => min_distance_to(cache, bargs, a),

        (Expr::App(ha, aargs), Expr::App(hb, bargs)) if ha == "implies" && hb == "implies" => {
            distance(cache, &aargs[1], &bargs[1])
        }
        (Expr::App(ha, aargs), _) if ha == "implies" => distance(cache, &aargs[1], b),
        (_, Expr::App(hb, bargs)) if hb == "implies" => distance(cache, a, &bargs[1]),

        (Expr::App(ha, aargs), _) if ha == "=" => distance(cache, &aargs[0], &aargs[1]),
        (_, Expr::App(hb, bargs)) if hb == "=" => distance(cache, &bargs[0], &bargs[1]),

        (Expr::App(ha, aargs), Expr::App(hb, bargs)) => {
            if ha == hb && aargs.len() == bargs.len() {
                wagner_fischer(cache, aargs, bargs)
            } else {
                deep_length(a) + deep_length(b)
            }
        }

        (atom, Expr::App(_, _)) if is_atom(atom) => atom_vs_application(cache, atom, b),
        (Expr::App(_, _), atom) if is_atom(atom) => atom_vs_application(cache, atom, a),

        _ => {
            if a.head() == b.head() {
                0
            } else {
                1
            }
        }
    }
}

fn is_atom(e: &Expr) -> bool {
    matches!(e, Expr::Literal(_) | Expr::Variable(_))
}

fn atom_vs_application(_cache: &mut DistanceCache, atom: &Expr, app: &Expr) -> u32 {
    let len = deep_length(app);
    if flatten(app).iter().any(|leaf| *leaf == atom.head()) {
        len.saturating_sub(1)
    } else {
        len
    }
}

fn sum_distance_to(cache: &mut DistanceCache, xs: &[Expr], y: &Expr) -> u32 {
    xs.iter().map(|x| distance(cache, x, y)).sum()
}

fn min_distance_to(cache: &mut DistanceCache, xs: &[Expr], y: &Expr) -> u32 {
    xs.iter().map(|x| distance(cache, x, y)).min().unwrap_or(0)
}

/// When both sides of an `and`-composition are themselves `and`, spec §4.7
/// requires a pairwise match rather than the cross-sum the single-sided
/// case uses: conjunct `i` on each side is matched against conjunct `i` on
/// the other, not against every conjunct on the other side. A length
/// mismatch prices the unmatched tail conjuncts as straight deletions.
fn pairwise_and_distance(cache: &mut DistanceCache, xs: &[Expr], ys: &[Expr]) -> u32 {
    let paired = xs.len().min(ys.len());
    let mut total = 0;
    for i in 0..paired {
        total += distance(cache, &xs[i], &ys[i]);
    }
    for x in &xs[paired..] {
        total += deep_length(x);
    }
    for y in &ys[paired..] {
        total += deep_length(y);
    }
    total
}

/// Wagner–Fischer edit distance over two argument sequences of a shared
/// head: deletion/insertion of a subtree `t` costs `deep_length(t)`,
/// substitution costs `distance` recursively.
fn wagner_fischer(cache: &mut DistanceCache, xs: &[Expr], ys: &[Expr]) -> u32 {
    let n = xs.len();
    let m = ys.len();
    let mut table = vec![vec![0u32; m + 1]; n + 1];

    for i in 1..=n {
        table[i][0] = table[i - 1][0] + deep_length(&xs[i - 1]);
    }
    for j in 1..=m {
        table[0][j] = table[0][j - 1] + deep_length(&ys[j - 1]);
    }

    for i in 1..=n {
        for j in 1..=m {
            let delete_cost = table[i - 1][j] + deep_length(&xs[i - 1]);
            let insert_cost = table[i][j - 1] + deep_length(&ys[j - 1]);
            let sub_cost = table[i - 1][j - 1] + distance(cache, &xs[i - 1], &ys[j - 1]);
            table[i][j] = delete_cost.min(insert_cost).min(sub_cost);
        }
    }

    table[n][m]
}

/// `estimate_cost(e)`: the admissible lower bound on the number of
/// rewriting steps from `e` to `true`.
pub fn estimate_cost(cache: &mut DistanceCache, e: &Expr) -> u32 {
    match e {
        Expr::App(head, args) if head == "and" => args.iter().map(|a| estimate_cost(cache, a)).sum(),
        Expr::App(head, args) if head == "or" => {
            args.iter().map(|a| estimate_cost(cache, a)).min().unwrap_or(0)
        }
        Expr::App(head, args) if head == "implies" => estimate_cost(cache, &args[1]),
        Expr::App(head, args) if head == "=" => distance(cache, &args[0], &args[1]),
        _ => deep_length(e).saturating_sub(1),
    }
}
