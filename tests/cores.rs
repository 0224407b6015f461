mod common;

use cdclt::proof::Expansion;
use cdclt::settings::{Config, Size};
use cdclt::solver::{Outcome, Solver};
use cdclt::theory::NullTheory;

use common::{clause, solver, Lit};

/// S4: pigeonhole, 3 pigeons into 2 holes. `x_{i,j}` (pigeon `i`, hole `j`)
/// is var `(i-1)*2 + j`: x11=1, x12=2, x21=3, x22=4, x31=5, x32=6.
fn pigeonhole_3_into_2() -> cdclt::solver::Solver<cdclt::theory::NullTheory<common::Lit>> {
    let mut s = solver();
    // Each pigeon sits in at least one hole.
    clause(&mut s, &[1, 2]);
    clause(&mut s, &[3, 4]);
    clause(&mut s, &[5, 6]);
    // No hole holds two pigeons.
    clause(&mut s, &[-1, -3]);
    clause(&mut s, &[-1, -5]);
    clause(&mut s, &[-3, -5]);
    clause(&mut s, &[-2, -4]);
    clause(&mut s, &[-2, -6]);
    clause(&mut s, &[-4, -6]);
    s
}

#[test]
fn pigeonhole_is_unsat() {
    let mut s = pigeonhole_3_into_2();
    assert_eq!(s.solve(&[]).unwrap(), Outcome::Unsat);
}

#[test]
fn pigeonhole_proof_fold_visits_every_leaf_once() {
    let mut s = pigeonhole_3_into_2();
    assert_eq!(s.solve(&[]).unwrap(), Outcome::Unsat);

    let empty = s.get_proof().expect("store_proof defaults to true");

    let visit_counts = s.proof_fold(empty, std::collections::HashMap::new(), |mut counts, cid, _store| {
        *counts.entry(cid).or_insert(0u32) += 1;
        counts
    });
    assert!(visit_counts.values().all(|&n| n == 1));

    let core = s.unsat_core(empty);
    assert!(!core.is_empty());
    assert!(core.len() <= 9);
}

/// S1, with `expand` instead of `proof_fold`: the empty clause's premise is
/// always `History([conflict, ..per-literal proofs])` with at least two
/// entries (the conflict plus one proof per literal), so it always
/// classifies as `HyperRes`, never `Duplicate` — `prove` accepts it too,
/// since a non-empty `History` is exactly what `prove` requires.
#[test]
fn expand_classifies_the_top_level_empty_clause_as_hyper_res() {
    let mut s = solver();
    clause(&mut s, &[1, 2]);
    clause(&mut s, &[-1]);
    clause(&mut s, &[-2]);

    assert_eq!(s.solve(&[]).unwrap(), Outcome::Unsat);
    let empty = s.get_proof().unwrap();

    assert_eq!(s.prove(empty).unwrap(), empty);
    match s.expand(empty).unwrap() {
        Expansion::HyperRes { init, steps } => {
            assert!(!steps.is_empty());
            assert_ne!(init, empty);
        }
        _ => panic!("expected HyperRes"),
    }
}

/// Every leaf `unsat_core` returns is an original hypothesis clause, so
/// `expand` must classify each one as `Hypothesis`.
#[test]
fn expand_classifies_unsat_core_leaves_as_hypotheses() {
    let mut s = pigeonhole_3_into_2();
    assert_eq!(s.solve(&[]).unwrap(), Outcome::Unsat);

    let empty = s.get_proof().unwrap();
    let core = s.unsat_core(empty);
    assert!(!core.is_empty());
    for &cid in &core {
        assert!(matches!(s.expand(cid), Ok(Expansion::Hypothesis)));
    }
}

/// Walking every node reachable from the final proof exercises `expand`
/// across the whole resolution DAG, not just its root: every internal node
/// with more than one history entry is `HyperRes`, every leaf is
/// `Hypothesis`, and (since this run relearns clauses along the way)
/// `Duplicate` nodes — a single-entry `History`, i.e. a clause carried
/// forward without an actual resolution step — are exercised too, though
/// which exact clauses land there depends on the search's decision order,
/// so nothing about *which* id is `Duplicate` is asserted.
#[test]
fn expand_succeeds_on_every_node_of_the_pigeonhole_proof() {
    let mut s = pigeonhole_3_into_2();
    assert_eq!(s.solve(&[]).unwrap(), Outcome::Unsat);
    let empty = s.get_proof().unwrap();

    let nodes = s.proof_fold(empty, Vec::new(), |mut acc, cid, _store| {
        acc.push(cid);
        acc
    });
    assert!(!nodes.is_empty());

    for cid in nodes {
        assert!(s.expand(cid).is_ok(), "expand failed on {cid:?}");
    }
}

/// With proof tracking off, both `prove` and `expand` must report
/// `NoProof` rather than panic or fabricate a DAG.
#[test]
fn prove_and_expand_report_no_proof_when_tracking_is_disabled() {
    let mut s: Solver<NullTheory<Lit>> = Solver::create(NullTheory::default(), Config::new(Size::default(), false));
    clause(&mut s, &[1, 2]);
    clause(&mut s, &[-1]);
    clause(&mut s, &[-2]);

    assert_eq!(s.solve(&[]).unwrap(), Outcome::Unsat);
    let conflict = s.unsat_conflict().expect("an ordinary Boolean conflict, not a failed assumption");

    assert!(s.prove(conflict).is_err());
    assert!(s.expand(conflict).is_err());
}
