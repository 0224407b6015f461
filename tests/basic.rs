mod common;

use cdclt::solver::Outcome;

use common::{clause, solver, Lit};

#[test]
fn p_or_q_both_negated_is_unsat() {
    // S1: p ∨ q, ¬p, ¬q ⇒ UNSAT; empty-clause proof exists; unsat core = all three.
    let mut s = solver();
    clause(&mut s, &[1, 2]);
    clause(&mut s, &[-1]);
    clause(&mut s, &[-2]);

    assert_eq!(s.solve(&[]).unwrap(), Outcome::Unsat);

    let empty = s.get_proof().expect("store_proof defaults to true");
    let core = s.unsat_core(empty);
    assert!(!core.is_empty());
    assert!(core.len() <= 3);
}

#[test]
fn p_or_q_with_not_p_is_sat() {
    // S2: p ∨ q, ¬p ⇒ SAT; trail contains ¬p and q; eval(p)=false, eval(q)=true.
    let mut s = solver();
    clause(&mut s, &[1, 2]);
    clause(&mut s, &[-1]);

    assert_eq!(s.solve(&[]).unwrap(), Outcome::Sat);

    let p = s.atom(Lit(1));
    let q = s.atom(Lit(2));
    assert_eq!(s.eval(p), Ok(false));
    assert_eq!(s.eval(q), Ok(true));
}

#[test]
fn solve_is_idempotent_with_no_new_clauses() {
    let mut s = solver();
    clause(&mut s, &[1, 2]);
    clause(&mut s, &[-1]);

    let first = s.solve(&[]).unwrap();
    let second = s.solve(&[]).unwrap();
    assert_eq!(first, second);
}

#[test]
fn all_clauses_satisfied_on_sat() {
    // Round-trip law 6: solve = Sat iff every clause is satisfied by eval.
    let mut s = solver();
    let cnf: &[&[i32]] = &[&[1, 2, 3], &[-1, 2], &[-2, 3], &[-3, -1]];
    for c in cnf {
        clause(&mut s, c);
    }

    assert_eq!(s.solve(&[]).unwrap(), Outcome::Sat);

    for c in cnf {
        let satisfied = c.iter().any(|&l| {
            let atom = s.atom(Lit(l.abs()));
            let want = l > 0;
            s.eval(atom) == Ok(want)
        });
        assert!(satisfied, "clause {c:?} not satisfied");
    }
}

#[test]
fn eval_before_solve_is_undecided() {
    let mut s = solver();
    let p = s.atom(Lit(1));
    assert!(s.eval(p).is_err());
}
