mod common;

use cdclt::solver::Outcome;

use common::{clause, solver, Lit};

#[test]
fn single_assumption_contradicts_hypothesis() {
    // S3: p, with assumption ¬p ⇒ UNSAT with unsat_assumptions() = [¬p].
    let mut s = solver();
    clause(&mut s, &[1]);

    let not_p = s.atom(Lit(-1));
    assert_eq!(s.solve(&[not_p]).unwrap(), Outcome::Unsat);
    assert_eq!(s.unsat_assumptions(), &[not_p]);
}

#[test]
fn assumption_refuted_through_a_chain_of_implications() {
    let mut s = solver();
    clause(&mut s, &[-1, 2]);
    clause(&mut s, &[-2, 3]);
    clause(&mut s, &[-3, 4]);
    clause(&mut s, &[-4]);

    let p = s.atom(Lit(1));
    assert_eq!(s.solve(&[p]).unwrap(), Outcome::Unsat);
    assert!(s.unsat_assumptions().contains(&p));
}

#[test]
fn satisfiable_assumption_still_solves() {
    let mut s = solver();
    clause(&mut s, &[1, 2]);

    let p = s.atom(Lit(1));
    assert_eq!(s.solve(&[p]).unwrap(), Outcome::Sat);
    assert_eq!(s.eval(p), Ok(true));
}
