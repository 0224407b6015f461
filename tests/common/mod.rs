//! A minimal `Formula` used across the integration tests: a signed integer
//! literal, mirroring DIMACS variable numbering without pulling in a parser.

use cdclt::model::formula::{Formula, Sign};
use cdclt::settings::Config;
use cdclt::solver::Solver;
use cdclt::theory::NullTheory;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Lit(pub i32);

impl Formula for Lit {
    fn norm(&self) -> (Self, Sign) {
        if self.0 < 0 {
            (Lit(-self.0), Sign::Negated)
        } else {
            (Lit(self.0), Sign::Same)
        }
    }

    fn negate(&self) -> Self {
        Lit(-self.0)
    }

    fn pp(&self) -> String {
        self.0.to_string()
    }
}

pub fn solver() -> Solver<NullTheory<Lit>> {
    Solver::create(NullTheory::default(), Config::default())
}

/// Adds a clause, ignoring `UnsatAtLevelZero` — some scenarios are
/// deliberately unsat from unit propagation alone, before `solve` ever runs.
pub fn clause(solver: &mut Solver<NullTheory<Lit>>, lits: &[i32]) {
    let formulas = lits.iter().map(|&l| Lit(l)).collect();
    let _ = solver.add_clause_a(formulas, None);
}
