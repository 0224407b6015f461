/*!
The top-level engine: wires `Store`, `Trail`, a `Theory`, and the search
loop behind the public API, §6.
*/

use crate::bcp;
use crate::callbacks::{Callbacks, OnConflict, OnDecision, OnNewAtom};
use crate::err::{BuildError, ProofError, SolveError, StateError, UndecidedLit};
use crate::model::atom::Atom;
use crate::model::clause::{ClauseId, Premise};
use crate::proof;
use crate::search::{self, SearchResult, Stats};
use crate::settings::Config;
use crate::store::Store;
use crate::theory::Theory;
use crate::trail::Trail;

/// The classification `solve` settles on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Sat,
    Unsat,
}

/// A CDCL(T) solver over theory `T`.
pub struct Solver<T: Theory> {
    store: Store<T>,
    trail: Trail,
    theory: T,
    config: Config,
    callbacks: Callbacks,
    stats: Stats,
    solving: bool,
    /// Set the moment a hypothesis clause is found unsatisfiable at level 0;
    /// once set, every subsequent `solve` short-circuits to `Unsat`.
    unsat_at_0: Option<ClauseId>,
    last_conflict: Option<ClauseId>,
    last_core: Vec<Atom>,
}

impl<T: Theory> Solver<T> {
    /// Builds a solver around `theory`, per the given `config` (§6 `create`).
    pub fn create(theory: T, config: Config) -> Self {
        Solver {
            store: Store::new(&config),
            trail: Trail::default(),
            theory,
            config,
            callbacks: Callbacks::default(),
            stats: Stats::default(),
            solving: false,
            unsat_at_0: None,
            last_conflict: None,
            last_core: Vec::new(),
        }
    }

    pub fn set_on_conflict(&mut self, callback: Box<OnConflict>) {
        self.callbacks.set_on_conflict(callback);
    }

    pub fn set_on_decision(&mut self, callback: Box<OnDecision>) {
        self.callbacks.set_on_decision(callback);
    }

    pub fn set_on_new_atom(&mut self, callback: Box<OnNewAtom>) {
        self.callbacks.set_on_new_atom(callback);
    }

    /// Allocates an atom for `formula`, firing `on_new_atom` the first time
    /// it's seen. Public so a host can turn a formula into the `Atom` that
    /// `eval`/`eval_level`/`true_at_level0` and `solve`'s assumption list
    /// expect.
    pub fn atom(&mut self, formula: T::Formula) -> Atom {
        self.alloc(formula)
    }

    fn alloc(&mut self, formula: T::Formula) -> Atom {
        let before = self.store.n_vars();
        let atom = self.store.alloc_atom(formula);
        if self.store.n_vars() != before {
            self.callbacks.fire_new_atom(atom);
        }
        atom
    }

    /// Adds each clause of `cnf` as a permanent hypothesis (§6 `assume`).
    pub fn assume(&mut self, cnf: Vec<Vec<T::Formula>>, lemma: Option<T::Lemma>) -> Result<(), SolveError> {
        for formulas in cnf {
            let atoms: Vec<Atom> = formulas.into_iter().map(|f| self.alloc(f)).collect();
            self.add_clause(atoms, lemma.clone())?;
        }
        Ok(())
    }

    /// Adds a single permanent clause given as atoms (§6 `add_clause`).
    pub fn add_clause(&mut self, atoms: Vec<Atom>, lemma: Option<T::Lemma>) -> Result<(), SolveError> {
        if self.unsat_at_0.is_some() {
            return Ok(());
        }
        let cid = self.store.make_clause(atoms, Premise::Hyp(lemma));
        match bcp::attach_clause_checked(&mut self.store, &mut self.trail, cid, false, true) {
            Ok(_) => Ok(()),
            Err(conflict) => {
                self.unsat_at_0 = Some(conflict);
                Err(SolveError::Build(BuildError::UnsatAtLevelZero))
            }
        }
    }

    /// As `add_clause`, but given the clause as host formulas (§6
    /// `add_clause_a`).
    pub fn add_clause_a(&mut self, formulas: Vec<T::Formula>, lemma: Option<T::Lemma>) -> Result<(), SolveError> {
        let atoms: Vec<Atom> = formulas.into_iter().map(|f| self.alloc(f)).collect();
        self.add_clause(atoms, lemma)
    }

    /// Runs search under `assumptions`, each forced true as a pseudo-decision
    /// ahead of any heap-chosen branch (§6 `solve`).
    pub fn solve(&mut self, assumptions: &[Atom]) -> Result<Outcome, SolveError> {
        if self.solving {
            return Err(SolveError::State(StateError::SolveInProgress));
        }
        self.solving = true;
        let outcome = self.solve_inner(assumptions);
        self.solving = false;
        outcome
    }

    fn solve_inner(&mut self, assumptions: &[Atom]) -> Result<Outcome, SolveError> {
        if let Some(conflict) = self.unsat_at_0 {
            self.last_conflict = Some(conflict);
            self.last_core.clear();
            return Ok(Outcome::Unsat);
        }

        if self.trail.decision_level() > 0 {
            self.trail.cancel_until(&mut self.store, &mut self.theory, 0);
        }

        let result = search::search(
            &mut self.store,
            &mut self.trail,
            &mut self.theory,
            &self.config,
            assumptions,
            &mut self.stats,
            &mut self.callbacks,
        );

        match result {
            SearchResult::Sat => Ok(Outcome::Sat),
            SearchResult::Unsat(cid) => {
                self.last_conflict = Some(cid);
                self.last_core.clear();
                Ok(Outcome::Unsat)
            }
            SearchResult::UnsatAssumptions(core) => {
                self.last_conflict = None;
                self.last_core = core;
                Ok(Outcome::Unsat)
            }
        }
    }

    /// `true` iff `atom` holds unconditionally, i.e. was fixed at decision
    /// level 0.
    pub fn true_at_level0(&self, atom: Atom) -> bool {
        self.store.variable(atom.var()).level == 0 && self.store.value(atom) == Some(true)
    }

    /// The current value of `atom` on the trail (§6 `eval`).
    pub fn eval(&self, atom: Atom) -> Result<bool, UndecidedLit> {
        self.store.value(atom).ok_or(UndecidedLit)
    }

    /// The decision level at which `atom` became valued.
    pub fn eval_level(&self, atom: Atom) -> Result<usize, UndecidedLit> {
        self.store.value(atom).ok_or(UndecidedLit)?;
        Ok(self.store.variable(atom.var()).level.max(0) as usize)
    }

    /// Iterates the full trail in assignment order.
    pub fn iter_trail(&self) -> impl Iterator<Item = Atom> + '_ {
        self.trail.atoms().iter().copied()
    }

    /// The refuting clause from the most recent `Unsat` outcome, if any (a
    /// local-assumption failure has none; see `unsat_assumptions`).
    pub fn unsat_conflict(&self) -> Option<ClauseId> {
        self.last_conflict
    }

    /// The local unsat core over the assumptions passed to the most recent
    /// `solve`, if that's how it failed.
    pub fn unsat_assumptions(&self) -> &[Atom] {
        &self.last_core
    }

    /// Resolves the most recent `Unsat` conflict down to the empty clause.
    pub fn get_proof(&mut self) -> Result<ClauseId, SolveError> {
        if !self.store.store_proof {
            return Err(SolveError::Proof(ProofError::NoProof));
        }
        let conflict = self
            .last_conflict
            .ok_or(SolveError::Proof(ProofError::NoProof))?;
        Ok(proof::prove_unsat(&mut self.store, conflict))
    }

    /// Validates that `c` carries an actual premise — proof tracking is on
    /// and `c` isn't a dangling, pivot-less resolution record (§4.9 `prove`).
    pub fn prove(&self, c: ClauseId) -> Result<ClauseId, SolveError> {
        proof::prove(&self.store, c).map_err(SolveError::Proof)
    }

    /// Classifies `c`'s premise, reconstructing resolution pivots for a
    /// `History` chain (§4.9 `expand`).
    pub fn expand(&self, c: ClauseId) -> Result<proof::Expansion, SolveError> {
        proof::expand(&self.store, c).map_err(SolveError::Proof)
    }

    /// The set of leaf (`Hyp`/`Lemma`/`Local`) clauses reachable from `p`'s
    /// resolution history, each counted once (§4.9 `unsat_core`).
    pub fn unsat_core(&mut self, p: ClauseId) -> Vec<ClauseId> {
        proof::unsat_core(&mut self.store, p)
    }

    /// Post-order folds `f` over `p`'s resolution history (§4.9 `fold`).
    pub fn proof_fold<A>(&self, p: ClauseId, init: A, f: impl FnMut(A, ClauseId, &Store<T>) -> A) -> A {
        proof::fold(&self.store, p, init, f)
    }

    pub fn n_conflicts(&self) -> u64 {
        self.stats.n_conflicts
    }

    pub fn n_decisions(&self) -> u64 {
        self.stats.n_decisions
    }

    pub fn n_propagations(&self) -> u64 {
        self.stats.n_propagations
    }

    pub fn n_minimized_away(&self) -> u64 {
        self.stats.n_minimized_away
    }

    pub fn decision_level(&self) -> usize {
        self.trail.decision_level()
    }

    pub fn nb_clauses(&self) -> usize {
        self.store.n_clauses()
    }
}
