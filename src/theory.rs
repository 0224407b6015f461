//! The theory-interaction protocol (CDCL(T) bridge), §4.8.
//!
//! A [`Theory`] is supplied entirely by the host: the core never implements
//! congruence closure, linear arithmetic, or any other concrete theory. The
//! bridge only forwards trail activity to the theory and accepts back
//! propagations, decision hints, added clauses, and conflicts through
//! [`TheoryActions`].

use std::collections::VecDeque;

use crate::model::atom::{Atom, LitValue};
use crate::model::clause::Premise;
use crate::model::formula::Formula;
use crate::model::variable::{LazyReason, Reason};
use crate::store::Store;
use crate::trail::Trail;

/// A background theory consulted during search.
///
/// `HAS_THEORY` lets the search loop skip all theory bookkeeping (and the
/// associated `push_level`/`pop_levels` calls) for pure-SAT solving at zero
/// cost; implement it as `const HAS_THEORY: bool = false;` for a no-op
/// theory such as [`NullTheory`].
pub trait Theory: Sized {
    /// The atomic formula type this theory reasons about.
    type Formula: Formula;

    /// An opaque certificate the theory may attach to clauses it produces.
    type Lemma: Clone;

    const HAS_THEORY: bool;

    /// Push a new decision level; the theory must be able to restore this
    /// state on a matching `pop_levels`.
    fn push_level(&mut self);

    /// Pop `levels` decision levels (`levels >= 1`), restoring theory state
    /// to what it was before the corresponding `push_level` calls.
    fn pop_levels(&mut self, levels: usize);

    /// Called at a BCP fixpoint with the slice of atoms assigned since the
    /// last call.
    fn partial_check(&mut self, actions: &mut TheoryActions<'_, Self>);

    /// Called when the Boolean trail is a total assignment with no pending
    /// theory work. Returning without adding clauses, propagations, or
    /// decisions lets the search loop conclude SAT.
    fn final_check(&mut self, actions: &mut TheoryActions<'_, Self>);
}

/// A no-op theory for pure Boolean SAT solving.
#[derive(Default)]
pub struct NullTheory<F: Formula> {
    _marker: std::marker::PhantomData<F>,
}

impl<F: Formula> Theory for NullTheory<F> {
    type Formula = F;
    type Lemma = ();

    const HAS_THEORY: bool = false;

    fn push_level(&mut self) {}
    fn pop_levels(&mut self, _levels: usize) {}
    fn partial_check(&mut self, _actions: &mut TheoryActions<'_, Self>) {}
    fn final_check(&mut self, _actions: &mut TheoryActions<'_, Self>) {}
}

/// A pending clause addition requested by the theory, buffered until the
/// search loop can safely attach it.
pub struct PendingClause<T: Theory> {
    pub atoms: Vec<Atom>,
    pub lemma: Option<T::Lemma>,
    pub keep: bool,
}

/// A conflict the theory has raised: a fresh, unsatisfiable-on-the-current-
/// trail clause, to be treated exactly like a BCP conflict.
pub struct TheoryConflict<T: Theory> {
    pub atoms: Vec<Atom>,
    pub lemma: Option<T::Lemma>,
}

/// The action interface exposed to a [`Theory`] during `partial_check` and
/// `final_check`. Constructed by the search loop; never held past the call.
pub struct TheoryActions<'a, T: Theory> {
    pub(crate) store: &'a mut Store<T>,
    pub(crate) trail: &'a mut Trail,
    pub(crate) window: &'a [Atom],
    pub(crate) level: usize,
    pub(crate) clauses_to_add: &'a mut Vec<PendingClause<T>>,
    pub(crate) next_decisions: &'a mut VecDeque<Atom>,
    pub(crate) conflict: &'a mut Option<TheoryConflict<T>>,
}

impl<'a, T: Theory> TheoryActions<'a, T> {
    /// Atoms assigned since the last call to `partial_check`/`final_check`,
    /// as opaque host formulas.
    pub fn iter_assumptions(&self) -> impl Iterator<Item = T::Formula> + '_ {
        self.window.iter().map(|&a| self.store.atom_to_formula(a))
    }

    /// The current value of `f` on the trail. A formula that has never been
    /// allocated an atom is necessarily undefined; this never allocates one.
    pub fn eval_lit(&self, f: &T::Formula) -> LitValue {
        match self.store.lookup_atom(f) {
            Some(atom) => LitValue::from_option(self.store.value(atom)),
            None => LitValue::Undef,
        }
    }

    /// Ensures `f` has an atom, returning it without touching its value.
    pub fn mk_lit(&mut self, f: &T::Formula) -> Atom {
        self.store.alloc_atom(f.clone())
    }

    /// Adds `f` (with the given sign) to the decision hints consumed by
    /// `pick_branch`, unless it already has a value.
    pub fn add_decision_lit(&mut self, f: &T::Formula, sign: bool) {
        let atom = self.store.alloc_atom(f.clone());
        let lit = if sign { atom } else { atom.neg() };
        if self.store.value(lit).is_none() {
            self.next_decisions.push_back(lit);
        }
    }

    /// Buffers a clause for attachment once the current check returns.
    pub fn add_clause(&mut self, atoms: Vec<Atom>, lemma: Option<T::Lemma>, keep: bool) {
        self.clauses_to_add.push(PendingClause { atoms, lemma, keep });
    }

    /// Propagates `f` with a lazily-materialized justification.
    ///
    /// `explain` is only invoked if conflict analysis ends up needing the
    /// reason clause for `f`; it must return the atoms of a clause in which
    /// `f`'s atom is the sole literal not falsified by the antecedents.
    pub fn propagate(
        &mut self,
        f: T::Formula,
        explain: impl FnOnce(&mut Store<T>) -> Vec<Atom> + 'static,
    ) {
        let atom = self.store.alloc_atom(f);
        match self.store.value(atom) {
            Some(true) => {}
            Some(false) => {
                let atoms = explain(self.store);
                self.conflict
                    .get_or_insert(TheoryConflict { atoms, lemma: None });
            }
            None => {
                let level = self.level;
                let lazy = LazyReason::new(move |store| {
                    let atoms = explain(store);
                    store.make_clause(atoms, Premise::Lemma(None))
                });
                let Self { store, trail, .. } = self;
                trail
                    .enqueue(store, atom, level, Reason::BcpLazy(lazy))
                    .expect("theory propagation of an already-assigned atom");
            }
        }
    }

    /// Raises a theory conflict directly from a fresh clause.
    pub fn raise_conflict(&mut self, atoms: Vec<Atom>, lemma: Option<T::Lemma>) {
        self.conflict.get_or_insert(TheoryConflict { atoms, lemma });
    }
}
