/*!
The store: pools variables, atoms, and clauses and owns their per-entity
mutable state, §4.1.

Per-variable and per-atom fields are dense, struct-of-arrays vectors indexed
by `vid`/atom-index rather than per-variable heap objects, favoring cache
locality in the propagation hot loop (§9 "Store as struct-of-arrays").
*/

pub mod heap;

use std::collections::HashMap;

use crate::model::atom::{Atom, Vid};
use crate::model::clause::{Clause, ClauseFlags, ClauseId, Premise};
use crate::model::formula::{Formula, Sign};
use crate::model::variable::{Reason, Variable};
use crate::settings::Config;
use crate::store::heap::ActivityHeap;
use crate::theory::Theory;

/// Pools variables, atoms, and clauses; owns per-entity mutable state.
pub struct Store<T: Theory> {
    variables: Vec<Variable<T>>,
    /// Indexed by `vid`: `Some(true)` means the positive atom (`2v`) holds,
    /// `Some(false)` means the negative atom (`2v+1`) holds.
    value: Vec<Option<bool>>,
    /// Indexed by atom index: the clauses watching that literal (§4.5, §9
    /// "Watch lists embedded in atoms").
    watched: Vec<Vec<ClauseId>>,
    canonical: Vec<T::Formula>,
    intern: HashMap<T::Formula, Vid>,

    clauses: Vec<Clause<T>>,
    hyps: Vec<ClauseId>,
    learnts: Vec<ClauseId>,

    heap: ActivityHeap,
    var_incr: f64,
    clause_incr: f64,
    var_decay: f64,
    clause_decay: f64,

    pub store_proof: bool,
}

const RESCALE_THRESHOLD: f64 = 1e100;
const RESCALE_FACTOR: f64 = 1e-100;

impl<T: Theory> Store<T> {
    pub fn new(config: &Config) -> Self {
        let hint = config.size.hint_vars();
        Store {
            variables: Vec::with_capacity(hint),
            value: Vec::with_capacity(hint),
            watched: Vec::with_capacity(hint * 2),
            canonical: Vec::with_capacity(hint),
            intern: HashMap::with_capacity(hint),
            clauses: Vec::new(),
            hyps: Vec::new(),
            learnts: Vec::new(),
            heap: ActivityHeap::default(),
            var_incr: 1.0,
            clause_incr: 1.0,
            var_decay: config.var_decay,
            clause_decay: config.clause_decay,
            store_proof: config.store_proof,
        }
    }

    pub fn n_vars(&self) -> usize {
        self.variables.len()
    }

    pub fn n_clauses(&self) -> usize {
        self.hyps.len() + self.learnts.len()
    }

    // -- Atom / variable allocation -----------------------------------

    /// Interns `formula`'s canonical form, allocating a fresh variable if
    /// this is the first time it's been seen, and returns the atom
    /// representing `formula`'s original (un-normalized) occurrence.
    ///
    /// Never re-enters BCP. Fresh variables are inserted into the activity
    /// heap with weight 0 (§4.1).
    pub fn alloc_atom(&mut self, formula: T::Formula) -> Atom {
        let (canonical, sign) = formula.norm();
        let vid = match self.intern.get(&canonical) {
            Some(&vid) => vid,
            None => {
                let vid = self.variables.len() as Vid;
                self.variables.push(Variable::fresh());
                self.value.push(None);
                self.watched.push(Vec::new());
                self.watched.push(Vec::new());
                self.canonical.push(canonical.clone());
                self.intern.insert(canonical, vid);
                self.heap.insert(vid, 0.0);
                vid
            }
        };
        Atom::new(vid, sign == Sign::Negated)
    }

    /// Looks up the atom representing `formula`'s occurrence without
    /// allocating; `None` means the formula has never been seen, and is
    /// therefore necessarily unvalued.
    pub fn lookup_atom(&self, formula: &T::Formula) -> Option<Atom> {
        let (canonical, sign) = formula.norm();
        self.intern
            .get(&canonical)
            .map(|&vid| Atom::new(vid, sign == Sign::Negated))
    }

    /// The host formula represented by `atom`.
    pub fn atom_to_formula(&self, atom: Atom) -> T::Formula {
        let base = self.canonical[atom.var() as usize].clone();
        if atom.sign() {
            base.negate()
        } else {
            base
        }
    }

    pub fn variable(&self, var: Vid) -> &Variable<T> {
        &self.variables[var as usize]
    }

    pub fn variable_mut(&mut self, var: Vid) -> &mut Variable<T> {
        &mut self.variables[var as usize]
    }

    /// Unmarks `atom`'s variable's `seen` flag (§4.1: `clear_mark` unmarks
    /// both the atom and its negation, which share one variable-level mark).
    pub fn clear_mark(&mut self, atom: Atom) {
        self.variables[atom.var() as usize].seen = false;
    }

    // -- Valuation ------------------------------------------------------

    pub fn value(&self, atom: Atom) -> Option<bool> {
        self.value[atom.var() as usize].map(|b| b != atom.sign())
    }

    pub fn is_true(&self, atom: Atom) -> bool {
        self.value(atom) == Some(true)
    }

    pub fn is_false(&self, atom: Atom) -> bool {
        self.value(atom) == Some(false)
    }

    /// Assigns `atom` to true, without touching level/reason bookkeeping
    /// (the `Trail` owns that). Precondition: `atom`'s variable is
    /// currently unassigned.
    pub(crate) fn assign_true(&mut self, atom: Atom) {
        debug_assert!(self.value[atom.var() as usize].is_none());
        self.value[atom.var() as usize] = Some(!atom.sign());
        self.heap.remove(atom.var());
    }

    /// Clears `var`'s value and reinserts it into the activity heap.
    pub(crate) fn unassign(&mut self, var: Vid) {
        self.value[var as usize] = None;
        self.variables[var as usize].level = -1;
        self.variables[var as usize].reason = Reason::Decision;
        self.heap.activate(var);
    }

    pub fn pop_decision_var(&mut self) -> Option<Vid> {
        self.heap.pop_max()
    }

    pub fn default_polarity_atom(&self, var: Vid) -> Atom {
        Atom::new(var, !self.variables[var as usize].default_polarity)
    }

    // -- Activity --------------------------------------------------------

    pub fn bump_var_activity(&mut self, var: Vid) {
        self.heap.bump(var, self.var_incr);
        if self.heap.weight(var) > RESCALE_THRESHOLD {
            self.heap.rescale_all(RESCALE_FACTOR);
            self.var_incr *= RESCALE_FACTOR;
        }
    }

    pub fn decay_var_activity(&mut self) {
        self.var_incr *= self.var_decay;
    }

    pub fn bump_clause_activity(&mut self, cid: ClauseId) {
        self.clauses[cid.index()].activity += self.clause_incr;
        if self.clauses[cid.index()].activity > RESCALE_THRESHOLD {
            for c in self.clauses.iter_mut() {
                c.activity *= RESCALE_FACTOR;
            }
            self.clause_incr *= RESCALE_FACTOR;
        }
    }

    pub fn decay_clause_activity(&mut self) {
        self.clause_incr *= self.clause_decay;
    }

    // -- Clauses -----------------------------------------------------

    pub fn clause(&self, cid: ClauseId) -> &Clause<T> {
        &self.clauses[cid.index()]
    }

    pub fn clause_mut(&mut self, cid: ClauseId) -> &mut Clause<T> {
        &mut self.clauses[cid.index()]
    }

    pub fn hyps(&self) -> &[ClauseId] {
        &self.hyps
    }

    pub fn learnts(&self) -> &[ClauseId] {
        &self.learnts
    }

    /// Allocates a clause (§4.3: `O(|atoms|)`). Does not attach it to the
    /// watch-lists and does not record it in the hypothesis/learnt vectors
    /// — callers decide that according to how the clause is being used.
    pub fn make_clause(&mut self, atoms: Vec<Atom>, premise: Premise<T>) -> ClauseId {
        let premise = if self.store_proof {
            premise
        } else {
            Premise::EmptyPremise
        };
        let id = ClauseId::new(self.clauses.len() as u32);
        self.clauses.push(Clause {
            id,
            atoms,
            activity: 0.0,
            flags: ClauseFlags::empty(),
            premise,
        });
        id
    }

    /// Attaches a clause of length >= 2 to the watch-lists of its first two
    /// atoms (A3) and records it as permanent (`hyps`) or removable
    /// (`learnts`).
    pub fn attach_clause(&mut self, cid: ClauseId, removable: bool) {
        self.attach_clause_tracked(cid, removable, true)
    }

    /// As `attach_clause`, but `track` controls whether the clause is
    /// appended to the `hyps`/`learnts` bookkeeping vector. Used for
    /// length-2 learnt clauses (§4.6 "Recording" only mandates bookkeeping
    /// for learnt clauses of length >= 3; shorter ones are still watched —
    /// dropping their watch would let BCP silently miss them forever after
    /// a later backtrack — but are not candidates for `reduce_db`).
    pub fn attach_clause_tracked(&mut self, cid: ClauseId, removable: bool, track: bool) {
        let clause = &mut self.clauses[cid.index()];
        clause.flags.insert(ClauseFlags::ATTACHED);
        if removable {
            clause.flags.insert(ClauseFlags::REMOVABLE);
        }
        debug_assert!(clause.atoms.len() >= 2);
        let a0 = clause.atoms[0];
        let a1 = clause.atoms[1];
        self.watched[a0.index()].push(cid);
        self.watched[a1.index()].push(cid);
        if !track {
            return;
        }
        if removable {
            self.learnts.push(cid);
        } else {
            self.hyps.push(cid);
        }
    }

    /// Records a unit or hypothesis-but-not-attached clause purely for
    /// bookkeeping (no watch-list entries).
    pub fn record_hyp(&mut self, cid: ClauseId) {
        self.hyps.push(cid);
    }

    pub fn watched(&self, atom: Atom) -> &[ClauseId] {
        &self.watched[atom.index()]
    }

    pub fn watched_mut(&mut self, atom: Atom) -> &mut Vec<ClauseId> {
        &mut self.watched[atom.index()]
    }

    /// Sorts `learnts` by descending activity and marks the clauses beyond
    /// `keep` as dead, dropping them from the bookkeeping vector (watch-list
    /// tombstones are swept lazily by BCP, per §4.3's lifecycle note).
    /// Permanent clauses are never touched.
    pub fn reduce_db(&mut self, keep: usize) -> usize {
        if self.learnts.len() <= keep {
            return 0;
        }
        let clauses = &self.clauses;
        self.learnts
            .sort_by(|&a, &b| clauses[b.index()].activity.total_cmp(&clauses[a.index()].activity));
        let dead: Vec<ClauseId> = self.learnts.split_off(keep);
        let n_dead = dead.len();
        for cid in dead {
            self.clauses[cid.index()].flags.insert(ClauseFlags::DEAD);
        }
        n_dead
    }
}
