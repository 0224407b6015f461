/*!
The trail: a totally-ordered assignment stack with decision-level markers,
§3 / §4.4.
*/

use crate::model::atom::Atom;
use crate::model::variable::Reason;
use crate::store::Store;
use crate::theory::Theory;

/// Error raised by `enqueue` when its precondition is violated: the atom
/// already has a value. This is a programming error (§7: "invariant
/// violations... are programming errors") and callers outside this crate
/// never observe it — the search loop only calls `enqueue` after checking
/// `Store::value`.
#[derive(Debug)]
pub struct AlreadyAssigned;

/// The assignment stack. `level_starts[l]` is the trail index at which
/// decision level `l` began; slot 0 of the trail is never a decision
/// (level-0 propagations only).
#[derive(Default)]
pub struct Trail {
    atoms: Vec<Atom>,
    level_starts: Vec<usize>,
    /// Index of the next trail entry BCP hasn't consumed yet.
    pub elt_head: usize,
    /// Index of the next trail entry the theory hasn't seen yet.
    pub th_head: usize,
}

impl Trail {
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn decision_level(&self) -> usize {
        self.level_starts.len()
    }

    pub fn level_start(&self, level: usize) -> usize {
        if level == 0 {
            0
        } else {
            self.level_starts[level - 1]
        }
    }

    /// Enqueues `atom`, asserting it at `level` for `reason`.
    ///
    /// Precondition: `atom`'s variable is currently unassigned.
    pub fn enqueue<T: Theory>(
        &mut self,
        store: &mut Store<T>,
        atom: Atom,
        level: usize,
        reason: Reason<T>,
    ) -> Result<(), AlreadyAssigned> {
        if store.value(atom).is_some() {
            return Err(AlreadyAssigned);
        }
        store.assign_true(atom);
        let var = store.variable_mut(atom.var());
        var.level = level as i32;
        var.reason = reason;
        self.atoms.push(atom);
        Ok(())
    }

    /// Records the start of a new decision level and asks the theory to
    /// mirror the push.
    pub fn new_decision_level<T: Theory>(&mut self, theory: &mut T) {
        self.level_starts.push(self.atoms.len());
        if T::HAS_THEORY {
            theory.push_level();
        }
    }

    /// Truncates the trail back to decision level `level`, retaining
    /// late-propagated atoms (those whose recorded level is `<= level`) at
    /// the front of the surviving slice and unassigning everything else.
    pub fn cancel_until<T: Theory>(&mut self, store: &mut Store<T>, theory: &mut T, level: usize) {
        if self.decision_level() <= level {
            return;
        }
        let start = self.level_start(level);
        let popped: Vec<Atom> = self.atoms.split_off(start);

        let mut retained = Vec::with_capacity(popped.len());
        for atom in popped {
            let var = atom.var();
            if store.variable(var).level <= level as i32 {
                retained.push(atom);
            } else {
                store.unassign(var);
            }
        }
        self.atoms.extend(retained);

        let popped_levels = self.decision_level() - level;
        self.level_starts.truncate(level);
        // Retained atoms were already propagated and shown to the theory
        // before this cancellation; nothing new needs to be reprocessed.
        self.elt_head = self.atoms.len();
        self.th_head = self.atoms.len();

        if T::HAS_THEORY {
            theory.pop_levels(popped_levels);
        }
    }
}
