//! Observer hooks into the search loop, §6.
//!
//! Grounded on the teacher's `ClauseDB` callback pattern (`Option<Box<dyn
//! FnMut(..)>>` fields with `set_*`/`make_*` accessors): boxed closures the
//! host may install at `create` time to observe conflicts, decisions, and
//! atom allocation without the core depending on any particular logging or
//! metrics crate.

use crate::model::atom::Atom;
use crate::model::clause::ClauseId;

pub type OnConflict = dyn FnMut(ClauseId);
pub type OnDecision = dyn FnMut(Atom);
pub type OnNewAtom = dyn FnMut(Atom);

/// The set of observer callbacks a `Solver` may invoke. All are optional;
/// an absent callback costs a single `Option` check.
#[derive(Default)]
pub struct Callbacks {
    on_conflict: Option<Box<OnConflict>>,
    on_decision: Option<Box<OnDecision>>,
    on_new_atom: Option<Box<OnNewAtom>>,
}

impl Callbacks {
    pub fn set_on_conflict(&mut self, callback: Box<OnConflict>) {
        self.on_conflict = Some(callback);
    }

    pub fn set_on_decision(&mut self, callback: Box<OnDecision>) {
        self.on_decision = Some(callback);
    }

    pub fn set_on_new_atom(&mut self, callback: Box<OnNewAtom>) {
        self.on_new_atom = Some(callback);
    }

    pub fn fire_conflict(&mut self, conflict: ClauseId) {
        if let Some(cb) = &mut self.on_conflict {
            cb(conflict);
        }
    }

    pub fn fire_decision(&mut self, atom: Atom) {
        if let Some(cb) = &mut self.on_decision {
            cb(atom);
        }
    }

    pub fn fire_new_atom(&mut self, atom: Atom) {
        if let Some(cb) = &mut self.on_new_atom {
            cb(atom);
        }
    }
}
