/*!
Two-watched-literal Boolean Constraint Propagation, §4.5.

Clauses of length 1 never participate in watching; they are enqueued
directly. Clause-dead tombstones left behind by `reduce_db` are swept
lazily, one watch-list entry at a time, as propagation passes over them.
*/

use std::collections::VecDeque;

use log::trace;

use crate::logging::targets;
use crate::model::atom::Atom;
use crate::model::clause::{ClauseId, Premise};
use crate::model::variable::Reason;
use crate::store::Store;
use crate::theory::{Theory, TheoryActions};
use crate::trail::Trail;

/// Runs Boolean unit propagation to a fixpoint (`elt_head == trail.len()`).
///
/// Returns the id of a conflicting clause, if one was found; propagation
/// stops as soon as a conflict is detected, per §4.5 step 5.
pub fn propagate<T: Theory>(store: &mut Store<T>, trail: &mut Trail) -> Option<ClauseId> {
    while trail.elt_head < trail.len() {
        let a = trail.atoms()[trail.elt_head];
        trail.elt_head += 1;
        let watch_lit = a.neg();

        let mut i = 0;
        while i < store.watched(watch_lit).len() {
            let cid = store.watched(watch_lit)[i];

            if store.clause(cid).is_dead() {
                store.watched_mut(watch_lit).swap_remove(i);
                continue;
            }

            let mut atoms = store.clause(cid).atoms.clone();
            if atoms[0] == watch_lit {
                atoms.swap(0, 1);
            }
            debug_assert_eq!(atoms[1], watch_lit);
            {
                let c = store.clause_mut(cid);
                c.atoms[0] = atoms[0];
                c.atoms[1] = atoms[1];
            }

            if store.is_true(atoms[0]) {
                i += 1;
                continue;
            }

            let replacement = (2..atoms.len()).find(|&k| !store.is_false(atoms[k]));

            if let Some(k) = replacement {
                let new_watch = atoms[k];
                store.clause_mut(cid).atoms.swap(1, k);
                store.watched_mut(watch_lit).swap_remove(i);
                store.watched_mut(new_watch).push(cid);
                continue;
            }

            if store.is_false(atoms[0]) {
                trace!(target: targets::BCP, "conflict in {cid:?}");
                return Some(cid);
            }

            let level = trail.decision_level();
            trail
                .enqueue(store, atoms[0], level, Reason::Bcp(cid))
                .expect("BCP consequence atom was already assigned");
            i += 1;
        }
    }
    None
}

/// Attaches a freshly allocated clause to the watch-lists, or handles its
/// length-0/1 special cases, performing whatever unit propagation or
/// conflict detection its current truth value implies (this step is needed
/// because, unlike the atoms processed by `propagate`, a clause added after
/// search has begun may already be unit or falsified by the existing
/// trail).
///
/// `force_level_zero` forces any resulting unit enqueue to level 0; used for
/// clauses asserted as unconditional hypotheses (§4.5, first line).
pub fn attach_clause_checked<T: Theory>(
    store: &mut Store<T>,
    trail: &mut Trail,
    cid: ClauseId,
    removable: bool,
    force_level_zero: bool,
) -> Result<ClauseId, ClauseId> {
    if store.clause(cid).is_empty() {
        return Err(cid);
    }

    let mut atoms = store.clause(cid).atoms.clone();

    if atoms.len() == 1 {
        store.record_hyp(cid);
        return match store.value(atoms[0]) {
            Some(false) => Err(cid),
            Some(true) => Ok(cid),
            None => {
                let level = if force_level_zero { 0 } else { trail.decision_level() };
                trail
                    .enqueue(store, atoms[0], level, Reason::Bcp(cid))
                    .expect("fresh unit clause's atom was already assigned");
                Ok(cid)
            }
        };
    }

    atoms.sort_by_key(|&a| match store.value(a) {
        Some(true) => 0,
        None => 1,
        Some(false) => 2,
    });
    store.clause_mut(cid).atoms = atoms.clone();
    store.attach_clause(cid, removable);

    if store.is_true(atoms[0]) {
        return Ok(cid);
    }
    if store.value(atoms[1]).is_none() || store.is_true(atoms[1]) {
        return Ok(cid);
    }
    if store.is_false(atoms[0]) {
        return Err(cid);
    }

    let level = if force_level_zero { 0 } else { trail.decision_level() };
    trail
        .enqueue(store, atoms[0], level, Reason::Bcp(cid))
        .expect("clause became unit on attachment");
    Ok(cid)
}

/// Runs Boolean propagation to a fixpoint and interleaves theory checks
/// (§4.5 "Theory interleaving"): whenever BCP reaches a fixpoint and the
/// theory hasn't seen every assigned atom yet, `partial_check` is invoked
/// with the new slice; any clause it adds is attached before propagation
/// resumes, and a single conflict (Boolean or theory-raised) ends the call.
pub fn run_to_fixpoint<T: Theory>(
    store: &mut Store<T>,
    trail: &mut Trail,
    theory: &mut T,
    next_decisions: &mut VecDeque<Atom>,
) -> Option<ClauseId> {
    loop {
        if let Some(conflict) = propagate(store, trail) {
            return Some(conflict);
        }

        if !T::HAS_THEORY || trail.th_head >= trail.elt_head {
            return None;
        }

        let window_start = trail.th_head;
        let window_end = trail.elt_head;
        trail.th_head = window_end;
        let level = trail.decision_level();

        let total_assignment = trail.len() == store.n_vars();
        // `final_check` sees the whole trail; `partial_check` only the new slice.
        let window: Vec<Atom> = if total_assignment {
            trail.atoms()[..window_end].to_vec()
        } else {
            trail.atoms()[window_start..window_end].to_vec()
        };
        let mut clauses_to_add = Vec::new();
        let mut conflict_slot = None;
        {
            let mut actions = TheoryActions {
                store,
                trail,
                window: &window,
                level,
                clauses_to_add: &mut clauses_to_add,
                next_decisions,
                conflict: &mut conflict_slot,
            };
            if total_assignment {
                theory.final_check(&mut actions);
            } else {
                theory.partial_check(&mut actions);
            }
        }

        for pending in clauses_to_add {
            let cid = store.make_clause(pending.atoms, Premise::Lemma(pending.lemma));
            match attach_clause_checked(store, trail, cid, !pending.keep, false) {
                Ok(_) => {}
                Err(conflict) => return Some(conflict),
            }
        }

        if let Some(conflict) = conflict_slot {
            let cid = store.make_clause(conflict.atoms, Premise::Lemma(conflict.lemma));
            if store.clause(cid).atoms.len() >= 2 {
                store.attach_clause(cid, true);
            } else {
                store.record_hyp(cid);
            }
            trace!(target: targets::THEORY, "theory conflict in {cid:?}");
            return Some(cid);
        }
    }
}
