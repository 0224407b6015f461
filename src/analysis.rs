/*!
Conflict analysis: First-UIP learning, clause minimization, and
backtrack-level computation, §4.6.
*/

use log::trace;

use crate::logging::targets;
use crate::model::atom::Atom;
use crate::model::clause::{ClauseId, Premise};
use crate::model::variable::Reason;
use crate::store::Store;
use crate::theory::Theory;
use crate::trail::Trail;

/// Outcome of learning from a single conflict.
pub struct AnalysisResult {
    pub learnt_clause: ClauseId,
    pub backtrack_level: usize,
    pub n_minimized_away: u32,
}

fn reason_clause_id<T: Theory>(store: &mut Store<T>, var: crate::model::atom::Vid) -> ClauseId {
    let reason = store.variable(var).reason.clone();
    match reason {
        Reason::Bcp(cid) => cid,
        Reason::BcpLazy(lazy) => lazy.force(store),
        Reason::Decision => unreachable!("resolving through a decision literal"),
    }
}

/// Analyzes `conflict`, learns an asserting clause, backtracks to the
/// computed level, and enqueues the UIP. Precondition: the search loop has
/// already ruled out the "conflict at decision level 0" case.
pub fn analyze_and_learn<T: Theory>(
    store: &mut Store<T>,
    trail: &mut Trail,
    theory: &mut T,
    conflict: ClauseId,
) -> AnalysisResult {
    let conflict_level = store
        .clause(conflict)
        .atoms
        .iter()
        .map(|a| store.variable(a.var()).level)
        .max()
        .unwrap_or(0);

    let mut learnt: Vec<Atom> = Vec::new();
    let mut history: Vec<ClauseId> = Vec::new();
    let mut touched: Vec<crate::model::atom::Vid> = Vec::new();
    let mut path_c: i32 = 0;

    let mut current = conflict;
    let mut pivot: Option<Atom> = None;
    let mut trail_idx = trail.len();

    history.push(current);

    loop {
        let atoms: Vec<Atom> = store.clause(current).atoms.clone();
        for q in atoms {
            if Some(q) == pivot {
                continue;
            }
            let var = q.var();
            if store.variable(var).seen {
                continue;
            }
            store.variable_mut(var).seen = true;
            touched.push(var);
            let qlevel = store.variable(var).level;
            if qlevel == 0 {
                let rcid = reason_clause_id(store, var);
                history.push(rcid);
            } else if qlevel < conflict_level {
                learnt.push(q);
                store.bump_var_activity(var);
            } else {
                path_c += 1;
            }
        }

        loop {
            trail_idx -= 1;
            let atom = trail.atoms()[trail_idx];
            let var = atom.var();
            if store.variable(var).seen && store.variable(var).level >= conflict_level {
                pivot = Some(atom);
                break;
            }
        }
        let pivot_var = pivot.unwrap().var();
        store.variable_mut(pivot_var).seen = false;
        path_c -= 1;

        if path_c == 0 {
            learnt.insert(0, pivot.unwrap().neg());
            break;
        }

        current = reason_clause_id(store, pivot_var);
        history.push(current);
    }

    // Bump activity of any removable clause consulted during resolution.
    for &cid in &history {
        if store.clause(cid).is_removable() {
            store.bump_clause_activity(cid);
        }
    }

    let abstract_levels: u32 = learnt.iter().fold(0u32, |acc, &a| {
        acc | (1u32 << (store.variable(a.var()).level as u32 % 32))
    });

    let mut n_minimized_away = 0u32;
    let mut i = 1;
    while i < learnt.len() {
        if let Some(local_history) = literal_redundant(store, learnt[i], abstract_levels, &mut touched) {
            history.extend(local_history);
            n_minimized_away += 1;
            learnt.remove(i);
        } else {
            i += 1;
        }
    }

    for var in touched {
        store.variable_mut(var).seen = false;
    }

    learnt.sort_by(|&a, &b| store.variable(b.var()).level.cmp(&store.variable(a.var()).level));

    let backtrack_level = if learnt.len() == 1 {
        0
    } else if store.variable(learnt[0].var()).level > store.variable(learnt[1].var()).level {
        store.variable(learnt[1].var()).level.max(0) as usize
    } else {
        (store.variable(learnt[0].var()).level - 1).max(0) as usize
    };

    trace!(
        target: targets::ANALYSIS,
        "learnt {} literals, backtrack to {backtrack_level}, minimized {n_minimized_away}",
        learnt.len()
    );

    trail.cancel_until(store, theory, backtrack_level);

    let premise = if store.store_proof {
        Premise::History(history)
    } else {
        Premise::EmptyPremise
    };
    let uip = learnt[0];
    let clause_id = store.make_clause(learnt, premise);
    if store.clause(clause_id).len() >= 3 {
        store.attach_clause(clause_id, true);
    } else if store.clause(clause_id).len() == 2 {
        store.attach_clause_tracked(clause_id, true, false);
    } else {
        store.record_hyp(clause_id);
    }

    trail
        .enqueue(store, uip, backtrack_level, Reason::Bcp(clause_id))
        .expect("UIP atom was already assigned");

    AnalysisResult {
        learnt_clause: clause_id,
        backtrack_level,
        n_minimized_away,
    }
}

/// §4.6 minimization: `atom` is redundant in the learnt clause iff every
/// ancestor reachable through its reason chain is either already marked
/// (`seen`), at level 0, or at a level present in `abstract_levels`.
/// Returns the reason clauses consulted along the way when `atom` is
/// confirmed redundant, so the caller can fold them into the proof history.
fn literal_redundant<T: Theory>(
    store: &mut Store<T>,
    atom: Atom,
    abstract_levels: u32,
    touched: &mut Vec<crate::model::atom::Vid>,
) -> Option<Vec<ClauseId>> {
    let mut stack = vec![atom];
    let mut local_history = Vec::new();
    let mut local_marks = Vec::new();

    while let Some(a) = stack.pop() {
        let var = a.var();
        let reason = store.variable(var).reason.clone();
        let rcid = match reason {
            Reason::Decision => {
                for v in local_marks {
                    store.variable_mut(v).seen = false;
                }
                return None;
            }
            Reason::Bcp(cid) => cid,
            Reason::BcpLazy(lazy) => lazy.force(store),
        };
        local_history.push(rcid);

        let antecedents: Vec<Atom> = store.clause(rcid).atoms.clone();
        for q in antecedents {
            if q == a {
                continue;
            }
            let qv = q.var();
            if store.variable(qv).seen {
                continue;
            }
            let qlevel = store.variable(qv).level;
            if qlevel == 0 {
                continue;
            }
            if (1u32 << (qlevel as u32 % 32)) & abstract_levels == 0 {
                for v in local_marks {
                    store.variable_mut(v).seen = false;
                }
                return None;
            }
            store.variable_mut(qv).seen = true;
            local_marks.push(qv);
            touched.push(qv);
            stack.push(q);
        }
    }

    Some(local_history)
}
