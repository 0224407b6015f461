/*!
The search loop: restarts, clause-DB reduction, and branch selection, §4.7.
*/

use std::collections::VecDeque;

use log::trace;

use crate::analysis;
use crate::bcp;
use crate::callbacks::Callbacks;
use crate::logging::targets;
use crate::model::atom::Atom;
use crate::model::clause::ClauseId;
use crate::model::variable::Reason;
use crate::settings::Config;
use crate::store::Store;
use crate::theory::Theory;
use crate::trail::Trail;

/// Running counters exposed by `Solver`'s introspection API (§6).
#[derive(Default, Clone, Copy)]
pub struct Stats {
    pub n_conflicts: u64,
    pub n_decisions: u64,
    pub n_propagations: u64,
    pub n_minimized_away: u64,
}

/// Outcome of one call to `search`.
pub enum SearchResult {
    Sat,
    Unsat(ClauseId),
    /// The given subset of `assumptions` is, on its own, already
    /// unsatisfiable (§6 `unsat_assumptions`).
    UnsatAssumptions(Vec<Atom>),
}

/// Runs CDCL(T) search to completion against `assumptions`, which are forced
/// true as pseudo-decisions ahead of any heap-chosen branch (§9 "Assumption
/// semantics").
pub fn search<T: Theory>(
    store: &mut Store<T>,
    trail: &mut Trail,
    theory: &mut T,
    config: &Config,
    assumptions: &[Atom],
    stats: &mut Stats,
    callbacks: &mut Callbacks,
) -> SearchResult {
    let mut next_decisions: VecDeque<Atom> = VecDeque::new();
    let mut n_conflicts_budget = config.restart_first as f64;
    let mut n_learnts_budget = (store.hyps().len() as f64) * config.learntsize_factor;
    let mut conflict_c: u64 = 0;

    loop {
        let before = trail.len();
        let conflict = bcp::run_to_fixpoint(store, trail, theory, &mut next_decisions);
        stats.n_propagations += trail.len().saturating_sub(before) as u64;

        if let Some(conflict_cid) = conflict {
            stats.n_conflicts += 1;
            conflict_c += 1;
            callbacks.fire_conflict(conflict_cid);

            let conflict_level = store
                .clause(conflict_cid)
                .atoms
                .iter()
                .map(|a| store.variable(a.var()).level)
                .max()
                .unwrap_or(0);

            if trail.decision_level() == 0 || conflict_level <= 0 {
                trace!(target: targets::SEARCH, "unsat at level 0, conflict {conflict_cid:?}");
                return SearchResult::Unsat(conflict_cid);
            }

            let result = analysis::analyze_and_learn(store, trail, theory, conflict_cid);
            stats.n_minimized_away += result.n_minimized_away as u64;
            store.decay_var_activity();
            store.decay_clause_activity();
            continue;
        }

        if (conflict_c as f64) >= n_conflicts_budget {
            trace!(target: targets::SEARCH, "restart after {conflict_c} conflicts");
            trail.cancel_until(store, theory, 0);
            n_conflicts_budget *= config.restart_inc;
            n_learnts_budget *= config.learntsize_inc;
            conflict_c = 0;
            continue;
        }

        if (store.learnts().len() as f64) - (trail.len() as f64) > n_learnts_budget {
            let half = store.learnts().len() / 2;
            let keep = half.max(n_learnts_budget as usize);
            let n_dead = store.reduce_db(keep);
            trace!(target: targets::REDUCTION, "reduced {n_dead} learnt clauses, keeping {keep}");
        }

        match pick_branch(store, trail, theory, assumptions, &mut next_decisions, stats, callbacks) {
            Branch::Decided => continue,
            Branch::Sat => return SearchResult::Sat,
            Branch::UnsatAssumptions(core) => return SearchResult::UnsatAssumptions(core),
        }
    }
}

enum Branch {
    Decided,
    Sat,
    UnsatAssumptions(Vec<Atom>),
}

/// Chooses and enqueues the next decision, per §4.7's priority order:
/// pending theory decisions, then assumptions, then the activity heap.
fn pick_branch<T: Theory>(
    store: &mut Store<T>,
    trail: &mut Trail,
    theory: &mut T,
    assumptions: &[Atom],
    next_decisions: &mut VecDeque<Atom>,
    stats: &mut Stats,
    callbacks: &mut Callbacks,
) -> Branch {
    while let Some(atom) = next_decisions.pop_front() {
        if store.value(atom).is_none() {
            let level = trail.decision_level() + 1;
            trail.new_decision_level(theory);
            trail
                .enqueue(store, atom, level, Reason::Decision)
                .expect("theory decision atom was already assigned");
            stats.n_decisions += 1;
            callbacks.fire_decision(atom);
            return Branch::Decided;
        }
    }

    loop {
        if trail.decision_level() >= assumptions.len() {
            break;
        }
        let lit = assumptions[trail.decision_level()];
        match store.value(lit) {
            Some(true) => {
                // Already forced true at an earlier level: push a pseudo
                // level to keep decision level aligned with assumption
                // index, then move on to the next assumption.
                trail.new_decision_level(theory);
                continue;
            }
            Some(false) => {
                let core = analyze_final(store, lit);
                return Branch::UnsatAssumptions(core);
            }
            None => {
                let level = trail.decision_level() + 1;
                trail.new_decision_level(theory);
                trail
                    .enqueue(store, lit, level, Reason::Decision)
                    .expect("assumption atom was already assigned");
                stats.n_decisions += 1;
                callbacks.fire_decision(lit);
                return Branch::Decided;
            }
        }
    }

    match store.pop_decision_var() {
        Some(var) => {
            let atom = store.default_polarity_atom(var);
            let level = trail.decision_level() + 1;
            trail.new_decision_level(theory);
            trail
                .enqueue(store, atom, level, Reason::Decision)
                .expect("heap-chosen variable was already assigned");
            stats.n_decisions += 1;
            callbacks.fire_decision(atom);
            Branch::Decided
        }
        None => Branch::Sat,
    }
}

/// Computes a local unsat core over `assumptions` when `failed` (an
/// assumption literal) is already false. Walks the implication graph behind
/// `neg(failed)` collecting every decision literal encountered — these are
/// exactly the earlier assumptions that forced `failed` false — and adds
/// `failed` itself, since it is always part of the witnessing core.
fn analyze_final<T: Theory>(store: &mut Store<T>, failed: Atom) -> Vec<Atom> {
    let mut core = vec![failed];
    let mut touched = Vec::new();
    let mut queue = VecDeque::from([failed.neg()]);

    while let Some(a) = queue.pop_front() {
        let var = a.var();
        if store.variable(var).seen {
            continue;
        }
        store.variable_mut(var).seen = true;
        touched.push(var);

        match store.variable(var).reason.clone() {
            Reason::Decision => core.push(a),
            Reason::Bcp(cid) => {
                for q in store.clause(cid).atoms.clone() {
                    if q.var() != var {
                        queue.push_back(q);
                    }
                }
            }
            Reason::BcpLazy(lazy) => {
                let cid = lazy.force(store);
                for q in store.clause(cid).atoms.clone() {
                    if q.var() != var {
                        queue.push_back(q);
                    }
                }
            }
        }
    }

    for var in touched {
        store.variable_mut(var).seen = false;
    }
    core.sort();
    core.dedup();
    core
}
