/*!
Resolution-proof reconstruction and inspection, §4.9.

Disabled entirely when `Store::store_proof` is `false`: premises are all
`EmptyPremise`, and every operation here returns `NoProof`.
*/

use std::collections::HashSet;

use crate::err::ProofError;
use crate::model::atom::{Atom, Vid};
use crate::model::clause::{ClauseFlags, ClauseId, Premise};
use crate::model::variable::Reason;
use crate::store::Store;
use crate::theory::Theory;

/// Validates that `c` actually carries a premise (i.e. proof tracking is on
/// and `c` isn't a dangling, pivot-less resolution record).
pub fn prove<T: Theory>(store: &Store<T>, c: ClauseId) -> Result<ClauseId, ProofError> {
    match &store.clause(c).premise {
        Premise::EmptyPremise => Err(ProofError::NoProof),
        Premise::History(parents) if parents.is_empty() => Err(ProofError::ResolutionError(c)),
        _ => Ok(c),
    }
}

/// Resolves a conflicting clause down to the empty clause, recursively
/// materializing a length-1 proof clause for each of its literals.
///
/// If `conflict` is already empty (the degenerate case of a unit-propagated
/// contradiction with no literals) it is returned unchanged.
pub fn prove_unsat<T: Theory>(store: &mut Store<T>, conflict: ClauseId) -> ClauseId {
    if store.clause(conflict).is_empty() {
        return conflict;
    }

    let atoms = store.clause(conflict).atoms.clone();
    let mut history = vec![conflict];
    for atom in atoms {
        history.push(set_atom_proof(store, atom.var()));
    }
    store.make_clause(Vec::new(), Premise::History(history))
}

/// Returns a length-1 clause proving `var`'s assigned literal, resolving its
/// `Bcp`/`BcpLazy` reason clause against proofs of that reason's other
/// literals. A reason clause that is already length 1 needs no further
/// resolution and is returned as-is.
fn set_atom_proof<T: Theory>(store: &mut Store<T>, var: Vid) -> ClauseId {
    let reason = store.variable(var).reason.clone();
    let reason_cid = match reason {
        Reason::Bcp(cid) => cid,
        Reason::BcpLazy(lazy) => lazy.force(store),
        Reason::Decision => unreachable!("proving through a decision literal"),
    };

    if store.clause(reason_cid).len() == 1 {
        return reason_cid;
    }

    let atoms = store.clause(reason_cid).atoms.clone();
    let implied = atoms
        .iter()
        .copied()
        .find(|a| a.var() == var)
        .expect("reason clause must mention the variable it implies");
    let others: Vec<Atom> = atoms.into_iter().filter(|a| a.var() != var).collect();

    let mut history = vec![reason_cid];
    for other in others {
        history.push(set_atom_proof(store, other.var()));
    }
    store.make_clause(vec![implied], Premise::History(history))
}

/// A classified view of a clause's premise, per §4.9.
pub enum Expansion {
    Hypothesis,
    Assumption,
    Lemma,
    /// `History([c])` with no resolution steps: `c` is reused verbatim.
    Duplicate(ClauseId),
    /// `History([c0, c1, ..])`: `c0` resolved in turn against `c1, c2, ..`
    /// along the given pivots.
    HyperRes {
        init: ClauseId,
        steps: Vec<(Atom, ClauseId)>,
    },
}

/// Classifies `c`'s premise, reconstructing pivots for a resolution chain.
pub fn expand<T: Theory>(store: &Store<T>, c: ClauseId) -> Result<Expansion, ProofError> {
    match &store.clause(c).premise {
        Premise::Hyp(_) => Ok(Expansion::Hypothesis),
        Premise::Local => Ok(Expansion::Assumption),
        Premise::Lemma(_) => Ok(Expansion::Lemma),
        Premise::EmptyPremise => Err(ProofError::NoProof),
        Premise::History(history) => {
            if history.is_empty() {
                return Err(ProofError::ResolutionError(c));
            }
            if history.len() == 1 {
                return Ok(Expansion::Duplicate(history[0]));
            }
            let steps = find_pivots(store, history)?;
            Ok(Expansion::HyperRes {
                init: history[0],
                steps,
            })
        }
    }
}

/// For each resolution step `c0 ⊗ c1 ⊗ .. ⊗ cn`, recovers the pivot atom
/// consumed at each step: the unique literal of the running resolvent whose
/// negation occurs in the next parent clause.
fn find_pivots<T: Theory>(store: &Store<T>, history: &[ClauseId]) -> Result<Vec<(Atom, ClauseId)>, ProofError> {
    let mut acc: HashSet<Atom> = store.clause(history[0]).atoms.iter().copied().collect();
    let mut steps = Vec::with_capacity(history.len() - 1);

    for &parent in &history[1..] {
        let parent_atoms: HashSet<Atom> = store.clause(parent).atoms.iter().copied().collect();
        let candidates: Vec<Atom> = acc.iter().copied().filter(|a| parent_atoms.contains(&a.neg())).collect();
        if candidates.len() != 1 {
            return Err(ProofError::ResolutionError(parent));
        }
        let pivot = candidates[0];
        acc.remove(&pivot);
        acc.remove(&pivot.neg());
        for &a in &parent_atoms {
            if a != pivot.neg() {
                acc.insert(a);
            }
        }
        steps.push((pivot, parent));
    }

    Ok(steps)
}

/// Iterative DFS over the premise DAG rooted at `p`, collecting every
/// `Hyp`/`Lemma`/`Local` leaf exactly once. Uses `ClauseFlags::VISITED` as a
/// transient marker, resetting it on every exit path.
pub fn unsat_core<T: Theory>(store: &mut Store<T>, p: ClauseId) -> Vec<ClauseId> {
    let mut core = Vec::new();
    let mut touched = Vec::new();
    let mut stack = vec![p];

    while let Some(cid) = stack.pop() {
        if store.clause(cid).flags.contains(ClauseFlags::VISITED) {
            continue;
        }
        store.clause_mut(cid).flags.insert(ClauseFlags::VISITED);
        touched.push(cid);

        match &store.clause(cid).premise {
            Premise::Hyp(_) | Premise::Lemma(_) | Premise::Local => core.push(cid),
            Premise::History(parents) => stack.extend(parents.iter().copied()),
            Premise::EmptyPremise => {}
        }
    }

    for cid in touched {
        store.clause_mut(cid).flags.remove(ClauseFlags::VISITED);
    }
    core
}

enum Task {
    Enter(ClauseId),
    Leave(ClauseId),
}

/// Post-order fold over the premise DAG: `f` sees a clause's parents before
/// the clause itself. Shared subproofs are folded once, at first visit.
pub fn fold<T, A, F>(store: &Store<T>, p: ClauseId, init: A, mut f: F) -> A
where
    T: Theory,
    F: FnMut(A, ClauseId, &Store<T>) -> A,
{
    let mut acc = init;
    let mut visited = HashSet::new();
    let mut stack = vec![Task::Enter(p)];

    while let Some(task) = stack.pop() {
        match task {
            Task::Enter(cid) => {
                if !visited.insert(cid) {
                    continue;
                }
                stack.push(Task::Leave(cid));
                if let Premise::History(parents) = &store.clause(cid).premise {
                    for &parent in parents {
                        stack.push(Task::Enter(parent));
                    }
                }
            }
            Task::Leave(cid) => {
                acc = f(acc, cid, store);
            }
        }
    }

    acc
}
