/*!
A library for determining the satisfiability of boolean formulas, combined
with an arbitrary background theory, via conflict-driven clause learning.

cdclt is a CDCL(T) core: the Boolean engine (store, watch-lists, BCP,
first-UIP conflict analysis, restarts, clause-DB reduction, resolution
proofs) plus a narrow bridge to a caller-supplied [theory](crate::theory).
It implements none of the theory solvers itself, no formula representation
beyond the caller's own [`Formula`](crate::model::formula::Formula), and no
file parsers or CLI: those live above this crate.

# Orientation

The library is organized around [`Solver`](crate::solver::Solver), generic
over a [`Theory`](crate::theory::Theory) implementation. For pure Boolean
SAT, [`NullTheory`](crate::theory::NullTheory) is a no-op theory.

- [`model`] — atoms, variables, clauses, and the host-supplied `Formula`
  trait.
- [`store`] — the struct-of-arrays pool of variables, atoms, and clauses,
  plus the VSIDS activity heap.
- [`trail`] — the assignment stack and decision-level bookkeeping.
- [`bcp`] — two-watched-literal unit propagation, interleaved with theory
  checks.
- [`analysis`] — first-UIP conflict analysis and clause minimization.
- [`search`] — the outer loop: restarts, clause-DB reduction, branching.
- [`proof`] — resolution-proof reconstruction and unsat-core extraction.
- [`theory`] — the CDCL(T) bridge contract a host theory implements.
- [`solver`] — the public API: `create`, `assume`, `add_clause`, `solve`.

# Logs

Calls to [log!](log) are made throughout, under the targets listed in
[`logging::targets`]. No log implementation is linked by this crate; a host
binary picks its own sink, e.g. [env_logger](https://docs.rs/env_logger).
*/

#![allow(clippy::collapsible_else_if)]
#![allow(clippy::derivable_impls)]
#![allow(clippy::single_match)]

pub mod analysis;
pub mod bcp;
pub mod callbacks;
pub mod err;
pub mod logging;
pub mod model;
pub mod proof;
pub mod search;
pub mod settings;
pub mod solver;
pub mod store;
pub mod theory;
pub mod trail;
