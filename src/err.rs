//! Error types used across the library, §7 / §10.2.
//!
//! One enum per subsystem, each with a `From` impl into the top-level
//! [`SolveError`], mirroring the teacher's `types::err::ErrorKind`. `Unsat`
//! is not an error — it is a `solve()` return value. `UndecidedLit` and
//! `NoProof` are recoverable. Invariant violations inside BCP/analysis are
//! programming errors and panic; they never appear here.

use std::fmt;

use crate::model::clause::ClauseId;

/// A union of the recoverable error kinds surfaced by the public API.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SolveError {
    Build(BuildError),
    Proof(ProofError),
    State(StateError),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::Build(e) => write!(f, "{e}"),
            SolveError::Proof(e) => write!(f, "{e}"),
            SolveError::State(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SolveError {}

impl From<BuildError> for SolveError {
    fn from(e: BuildError) -> Self {
        SolveError::Build(e)
    }
}

impl From<ProofError> for SolveError {
    fn from(e: ProofError) -> Self {
        SolveError::Proof(e)
    }
}

impl From<StateError> for SolveError {
    fn from(e: StateError) -> Self {
        SolveError::State(e)
    }
}

/// Errors raised while adding clauses to the store.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildError {
    /// The clause being added is already unsatisfiable given the level-0
    /// trail, so the store immediately reaches `unsat_at_0`.
    UnsatAtLevelZero,
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::UnsatAtLevelZero => write!(f, "clause is unsatisfiable at decision level 0"),
        }
    }
}

/// Errors raised by `eval`/`eval_level` when an atom has no value yet.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UndecidedLit;

impl fmt::Display for UndecidedLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "atom has no value on the current trail")
    }
}

impl std::error::Error for UndecidedLit {}

/// Errors raised while reconstructing or querying a resolution proof, §4.9.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProofError {
    /// `store_proof = false`, so no premise DAG was recorded.
    NoProof,
    /// A `History` premise had zero, or more than one, pivot atom.
    ResolutionError(ClauseId),
}

impl fmt::Display for ProofError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProofError::NoProof => write!(f, "proof tracking is disabled"),
            ProofError::ResolutionError(cid) => {
                write!(f, "malformed resolution history at {cid:?}")
            }
        }
    }
}

/// Errors raised when an operation is invalid for the solver's current
/// state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StateError {
    /// A solve is already in progress (re-entrant `solve` calls are not
    /// supported; see §5).
    SolveInProgress,
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::SolveInProgress => write!(f, "a solve is already in progress"),
        }
    }
}
