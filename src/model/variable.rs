//! Per-variable state and the justification ("reason") attached to each
//! assigned variable.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::model::clause::ClauseId;
use crate::store::Store;
use crate::theory::Theory;

/// Why a variable holds its current value.
///
/// `BcpLazy` models a theory propagation whose justifying clause is built
/// only if conflict analysis actually walks through it (§4.8, §9 "Lazy BCP
/// reasons").
pub enum Reason<T: Theory> {
    Decision,
    Bcp(ClauseId),
    BcpLazy(LazyReason<T>),
}

impl<T: Theory> Clone for Reason<T> {
    fn clone(&self) -> Self {
        match self {
            Reason::Decision => Reason::Decision,
            Reason::Bcp(cid) => Reason::Bcp(*cid),
            Reason::BcpLazy(lazy) => Reason::BcpLazy(lazy.clone()),
        }
    }
}

impl<T: Theory> fmt::Debug for Reason<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Decision => write!(f, "Decision"),
            Reason::Bcp(cid) => write!(f, "Bcp({cid:?})"),
            Reason::BcpLazy(_) => write!(f, "BcpLazy(..)"),
        }
    }
}

enum LazyState<T: Theory> {
    Pending(Option<Box<dyn FnOnce(&mut Store<T>) -> ClauseId>>),
    Forced(ClauseId),
}

/// A referentially-transparent, force-memoized deferred explanation.
///
/// The thunk materializes the justifying clause for a theory propagation and
/// is invoked at most once; the result is memoized behind a shared cell so
/// every clone of this reason observes the same forced clause.
pub struct LazyReason<T: Theory> {
    inner: Rc<RefCell<LazyState<T>>>,
}

impl<T: Theory> LazyReason<T> {
    pub fn new(thunk: impl FnOnce(&mut Store<T>) -> ClauseId + 'static) -> Self {
        LazyReason {
            inner: Rc::new(RefCell::new(LazyState::Pending(Some(Box::new(thunk))))),
        }
    }

    /// Forces the thunk if it hasn't run yet, returning the justifying
    /// clause's id either way.
    pub fn force(&self, store: &mut Store<T>) -> ClauseId {
        let pending = {
            let mut state = self.inner.borrow_mut();
            match &mut *state {
                LazyState::Forced(cid) => return *cid,
                LazyState::Pending(thunk) => thunk
                    .take()
                    .expect("lazy reason forced while already forcing"),
            }
        };
        let cid = pending(store);
        *self.inner.borrow_mut() = LazyState::Forced(cid);
        cid
    }
}

impl<T: Theory> Clone for LazyReason<T> {
    fn clone(&self) -> Self {
        LazyReason {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Per-variable mutable state, stored densely by `vid` in
/// [`crate::store::Store`].
#[derive(Clone)]
pub struct Variable<T: Theory> {
    /// Decision level at which this variable was assigned, or `-1`.
    pub level: i32,
    /// Why the variable holds its value; meaningless while unassigned.
    pub reason: Reason<T>,
    /// VSIDS activity.
    pub weight: f64,
    /// Position in the activity heap, or `-1` if not present.
    pub heap_index: i32,
    /// Transient mark used by conflict analysis and minimization.
    pub seen: bool,
    /// Preferred sign when this variable is picked for branching.
    pub default_polarity: bool,
}

impl<T: Theory> Variable<T> {
    pub fn fresh() -> Self {
        Variable {
            level: -1,
            reason: Reason::Decision,
            weight: 0.0,
            heap_index: -1,
            seen: false,
            default_polarity: false,
        }
    }
}
