//! Solver tunables, §10.3.
//!
//! Grounded on the teacher's `Config`/`ConfigOption` pattern: one struct
//! carrying every constant named in §4.2/§4.7, plus a size hint used only to
//! pre-size the `Store`'s backing vectors (mirroring the teacher's
//! `AtomDBConfig`/`ClauseDBConfig`).

/// A rough hint for how large a problem to expect, used only to pre-allocate
/// the `Store`'s per-variable and per-atom vectors.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Size {
    Tiny,
    #[default]
    Small,
    Big,
}

impl Size {
    /// An initial variable-count guess, purely a capacity hint.
    pub fn hint_vars(self) -> usize {
        match self {
            Size::Tiny => 16,
            Size::Small => 256,
            Size::Big => 1 << 16,
        }
    }
}

/// Solver configuration. `Config::default()` reproduces the constants §4.2
/// and §4.7 fix.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Capacity hint for the `Store`.
    pub size: Size,
    /// Whether clause premises are tracked so a proof/unsat-core can be
    /// reconstructed after UNSAT (§4.9).
    pub store_proof: bool,

    /// VSIDS activity multiplier applied to `var_incr` after every conflict.
    pub var_decay: f64,
    /// Activity multiplier applied to `clause_incr` after every conflict.
    pub clause_decay: f64,

    /// Conflicts before the first restart.
    pub restart_first: u32,
    /// Geometric growth factor applied to the restart budget.
    pub restart_inc: f64,
    /// Initial learnt-clause budget, as a fraction of the hypothesis count.
    pub learntsize_factor: f64,
    /// Geometric growth factor applied to the learnt-clause budget.
    pub learntsize_inc: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            size: Size::default(),
            store_proof: true,
            var_decay: 1.0 / 0.95,
            clause_decay: 1.0 / 0.999,
            restart_first: 100,
            restart_inc: 1.5,
            learntsize_factor: 1.0 / 3.0,
            learntsize_inc: 1.1,
        }
    }
}

impl Config {
    pub fn new(size: Size, store_proof: bool) -> Self {
        Config {
            size,
            store_proof,
            ..Config::default()
        }
    }
}
