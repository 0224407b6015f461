/*!
Logging targets used with the [log] macros throughout the library.

No log implementation is linked by this crate; a host binary picks its own
sink (`env_logger`, `log4rs`, ...). Nothing in the core calls `println!`.
*/

/// Targets to use with `log`'s `target:` key, one per subsystem, so a caller
/// can filter with e.g. `RUST_LOG=bcp=trace`.
pub mod targets {
    /// Logs related to the [store](crate::store).
    pub const STORE: &str = "store";

    /// Logs related to [BCP](crate::bcp).
    pub const BCP: &str = "bcp";

    /// Logs related to [conflict analysis](crate::analysis).
    pub const ANALYSIS: &str = "analysis";

    /// Logs related to the [search loop](crate::search).
    pub const SEARCH: &str = "search";

    /// Logs related to the [theory bridge](crate::theory).
    pub const THEORY: &str = "theory";

    /// Logs related to [proof reconstruction](crate::proof).
    pub const PROOF: &str = "proof";

    /// Logs related to clause-database reduction.
    pub const REDUCTION: &str = "reduction";
}
