//! Error taxonomy for calculator commands

use thiserror::Error;

/// Why a calculator command could not complete.
///
/// The numeric layer never raises; it reports failure with a non-finite
/// sentinel. This enum is how the calculator classifies those sentinels,
/// plus its own precondition failures, for user messaging. A failed command
/// leaves the committed registers untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    /// Malformed literal or rejected parameter.
    #[error("invalid input: {0}")]
    Input(String),

    /// Fewer than four of the five TVM registers are filled.
    #[error("need four of the five TVM registers before solving")]
    InsufficientData,

    /// Two or more registers are blank and the pressed key does not pick a
    /// unique target.
    #[error("more than one register is empty; solve target is ambiguous")]
    AmbiguousTarget,

    /// The solver failed to converge or hit a singularity (zero rate
    /// denominator, non-positive logarithm argument, negative compounding).
    #[error("no finite solution for {0}")]
    Divergence(String),

    /// IRR requested over fewer than two cash flows.
    #[error("IRR needs at least two cash flows")]
    DegenerateSeries,
}
