//! Error types for the calculator engine.
//!
//! Every fatal condition (bad configuration, unknown names, illegal
//! conversions, out-of-domain values) is reported as a [`CalcError`].
//! Non-fatal conditions are logged through `tracing::warn!` and surface to
//! the caller as a sentinel return value instead.

use thiserror::Error;

use crate::currency::Currency;

/// Convenience alias used across the crate.
pub type Result<T, E = CalcError> = std::result::Result<T, E>;

/// Errors raised by the calculator and its nodes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// A currency passed in the construction-time extension list is already
    /// known, or is the `NONE` sentinel.
    #[error("Duplicate currency index \"{0}\"")]
    DuplicateCurrency(Currency),

    /// An input with the same name was already registered.
    #[error("Input \"{0}\" is already defined")]
    DuplicateInput(String),

    /// A field or row with the same name was already registered.
    #[error("Field \"{0}\" is already defined")]
    DuplicateField(String),

    /// Structural change attempted after `set_ready`.
    #[error("Calculator is finalized")]
    Finalized,

    #[error("Input \"{0}\" not found")]
    InputNotFound(String),

    #[error("Field \"{0}\" not found")]
    FieldNotFound(String),

    /// A currency conversion was requested on an input without a money base.
    #[error("Input \"{0}\" is non money type")]
    NonMoneyInput(String),

    /// A currency conversion was requested on a field without a money base.
    #[error("Field \"{0}\" is non money type")]
    NonMoneyField(String),

    /// The value is not one of the input's enumerated keys.
    #[error("Value \"{value}\" is not valid for input \"{input}\"")]
    InvalidValue {
        /// Input name
        input: String,
        /// Key form of the rejected value
        value: String,
    },

    #[error("No conversion rate from {from} to {to}")]
    UnknownCurrencyPair {
        /// Source currency
        from: Currency,
        /// Target currency
        to: Currency,
    },

    /// A rate that cannot be inverted for the reverse direction.
    #[error("Invalid rate {rate} for {from} -> {to}")]
    InvalidRate {
        /// Source currency
        from: Currency,
        /// Target currency
        to: Currency,
        /// Offending factor
        rate: f64,
    },

    /// Only reported in coalesced cascade mode.
    #[error("Dependency cycle between fields: {}", .0.join(", "))]
    DependencyCycle(Vec<String>),
}
