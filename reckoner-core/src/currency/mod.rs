//! Currencies
//!
//! A currency is an opaque numeric key. Every calculator knows a fixed set
//! of currencies, chosen at construction: the built-in set plus an optional
//! extension list. There is no process-wide registry; two calculators may
//! know different currencies.
//!
//! `Currency::NONE` is the "not money" sentinel. It never appears in a
//! calculator's known set and marks inputs and fields whose values are not
//! subject to conversion.

mod rates;

pub use rates::RateMatrix;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, Result};

/// Opaque currency key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(u32);

impl Currency {
    /// Not a currency.
    pub const NONE: Currency = Currency(0);
    pub const USD: Currency = Currency(1);
    pub const YEN: Currency = Currency(2);
    pub const RUB: Currency = Currency(3);
    pub const EUR: Currency = Currency(4);

    /// Base assigned to fields and rows when none is configured.
    pub const DEFAULT_BASE: Currency = Currency::RUB;

    /// Currencies every calculator knows, in their canonical order.
    pub const BUILTIN: [Currency; 4] = [Currency::RUB, Currency::USD, Currency::YEN, Currency::EUR];

    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    /// Whether values in this currency take part in conversion.
    pub fn is_money(&self) -> bool {
        *self != Currency::NONE
    }
}

impl From<u32> for Currency {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Currency::NONE => f.write_str("NONE"),
            Currency::USD => f.write_str("USD"),
            Currency::YEN => f.write_str("YEN"),
            Currency::RUB => f.write_str("RUB"),
            Currency::EUR => f.write_str("EUR"),
            Currency(code) => write!(f, "#{}", code),
        }
    }
}

/// Builds the known currency list: the built-ins followed by `extra`.
///
/// Fails on the `NONE` sentinel or on any currency listed twice.
pub fn known_currencies(extra: &[Currency]) -> Result<Vec<Currency>> {
    let mut currencies = Currency::BUILTIN.to_vec();

    for &currency in extra {
        if !currency.is_money() || currencies.contains(&currency) {
            return Err(CalcError::DuplicateCurrency(currency));
        }
        currencies.push(currency);
    }

    Ok(currencies)
}
