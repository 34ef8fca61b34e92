//! Rate Matrix
//!
//! A dense `n x n` table of conversion factors between the currencies a
//! calculator knows. `convert(v, a, b) = v * rate[a][b]`.
//!
//! Every entry starts at 1. Setting a pair writes both directions: the
//! forward entry is the buy rate, the reverse entry is `1 / sell`, where
//! `sell` defaults to the buy rate. When both are supplied the two
//! directions need not be reciprocal, which models a bid/ask spread.

use indexmap::IndexSet;

use super::Currency;
use crate::error::{CalcError, Result};

#[derive(Debug, Clone)]
pub struct RateMatrix {
    /// Known currencies; the position of a currency is its row/column.
    currencies: IndexSet<Currency>,

    /// Row-major factors.
    rates: Vec<f64>,
}

impl RateMatrix {
    /// Creates a matrix with every factor set to 1.
    pub fn new(currencies: &[Currency]) -> Self {
        let currencies: IndexSet<Currency> = currencies.iter().copied().collect();
        let n = currencies.len();
        Self {
            currencies,
            rates: vec![1.0; n * n],
        }
    }

    pub fn contains(&self, currency: Currency) -> bool {
        self.currencies.contains(&currency)
    }

    fn slot(&self, from: Currency, to: Currency) -> Option<usize> {
        let row = self.currencies.get_index_of(&from)?;
        let col = self.currencies.get_index_of(&to)?;
        Some(row * self.currencies.len() + col)
    }

    /// Factor for `from -> to`, if both are known.
    pub fn rate(&self, from: Currency, to: Currency) -> Option<f64> {
        self.slot(from, to).map(|i| self.rates[i])
    }

    /// Converts `value` from one currency to another.
    pub fn convert(&self, value: f64, from: Currency, to: Currency) -> Result<f64> {
        self.rate(from, to)
            .map(|rate| value * rate)
            .ok_or(CalcError::UnknownCurrencyPair { from, to })
    }

    /// Writes `from -> to = buy` and `to -> from = 1 / sell.unwrap_or(buy)`.
    ///
    /// Rates must be finite and non-zero since the reverse entry is an
    /// inverse. The diagonal is fixed at 1, so `from == to` is rejected.
    pub fn set(&mut self, from: Currency, to: Currency, buy: f64, sell: Option<f64>) -> Result<()> {
        let (forward, reverse) = match (self.slot(from, to), self.slot(to, from)) {
            (Some(f), Some(r)) => (f, r),
            _ => return Err(CalcError::UnknownCurrencyPair { from, to }),
        };

        if from == to {
            return Err(CalcError::InvalidRate { from, to, rate: buy });
        }

        let sell = sell.unwrap_or(buy);
        for rate in [buy, sell] {
            if !rate.is_finite() || rate == 0.0 {
                return Err(CalcError::InvalidRate { from, to, rate });
            }
        }

        self.rates[forward] = buy;
        self.rates[reverse] = 1.0 / sell;

        Ok(())
    }
}
