//! Calculator configuration.
//!
//! Hosts usually build this in code, but it derives `serde` so it can be
//! read from a settings file as well.

use serde::{Deserialize, Serialize};

use crate::currency::Currency;

/// How a change propagates through the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeMode {
    /// Depth-first along subscriber lists. A node reachable along several
    /// paths recalculates once per path. Cycles recurse without bound.
    #[default]
    PerPath,

    /// Every affected node recalculates once per mutation, in topological
    /// order. A cycle among affected nodes is an error.
    Coalesced,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Currencies known in addition to the built-in ones.
    pub extra_currencies: Vec<Currency>,

    pub cascade: CascadeMode,
}

impl CalculatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_currencies(mut self, currencies: impl IntoIterator<Item = Currency>) -> Self {
        self.extra_currencies.extend(currencies);
        self
    }

    pub fn with_cascade(mut self, cascade: CascadeMode) -> Self {
        self.cascade = cascade;
        self
    }
}
