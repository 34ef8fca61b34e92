//! Input Implementation
//!
//! An Input is a leaf node: the caller sets its value directly and every
//! field that declared it as a dependency recalculates.
//!
//! An input may be restricted to an enumerated domain (an ordered map of
//! allowed keys to display labels) and may carry a currency base, in which
//! case its value takes part in conversion.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::currency::{Currency, RateMatrix};
use crate::error::{CalcError, Result};
use crate::value::{Params, Value};

/// Input label: fixed text, or computed from the values of every input.
#[derive(Clone)]
pub enum InputLabel {
    Static(String),
    Computed(Arc<dyn Fn(&Params) -> String + Send + Sync>),
}

impl fmt::Debug for InputLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputLabel::Static(s) => f.debug_tuple("Static").field(s).finish(),
            InputLabel::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Registration options for [`Input`].
#[derive(Debug, Clone, Default)]
pub struct InputOptions {
    value: Option<Value>,
    values: Option<IndexMap<String, String>>,
    base: Currency,
    label: Option<InputLabel>,
}

impl InputOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial value. Falls back to the first enumerated key when unset or
    /// falsy.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Enumerated domain: allowed keys and their display labels.
    pub fn values<I, K, L>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, L)>,
        K: fmt::Display,
        L: Into<String>,
    {
        let values: IndexMap<String, String> = values
            .into_iter()
            .map(|(k, l)| (k.to_string(), l.into()))
            .collect();
        self.values = (!values.is_empty()).then_some(values);
        self
    }

    pub fn base(mut self, base: Currency) -> Self {
        self.base = base;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(InputLabel::Static(label.into()));
        self
    }

    pub fn label_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Params) -> String + Send + Sync + 'static,
    {
        self.label = Some(InputLabel::Computed(Arc::new(f)));
        self
    }
}

/// A leaf value node.
#[derive(Debug)]
pub struct Input {
    name: String,
    value: Value,
    base: Currency,
    values: Option<IndexMap<String, String>>,
    label: InputLabel,
}

impl Input {
    pub(crate) fn new(name: impl Into<String>, options: InputOptions) -> Self {
        let name = name.into();
        let InputOptions {
            value,
            values,
            base,
            label,
        } = options;

        let value = match value {
            Some(v) if v.is_truthy() => v,
            given => values
                .as_ref()
                .and_then(|values| values.keys().next())
                .map(|key| Value::from_key(key))
                .or(given)
                .unwrap_or_default(),
        };

        let label = label.unwrap_or_else(|| InputLabel::Static(default_label(&name)));

        Self {
            name,
            value,
            base,
            values,
            label,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> Currency {
        self.base
    }

    /// Enumerated domain, if configured.
    pub fn values(&self) -> Option<&IndexMap<String, String>> {
        self.values.as_ref()
    }

    /// Stored value in the input's own base.
    pub fn raw_value(&self) -> &Value {
        &self.value
    }

    /// Stored value, converted to `target` when it is a money currency
    /// other than the base.
    pub fn value_in(&self, target: Option<Currency>, rates: &RateMatrix) -> Result<Value> {
        match target {
            Some(target) if target.is_money() => {
                if !self.base.is_money() {
                    return Err(CalcError::NonMoneyInput(self.name.clone()));
                }
                if target != self.base {
                    let converted = rates.convert(self.value.as_f64(), self.base, target)?;
                    return Ok(Value::Number(converted));
                }
                Ok(self.value.clone())
            }
            _ => Ok(self.value.clone()),
        }
    }

    /// Stores a new value, converting from `source` when given.
    ///
    /// The enumerated domain is checked after the value is stored; a
    /// rejected value stays in place.
    pub(crate) fn set_value(&mut self, value: Value, source: Option<Currency>, rates: &RateMatrix) -> Result<()> {
        let mut value = value;

        if let Some(source) = source.filter(Currency::is_money) {
            if !self.base.is_money() {
                return Err(CalcError::NonMoneyInput(self.name.clone()));
            }
            if source != self.base {
                value = Value::Number(rates.convert(value.as_f64(), source, self.base)?);
            }
        }

        self.value = value;

        if let Some(values) = &self.values {
            let key = self.value.key();
            if !values.contains_key(&key) {
                return Err(CalcError::InvalidValue {
                    input: self.name.clone(),
                    value: key,
                });
            }
        }

        Ok(())
    }

    /// Label text; computed labels see a snapshot of every input value.
    pub fn label(&self, inputs: &Params) -> String {
        match &self.label {
            InputLabel::Static(label) => label.clone(),
            InputLabel::Computed(f) => f(inputs),
        }
    }
}

/// Name with its first character upper-cased.
pub(crate) fn default_label(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
