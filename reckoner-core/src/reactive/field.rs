//! Field Implementation
//!
//! A Field is a derived value: a strategy applied to the current values of
//! its declared input and field dependencies.
//!
//! # How Fields Recalculate
//!
//! 1. Gather every dependency value, converted to the field's base currency
//!    when the dependency is money.
//!
//! 2. Run the strategy on `(inputs, fields)`.
//!
//! 3. Store the result only if it differs from the current value. The
//!    calculator starts a field-change cascade on a change and does nothing
//!    otherwise, which is what stops propagation.
//!
//! Evaluation (steps 1-2) only borrows the calculator through a
//! [`NodeContext`]; storing (step 3) is a separate mutable step so the
//! calculator can interleave its cascade.

use std::fmt;
use std::sync::Arc;

use super::context::NodeContext;
use super::strategy::{Strategy, Sum};
use crate::currency::{Currency, RateMatrix};
use crate::error::{CalcError, Result};
use crate::value::{Params, Value};

/// Registration options for a field. Rows take the same options through
/// [`RowOptions`](super::RowOptions).
#[derive(Clone)]
pub struct FieldOptions {
    pub(crate) depends_on_inputs: Vec<String>,
    pub(crate) depends_on_fields: Vec<String>,
    pub(crate) base: Currency,
    pub(crate) calculate: Arc<dyn Strategy>,
    pub(crate) value: Value,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            depends_on_inputs: Vec::new(),
            depends_on_fields: Vec::new(),
            base: Currency::DEFAULT_BASE,
            calculate: Arc::new(Sum),
            value: Value::Number(0.0),
        }
    }
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depends_on_inputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on_inputs = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn depends_on_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on_fields = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn base(mut self, base: Currency) -> Self {
        self.base = base;
        self
    }

    pub fn calculate<S>(mut self, strategy: S) -> Self
    where
        S: Strategy + 'static,
    {
        self.calculate = Arc::new(strategy);
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }
}

impl fmt::Debug for FieldOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldOptions")
            .field("depends_on_inputs", &self.depends_on_inputs)
            .field("depends_on_fields", &self.depends_on_fields)
            .field("base", &self.base)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// Result of evaluating a field against its dependencies.
///
/// The parameter sets are kept so a row can evaluate its display
/// attributes against the same snapshot after the cascade has run.
#[derive(Debug)]
pub(crate) struct Evaluation {
    pub inputs: Params,
    pub fields: Params,
    pub value: Value,
}

/// A derived value node.
pub struct Field {
    name: String,
    value: Value,
    base: Currency,
    input_dependencies: Vec<String>,
    field_dependencies: Vec<String>,
    strategy: Arc<dyn Strategy>,
}

impl Field {
    pub(crate) fn new(name: impl Into<String>, options: FieldOptions) -> Self {
        Self {
            name: name.into(),
            value: options.value,
            base: options.base,
            input_dependencies: options.depends_on_inputs,
            field_dependencies: options.depends_on_fields,
            strategy: options.calculate,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> Currency {
        self.base
    }

    /// Stored value in the field's own base.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn input_dependencies(&self) -> &[String] {
        &self.input_dependencies
    }

    pub fn field_dependencies(&self) -> &[String] {
        &self.field_dependencies
    }

    /// Stored value, converted to `target` when it is a money currency
    /// other than the base.
    pub fn value_in(&self, target: Option<Currency>, rates: &RateMatrix) -> Result<Value> {
        match target {
            Some(target) if target.is_money() && target != self.base => {
                if !self.base.is_money() {
                    return Err(CalcError::NonMoneyField(self.name.clone()));
                }
                let converted = rates.convert(self.value.as_f64(), self.base, target)?;
                Ok(Value::Number(converted))
            }
            _ => Ok(self.value.clone()),
        }
    }

    /// Gathers dependency values and runs the strategy.
    pub(crate) fn evaluate(&self, ctx: &NodeContext<'_>) -> Result<Evaluation> {
        let inputs = self
            .input_dependencies
            .iter()
            .map(|name| -> Result<(String, Value)> { Ok((name.clone(), ctx.input_param(name, self.base)?)) })
            .collect::<Result<Params>>()?;

        let fields = self
            .field_dependencies
            .iter()
            .map(|name| -> Result<(String, Value)> { Ok((name.clone(), ctx.field_param(name, self.base)?)) })
            .collect::<Result<Params>>()?;

        let value = self.strategy.calculate(&inputs, &fields);

        Ok(Evaluation { inputs, fields, value })
    }

    /// Stores `value` if it differs from the current one. Returns whether
    /// the value changed.
    pub(crate) fn store(&mut self, value: Value) -> bool {
        if value.loosely_eq(&self.value) {
            return false;
        }
        self.value = value;
        true
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("base", &self.base)
            .field("input_dependencies", &self.input_dependencies)
            .field("field_dependencies", &self.field_dependencies)
            .finish_non_exhaustive()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
