//! Calculation strategies and dynamic attributes.
//!
//! Both are called with the same pair of parameter sets: the values of the
//! node's input dependencies and of its field dependencies, keyed by name
//! and already converted to the node's base currency.

use std::fmt;
use std::sync::Arc;

use crate::value::{Params, Value};

/// Computes a derived node's value from its dependencies.
pub trait Strategy: Send + Sync {
    fn calculate(&self, inputs: &Params, fields: &Params) -> Value;
}

impl<F> Strategy for F
where
    F: Fn(&Params, &Params) -> Value + Send + Sync,
{
    fn calculate(&self, inputs: &Params, fields: &Params) -> Value {
        self(inputs, fields)
    }
}

/// Default strategy: the numeric sum of every input and field value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

impl Strategy for Sum {
    fn calculate(&self, inputs: &Params, fields: &Params) -> Value {
        let total: f64 = inputs.values().chain(fields.values()).map(Value::as_f64).sum();
        Value::Number(total)
    }
}

/// Shared callback evaluated against a node's parameter sets.
pub type Callback<T> = Arc<dyn Fn(&Params, &Params) -> T + Send + Sync>;

/// A row attribute that is either fixed or recomputed on every
/// recalculation.
pub enum Dynamic<T> {
    Constant(T),
    Computed(Callback<T>),
}

impl<T> Dynamic<T> {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Params, &Params) -> T + Send + Sync + 'static,
    {
        Dynamic::Computed(Arc::new(f))
    }

    /// Evaluates a computed attribute. Constants yield `None`; their value
    /// is taken once at construction.
    pub(crate) fn evaluate(&self, inputs: &Params, fields: &Params) -> Option<T> {
        match self {
            Dynamic::Constant(_) => None,
            Dynamic::Computed(f) => Some(f(inputs, fields)),
        }
    }
}

impl<T> From<T> for Dynamic<T> {
    fn from(value: T) -> Self {
        Dynamic::Constant(value)
    }
}

impl<T: Clone> Clone for Dynamic<T> {
    fn clone(&self) -> Self {
        match self {
            Dynamic::Constant(v) => Dynamic::Constant(v.clone()),
            Dynamic::Computed(f) => Dynamic::Computed(Arc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Dynamic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dynamic::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            Dynamic::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}
