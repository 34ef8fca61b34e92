//! Node Context
//!
//! Derived nodes need to read other nodes and the rate matrix while they
//! recalculate, but they are owned by the calculator. Instead of holding a
//! back-reference to their owner, they receive a `NodeContext`: a borrowed,
//! read-only view of the calculator's node maps and rates, built for the
//! duration of one evaluation.

use indexmap::IndexMap;

use super::input::Input;
use crate::currency::{Currency, RateMatrix};
use crate::error::{CalcError, Result};
use crate::graph::Node;
use crate::value::{Params, Value};

#[derive(Clone, Copy)]
pub struct NodeContext<'a> {
    inputs: &'a IndexMap<String, Input>,
    nodes: &'a IndexMap<String, Node>,
    rates: &'a RateMatrix,
}

impl<'a> NodeContext<'a> {
    pub(crate) fn new(
        inputs: &'a IndexMap<String, Input>,
        nodes: &'a IndexMap<String, Node>,
        rates: &'a RateMatrix,
    ) -> Self {
        Self { inputs, nodes, rates }
    }

    pub fn input(&self, name: &str) -> Result<&'a Input> {
        self.inputs
            .get(name)
            .ok_or_else(|| CalcError::InputNotFound(name.to_string()))
    }

    pub fn node(&self, name: &str) -> Result<&'a Node> {
        self.nodes
            .get(name)
            .ok_or_else(|| CalcError::FieldNotFound(name.to_string()))
    }

    /// Value of an input as seen by a node based in `base`: money inputs
    /// are converted, others are passed through.
    pub fn input_param(&self, name: &str, base: Currency) -> Result<Value> {
        let input = self.input(name)?;
        if input.base().is_money() {
            input.value_in(Some(base), self.rates)
        } else {
            Ok(input.raw_value().clone())
        }
    }

    /// Value of a field as seen by a node based in `base`.
    pub fn field_param(&self, name: &str, base: Currency) -> Result<Value> {
        let field = self.node(name)?.field();
        if field.base().is_money() {
            field.value_in(Some(base), self.rates)
        } else {
            Ok(field.value().clone())
        }
    }

    /// Every input's current value, in registration order.
    pub fn input_snapshot(&self) -> Params {
        self.inputs
            .iter()
            .map(|(name, input)| (name.clone(), input.raw_value().clone()))
            .collect()
    }
}
