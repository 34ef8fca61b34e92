//! Calculator
//!
//! The calculator owns every node, the subscriber index, the rate matrix
//! and the footnote numbering, and drives propagation.
//!
//! # Lifecycle
//!
//! 1. **Building.** Inputs, fields and rows are registered. Nothing is
//!    calculated yet.
//!
//! 2. **Ready.** `set_ready` freezes the structure and recalculates every
//!    field once, in registration order. From then on, setting an input or
//!    a rate recalculates whatever depends on it before the call returns.
//!
//! # Propagation
//!
//! Setting an input recalculates its subscribers in registration order. A
//! field whose value changes starts a field-change cascade: the footnote
//! numbering is cleared and the field's own subscribers recalculate. The
//! default [`CascadeMode::PerPath`] does this depth-first with no
//! deduplication, so in a diamond the shared descendant recalculates once
//! per path. [`CascadeMode::Coalesced`] plans the cascade up front and
//! recalculates each affected node once.

mod config;
mod notes;
mod view;

pub use config::{CalculatorConfig, CascadeMode};
pub use notes::NoteIndex;
pub use view::{NoteRef, RowData};

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace, warn};

use crate::currency::{known_currencies, Currency, RateMatrix};
use crate::error::{CalcError, Result};
use crate::graph::{Node, UpdateScheduler};
use crate::reactive::{
    Evaluation, Field, FieldOptions, Input, InputOptions, NodeContext, NodePosition, Row, RowOptions,
    SubscriberIndex, Subscribers,
};
use crate::value::{Params, Value};

/// State of a coalesced pass in progress.
#[derive(Debug, Default)]
struct Pass {
    /// Nodes whose value changed during this pass.
    changed: HashSet<NodePosition>,
}

/// Reactive multi-currency calculator.
#[derive(Debug)]
pub struct Calculator {
    config: CalculatorConfig,
    ready: bool,

    currencies: Vec<Currency>,
    rates: RateMatrix,

    inputs: IndexMap<String, Input>,
    nodes: IndexMap<String, Node>,
    subscribers: SubscriberIndex,

    notes: NoteIndex,
    pass: Option<Pass>,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    /// Creates a calculator knowing the built-in currencies.
    pub fn new() -> Self {
        let currencies = Currency::BUILTIN.to_vec();
        Self {
            config: CalculatorConfig::default(),
            ready: false,
            rates: RateMatrix::new(&currencies),
            currencies,
            inputs: IndexMap::new(),
            nodes: IndexMap::new(),
            subscribers: SubscriberIndex::new(),
            notes: NoteIndex::new(),
            pass: None,
        }
    }

    /// Creates a calculator that also knows `extra` currencies.
    pub fn with_currencies(extra: impl IntoIterator<Item = Currency>) -> Result<Self> {
        Self::with_config(CalculatorConfig::new().with_currencies(extra))
    }

    pub fn with_config(config: CalculatorConfig) -> Result<Self> {
        let currencies = known_currencies(&config.extra_currencies)?;
        Ok(Self {
            rates: RateMatrix::new(&currencies),
            currencies,
            config,
            ..Self::new()
        })
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn cascade_mode(&self) -> CascadeMode {
        self.config.cascade
    }

    /// Known currencies, built-ins first.
    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    pub fn add_input(&mut self, name: impl Into<String>, options: InputOptions) -> Result<&mut Self> {
        let name = name.into();
        if self.ready {
            return Err(CalcError::Finalized);
        }
        if self.inputs.contains_key(&name) {
            return Err(CalcError::DuplicateInput(name));
        }

        let input = Input::new(name.clone(), options);
        self.inputs.insert(name, input);
        Ok(self)
    }

    pub fn add_field(&mut self, name: impl Into<String>, options: FieldOptions) -> Result<&mut Self> {
        let name = name.into();
        self.check_field_name(&name)?;
        let field = Field::new(name, options);
        self.register(Node::Field(field));
        Ok(self)
    }

    pub fn add_row(&mut self, name: impl Into<String>, options: RowOptions) -> Result<&mut Self> {
        let name = name.into();
        self.check_field_name(&name)?;
        let row = Row::new(name, options, &self.currencies);
        self.register(Node::Row(row));
        Ok(self)
    }

    fn check_field_name(&self, name: &str) -> Result<()> {
        if self.ready {
            return Err(CalcError::Finalized);
        }
        if self.nodes.contains_key(name) {
            return Err(CalcError::DuplicateField(name.to_string()));
        }
        Ok(())
    }

    fn register(&mut self, node: Node) {
        let position = self.nodes.len();
        self.subscribers.register(position, node.field());
        self.nodes.insert(node.name().to_string(), node);
    }

    /// Freezes the structure and calculates every field. Calling it again
    /// does nothing.
    pub fn set_ready(&mut self) -> Result<&mut Self> {
        if self.ready {
            return Ok(self);
        }
        self.ready = true;
        debug!(
            inputs = self.inputs.len(),
            fields = self.nodes.len(),
            cascade = ?self.config.cascade,
            "calculator ready"
        );

        match self.config.cascade {
            CascadeMode::PerPath => {
                for position in 0..self.nodes.len() {
                    self.recalculate(position)?;
                    self.trigger_field_change(position)?;
                }
            }
            CascadeMode::Coalesced => {
                let all: Vec<NodePosition> = (0..self.nodes.len()).collect();
                self.notes.clear();
                self.settle(&all)?;
            }
        }

        Ok(self)
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Sets an input and recalculates its dependents.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.assign(name, value.into(), None)?;
        Ok(self)
    }

    /// Sets a money input from an amount expressed in `currency`.
    pub fn set_in(&mut self, name: &str, value: impl Into<Value>, currency: Currency) -> Result<&mut Self> {
        self.assign(name, value.into(), Some(currency))?;
        Ok(self)
    }

    fn assign(&mut self, name: &str, value: Value, source: Option<Currency>) -> Result<()> {
        let input = self
            .inputs
            .get_mut(name)
            .ok_or_else(|| CalcError::InputNotFound(name.to_string()))?;
        input.set_value(value, source, &self.rates)?;
        trace!(input = name, value = %input.raw_value(), "input set");

        self.trigger_input_set(name)
    }

    /// Updates a rate pair and, once ready, re-triggers every field.
    ///
    /// Returns `false` (and logs a warning) when either currency is
    /// unknown or both name the same currency.
    pub fn set_rate(&mut self, from: Currency, to: Currency, buy: f64, sell: Option<f64>) -> Result<bool> {
        if !self.rates.contains(from) || !self.rates.contains(to) {
            warn!(%from, %to, "Undefined currency index");
            return Ok(false);
        }
        if from == to {
            warn!(currency = %from, "Rate of a currency to itself is fixed at 1");
            return Ok(false);
        }

        self.rates.set(from, to, buy, sell)?;
        debug!(%from, %to, buy, ?sell, "rate updated");

        if self.ready {
            match self.config.cascade {
                CascadeMode::PerPath => {
                    for position in 0..self.nodes.len() {
                        self.trigger_field_change(position)?;
                    }
                }
                CascadeMode::Coalesced => {
                    let mut seeds: IndexSet<NodePosition> = IndexSet::new();
                    for name in self.nodes.keys() {
                        seeds.extend(self.subscribers.field_subscribers(name).iter().copied());
                    }
                    let seeds: Vec<NodePosition> = seeds.into_iter().collect();
                    self.notes.clear();
                    self.settle(&seeds)?;
                }
            }
        }

        Ok(true)
    }

    // ------------------------------------------------------------------
    // Propagation
    // ------------------------------------------------------------------

    fn trigger_input_set(&mut self, name: &str) -> Result<()> {
        if !self.ready {
            return Ok(());
        }
        let subscribers: Subscribers = self.subscribers.input_subscribers(name).into();

        match self.config.cascade {
            CascadeMode::PerPath => {
                for position in subscribers {
                    self.recalculate(position)?;
                }
                Ok(())
            }
            CascadeMode::Coalesced => self.settle(&subscribers),
        }
    }

    fn trigger_field_change(&mut self, position: NodePosition) -> Result<()> {
        if !self.ready {
            return Ok(());
        }
        self.notes.clear();

        if let Some(pass) = self.pass.as_mut() {
            pass.changed.insert(position);
            return Ok(());
        }

        let subscribers: Subscribers = self.subscribers.field_subscribers(self.nodes[position].name()).into();

        match self.config.cascade {
            CascadeMode::PerPath => {
                for subscriber in subscribers {
                    self.recalculate(subscriber)?;
                }
                Ok(())
            }
            CascadeMode::Coalesced => self.settle(&subscribers),
        }
    }

    /// Recalculates one node, cascades if its value changed, then refreshes
    /// its display attributes if it is a row.
    fn recalculate(&mut self, position: NodePosition) -> Result<()> {
        let Evaluation { inputs, fields, value } = {
            let ctx = NodeContext::new(&self.inputs, &self.nodes, &self.rates);
            self.nodes[position].field().evaluate(&ctx)?
        };
        trace!(field = self.nodes[position].name(), value = %value, "recalculated");

        if self.nodes[position].field_mut().store(value) {
            self.trigger_field_change(position)?;
        }

        if let Some(row) = self.nodes[position].as_row_mut() {
            row.refresh(&inputs, fields);
        }

        Ok(())
    }

    /// Runs a coalesced pass over everything reachable from `seeds`.
    ///
    /// Seeds always recalculate; other nodes only when one of their field
    /// dependencies changed earlier in the pass.
    fn settle(&mut self, seeds: &[NodePosition]) -> Result<()> {
        if seeds.is_empty() {
            return Ok(());
        }
        let order = UpdateScheduler::new(&self.nodes, &self.subscribers).plan(seeds)?;
        trace!(seeds = seeds.len(), planned = order.len(), "coalesced pass");

        let outer = self.pass.replace(Pass::default());
        let result = self.run_pass(&order, seeds);
        self.pass = outer;
        result
    }

    fn run_pass(&mut self, order: &[NodePosition], seeds: &[NodePosition]) -> Result<()> {
        for &position in order {
            let due = seeds.contains(&position) || self.dependency_changed(position);
            if due {
                self.recalculate(position)?;
            }
        }
        Ok(())
    }

    fn dependency_changed(&self, position: NodePosition) -> bool {
        let Some(pass) = self.pass.as_ref() else {
            return false;
        };
        self.nodes[position]
            .field()
            .field_dependencies()
            .iter()
            .filter_map(|name| self.nodes.get_index_of(name))
            .any(|dependency| pass.changed.contains(&dependency))
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    fn input(&self, name: &str) -> Result<&Input> {
        self.inputs
            .get(name)
            .ok_or_else(|| CalcError::InputNotFound(name.to_string()))
    }

    fn node(&self, name: &str) -> Result<&Node> {
        self.nodes
            .get(name)
            .ok_or_else(|| CalcError::FieldNotFound(name.to_string()))
    }

    /// Resolves `name` to a row, warning when it names a plain field.
    fn row(&self, name: &str) -> Result<Option<&Row>> {
        let row = self.node(name)?.as_row();
        if row.is_none() {
            warn!(row = name, "Row not found, but field exists with same name");
        }
        Ok(row)
    }

    /// Converts `value` between two known currencies.
    pub fn convert(&self, value: f64, from: Currency, to: Currency) -> Result<f64> {
        self.rates.convert(value, from, to)
    }

    pub fn rate(&self, from: Currency, to: Currency) -> Option<f64> {
        self.rates.rate(from, to)
    }

    /// Display data for a row, or `None` if it is hidden or names a plain
    /// field.
    pub fn get(&self, name: &str) -> Result<Option<RowData>> {
        match self.row(name)? {
            Some(row) if row.is_visible() => self.row_data(row).map(Some),
            _ => Ok(None),
        }
    }

    /// Display data for every visible row, in registration order.
    pub fn get_all(&self) -> Result<IndexMap<String, RowData>> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.is_visible_row())
            .filter_map(|(name, node)| node.as_row().map(|row| (name, row)))
            .map(|(name, row)| -> Result<(String, RowData)> { Ok((name.clone(), self.row_data(row)?)) })
            .collect()
    }

    fn row_data(&self, row: &Row) -> Result<RowData> {
        let values = if row.currencies().is_empty() {
            None
        } else {
            // A non-money row shows its raw value in every column.
            let field = row.field();
            let values = row
                .currencies()
                .iter()
                .map(|&currency| -> Result<(Currency, Value)> {
                    let target = field.base().is_money().then_some(currency);
                    Ok((currency, field.value_in(target, &self.rates)?))
                })
                .collect::<Result<IndexMap<_, _>>>()?;
            Some(values)
        };

        Ok(RowData {
            label: row.label().to_string(),
            base: row.field().base(),
            has_note: row.has_note(),
            values,
        })
    }

    /// Current value of every input, in registration order.
    pub fn inputs_data(&self) -> Params {
        NodeContext::new(&self.inputs, &self.nodes, &self.rates).input_snapshot()
    }

    pub fn input_label(&self, name: &str) -> Result<String> {
        Ok(self.input(name)?.label(&self.inputs_data()))
    }

    pub fn input_base(&self, name: &str) -> Result<Currency> {
        Ok(self.input(name)?.base())
    }

    /// Enumerated domain of an input, if it has one.
    pub fn input_values_list(&self, name: &str) -> Result<Option<&IndexMap<String, String>>> {
        Ok(self.input(name)?.values())
    }

    pub fn input_value(&self, name: &str, currency: Option<Currency>) -> Result<Value> {
        self.input(name)?.value_in(currency, &self.rates)
    }

    pub fn field_value(&self, name: &str, currency: Option<Currency>) -> Result<Value> {
        self.node(name)?.field().value_in(currency, &self.rates)
    }

    /// Footnote of a visible row, numbering it on first request.
    pub fn get_note(&mut self, name: &str) -> Result<Option<NoteRef>> {
        let note = match self.row(name)? {
            Some(row) if row.is_visible() => row.note().map(str::to_string),
            _ => None,
        };

        Ok(note.map(|note| NoteRef {
            index: self.notes.assign(name),
            note,
        }))
    }

    /// Every numbered footnote, by number.
    pub fn get_all_notes(&self) -> IndexMap<usize, String> {
        self.notes
            .iter()
            .map(|(index, name)| {
                let note = self
                    .nodes
                    .get(name)
                    .and_then(Node::as_row)
                    .and_then(Row::note)
                    .unwrap_or_default();
                (index, note.to_string())
            })
            .collect()
    }
}
