//! Row Implementation
//!
//! A Row is a [`Field`] with display attributes: visibility, a label, an
//! optional footnote and the list of currencies it is shown in.
//!
//! Visibility, label and note may each be computed. Computed attributes are
//! re-evaluated on every recalculation of the row, whether or not its value
//! changed, against the same parameter sets the value was computed from
//! plus the row's own current value under its own name.

use std::fmt;

use super::field::{Field, FieldOptions};
use super::input::default_label;
use super::strategy::{Dynamic, Strategy};
use crate::currency::Currency;
use crate::value::{Params, Value};

/// Registration options for a row.
#[derive(Debug, Clone)]
pub struct RowOptions {
    field: FieldOptions,
    label: Option<Dynamic<String>>,
    visible: Dynamic<bool>,
    note: Dynamic<Option<String>>,
    currencies: Option<Vec<Currency>>,
}

impl Default for RowOptions {
    fn default() -> Self {
        Self {
            field: FieldOptions::default(),
            label: None,
            visible: Dynamic::Constant(true),
            note: Dynamic::Constant(None),
            currencies: None,
        }
    }
}

impl From<FieldOptions> for RowOptions {
    fn from(field: FieldOptions) -> Self {
        Self {
            field,
            ..Self::default()
        }
    }
}

impl RowOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depends_on_inputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field = self.field.depends_on_inputs(names);
        self
    }

    pub fn depends_on_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field = self.field.depends_on_fields(names);
        self
    }

    pub fn base(mut self, base: Currency) -> Self {
        self.field = self.field.base(base);
        self
    }

    pub fn calculate<S>(mut self, strategy: S) -> Self
    where
        S: Strategy + 'static,
    {
        self.field = self.field.calculate(strategy);
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.field = self.field.value(value);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(Dynamic::Constant(label.into()));
        self
    }

    pub fn label_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Params, &Params) -> String + Send + Sync + 'static,
    {
        self.label = Some(Dynamic::computed(f));
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Dynamic::Constant(visible);
        self
    }

    pub fn visible_when<F>(mut self, f: F) -> Self
    where
        F: Fn(&Params, &Params) -> bool + Send + Sync + 'static,
    {
        self.visible = Dynamic::computed(f);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Dynamic::Constant(Some(note.into()));
        self
    }

    /// Computed note; `None` or an empty string means "no note".
    pub fn note_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Params, &Params) -> Option<String> + Send + Sync + 'static,
    {
        self.note = Dynamic::computed(f);
        self
    }

    /// Display currencies. Defaults to the row's base plus the default base,
    /// or to none when the base is not money.
    pub fn currencies<I>(mut self, currencies: I) -> Self
    where
        I: IntoIterator<Item = Currency>,
    {
        self.currencies = Some(currencies.into_iter().collect());
        self
    }
}

/// A field with display attributes.
pub struct Row {
    field: Field,

    label_source: Dynamic<String>,
    visible_source: Dynamic<bool>,
    note_source: Dynamic<Option<String>>,

    label: String,
    visible: bool,
    note: Option<String>,

    /// Frozen at construction.
    currencies: Vec<Currency>,
}

impl Row {
    /// Creates a row. Display currencies are restricted to `known`.
    pub(crate) fn new(name: impl Into<String>, options: RowOptions, known: &[Currency]) -> Self {
        let name = name.into();
        let RowOptions {
            field,
            label,
            visible,
            note,
            currencies,
        } = options;

        let base = field.base;
        let requested = currencies.unwrap_or_else(|| {
            if base.is_money() {
                vec![base, Currency::DEFAULT_BASE]
            } else {
                Vec::new()
            }
        });
        let mut currencies: Vec<Currency> = Vec::with_capacity(requested.len());
        for currency in requested {
            if known.contains(&currency) && !currencies.contains(&currency) {
                currencies.push(currency);
            }
        }

        let label_source = label.unwrap_or_else(|| Dynamic::Constant(default_label(&name)));
        let initial_label = match &label_source {
            Dynamic::Constant(label) => label.clone(),
            Dynamic::Computed(_) => default_label(&name),
        };
        let initial_visible = match &visible {
            Dynamic::Constant(visible) => *visible,
            Dynamic::Computed(_) => true,
        };
        let initial_note = match &note {
            Dynamic::Constant(note) => note.clone(),
            Dynamic::Computed(_) => None,
        };

        Self {
            field: Field::new(name, field),
            label_source,
            visible_source: visible,
            note_source: note,
            label: initial_label,
            visible: initial_visible,
            note: initial_note,
            currencies,
        }
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub(crate) fn field_mut(&mut self) -> &mut Field {
        &mut self.field
    }

    pub fn name(&self) -> &str {
        self.field.name()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Current note, if any. Empty notes count as absent.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref().filter(|note| !note.is_empty())
    }

    pub fn has_note(&self) -> bool {
        self.note().is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    /// Re-evaluates computed display attributes.
    pub(crate) fn refresh(&mut self, inputs: &Params, mut fields: Params) {
        fields.insert(self.field.name().to_string(), self.field.value().clone());

        if let Some(visible) = self.visible_source.evaluate(inputs, &fields) {
            self.visible = visible;
        }
        if let Some(label) = self.label_source.evaluate(inputs, &fields) {
            self.label = label;
        }
        if let Some(note) = self.note_source.evaluate(inputs, &fields) {
            self.note = note;
        }
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("field", &self.field)
            .field("label", &self.label)
            .field("visible", &self.visible)
            .field("note", &self.note)
            .field("currencies", &self.currencies)
            .finish()
    }
}
