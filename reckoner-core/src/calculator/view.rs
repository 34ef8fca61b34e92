//! Read models returned by the calculator's query API.

use indexmap::IndexMap;
use serde::Serialize;

use crate::currency::Currency;
use crate::value::Value;

/// Display data for one visible row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowData {
    pub label: String,
    pub base: Currency,
    pub has_note: bool,

    /// Row value in each display currency; `None` when the row has no
    /// display currencies.
    pub values: Option<IndexMap<Currency, Value>>,
}

/// A footnote with its current number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteRef {
    pub index: usize,
    pub note: String,
}
