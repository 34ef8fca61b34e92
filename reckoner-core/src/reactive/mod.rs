//! Reactive Nodes
//!
//! This module implements the nodes of a calculator: inputs, fields and
//! rows, together with the strategies that compute them and the index that
//! tells the calculator who to notify.
//!
//! # Concepts
//!
//! ## Inputs
//!
//! An Input is a container for a value the caller sets directly. Setting an
//! input recalculates every field that declared it as a dependency.
//!
//! ## Fields
//!
//! A Field is a derived value. Dependencies are declared up front, not
//! tracked automatically: a field names the inputs and fields it reads, and
//! the calculator records it as a subscriber of each. When a field's
//! recalculated value differs from the stored one, its own subscribers
//! recalculate in turn.
//!
//! ## Rows
//!
//! A Row is a field meant to be displayed. It adds a label, a visibility
//! flag, an optional footnote and a list of display currencies. Label,
//! visibility and note may be computed from the same parameters as the
//! value.
//!
//! # Implementation Notes
//!
//! Nodes are owned by the calculator and never hold a reference back to it.
//! Evaluation borrows the calculator's state through a [`NodeContext`];
//! cascades are driven by the calculator itself.

mod context;
mod field;
mod input;
mod row;
mod strategy;
mod subscriber;

pub use context::NodeContext;
pub use field::{Field, FieldOptions};
pub(crate) use field::Evaluation;
pub use input::{Input, InputLabel, InputOptions};
pub use row::{Row, RowOptions};
pub use strategy::{Callback, Dynamic, Strategy, Sum};
pub use subscriber::{NodePosition, SubscriberIndex, Subscribers};
