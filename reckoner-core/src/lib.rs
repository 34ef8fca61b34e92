//! Reckoner Core
//!
//! This crate provides the engine behind the Reckoner calculator: a graph
//! of named values where inputs are set by the caller and derived fields
//! recompute automatically, with built-in currency conversion.
//!
//! It implements:
//!
//! - Inputs, fields and display rows with declared dependencies
//! - Synchronous change propagation with change detection
//! - A per-calculator currency rate matrix
//! - Footnote numbering for rows with notes
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `calculator`: The owner of all nodes, lifecycle and query API
//! - `reactive`: Node types, strategies and the subscriber index
//! - `graph`: Derived node dispatch and cascade planning
//! - `currency`: Currency keys and the rate matrix
//!
//! # Example
//!
//! ```rust
//! use reckoner_core::{Calculator, Currency, FieldOptions, InputOptions, RowOptions, Value};
//!
//! let mut calc = Calculator::new();
//! calc.add_input("price", InputOptions::new().value(100).base(Currency::USD))?
//!     .add_input("qty", InputOptions::new().value(2))?
//!     .add_field(
//!         "subtotal",
//!         FieldOptions::new()
//!             .depends_on_inputs(["price", "qty"])
//!             .base(Currency::USD)
//!             .calculate(|i: &reckoner_core::Params, _: &reckoner_core::Params| {
//!                 Value::Number(i["price"].as_f64() * i["qty"].as_f64())
//!             }),
//!     )?
//!     .add_row("total", RowOptions::new().depends_on_fields(["subtotal"]).base(Currency::USD))?;
//!
//! calc.set_rate(Currency::USD, Currency::RUB, 90.0, None)?;
//! calc.set_ready()?;
//!
//! calc.set("qty", 3)?;
//! let total = calc.get("total")?.expect("visible row");
//! assert_eq!(total.values.unwrap()[&Currency::RUB], Value::from(27000));
//! # Ok::<(), reckoner_core::CalcError>(())
//! ```

pub mod calculator;
pub mod currency;
pub mod error;
pub mod graph;
pub mod reactive;
pub mod value;

pub use calculator::{Calculator, CalculatorConfig, CascadeMode, NoteRef, RowData};
pub use currency::{Currency, RateMatrix};
pub use error::{CalcError, Result};
pub use reactive::{Dynamic, FieldOptions, InputOptions, RowOptions, Strategy, Sum};
pub use value::{Params, Value};
