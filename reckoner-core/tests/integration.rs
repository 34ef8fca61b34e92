//! Integration Tests for the Calculator
//!
//! These tests drive the public API end to end: registration, the ready
//! transition, propagation, currency conversion and footnotes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use reckoner_core::{
    CalcError, Calculator, CalculatorConfig, CascadeMode, Currency, FieldOptions, InputOptions, NoteRef, Params,
    RowOptions, Strategy, Sum, Value,
};

fn product(inputs: &Params, fields: &Params) -> Value {
    Value::Number(inputs.values().chain(fields.values()).map(Value::as_f64).product())
}

/// Subscribers of the same input recalculate in registration order.
#[test]
fn cascade_follows_registration_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let mut calc = Calculator::new();
    calc.add_input("i", InputOptions::new().value(1)).unwrap();

    for name in ["f1", "f2"] {
        let order = order.clone();
        calc.add_field(
            name,
            FieldOptions::new()
                .depends_on_inputs(["i"])
                .calculate(move |inputs: &Params, _: &Params| {
                    order.lock().unwrap().push(name);
                    inputs["i"].clone()
                }),
        )
        .unwrap();
    }
    calc.set_ready().unwrap();
    order.lock().unwrap().clear();

    calc.set("i", 2).unwrap();
    assert_eq!(*order.lock().unwrap(), vec!["f1", "f2"]);
}

/// Build a diamond: i feeds a and b, c depends on both.
fn diamond(config: CalculatorConfig) -> (Calculator, Arc<AtomicUsize>) {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();

    let mut calc = Calculator::with_config(config).unwrap();
    calc.add_input("i", InputOptions::new().value(1))
        .unwrap()
        .add_field("a", FieldOptions::new().depends_on_inputs(["i"]))
        .unwrap()
        .add_field(
            "b",
            FieldOptions::new()
                .depends_on_inputs(["i"])
                .calculate(|inputs: &Params, _: &Params| Value::Number(inputs["i"].as_f64() * 2.0)),
        )
        .unwrap()
        .add_field(
            "c",
            FieldOptions::new()
                .depends_on_fields(["a", "b"])
                .calculate(move |inputs: &Params, fields: &Params| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Sum.calculate(inputs, fields)
                }),
        )
        .unwrap();
    calc.set_ready().unwrap();
    runs.store(0, Ordering::SeqCst);

    (calc, runs)
}

/// The default cascade recalculates the shared descendant once per path.
#[test]
fn diamond_recalculates_per_path() {
    let (mut calc, runs) = diamond(CalculatorConfig::default());
    assert_eq!(calc.field_value("c", None).unwrap(), Value::from(3));

    calc.set("i", 5).unwrap();
    assert_eq!(calc.field_value("c", None).unwrap(), Value::from(15));
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

/// The coalesced cascade recalculates the shared descendant once.
#[test]
fn diamond_recalculates_once_when_coalesced() {
    let (mut calc, runs) = diamond(CalculatorConfig::new().with_cascade(CascadeMode::Coalesced));
    assert_eq!(calc.cascade_mode(), CascadeMode::Coalesced);
    assert_eq!(calc.field_value("c", None).unwrap(), Value::from(3));

    calc.set("i", 5).unwrap();
    assert_eq!(calc.field_value("c", None).unwrap(), Value::from(15));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

/// An unchanged value stops propagation.
#[test]
fn unchanged_value_does_not_cascade() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();

    let mut calc = Calculator::new();
    calc.add_input("i", InputOptions::new().value(4))
        .unwrap()
        .add_field(
            "positive",
            FieldOptions::new()
                .depends_on_inputs(["i"])
                .calculate(|inputs: &Params, _: &Params| Value::Bool(inputs["i"].as_f64() > 0.0)),
        )
        .unwrap()
        .add_field(
            "downstream",
            FieldOptions::new()
                .depends_on_fields(["positive"])
                .calculate(move |_: &Params, fields: &Params| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    fields["positive"].clone()
                }),
        )
        .unwrap();
    calc.set_ready().unwrap();
    runs.store(0, Ordering::SeqCst);

    calc.set("i", 9).unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 0);

    calc.set("i", -1).unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(calc.field_value("downstream", None).unwrap(), Value::Bool(false));
}

/// A text result replaces the numeric default and reaches subscribers.
#[test]
fn text_results_cascade() {
    let mut calc = Calculator::new();
    calc.add_input("paid", InputOptions::new().value(false))
        .unwrap()
        .add_field(
            "status",
            FieldOptions::new()
                .depends_on_inputs(["paid"])
                .calculate(|inputs: &Params, _: &Params| {
                    Value::from(if inputs["paid"].is_truthy() { "done" } else { "pending" })
                }),
        )
        .unwrap()
        .add_field(
            "echo",
            FieldOptions::new()
                .depends_on_fields(["status"])
                .calculate(|_: &Params, fields: &Params| fields["status"].clone()),
        )
        .unwrap();
    calc.set_ready().unwrap();

    assert_eq!(calc.field_value("status", None).unwrap(), Value::from("pending"));
    assert_eq!(calc.field_value("echo", None).unwrap(), Value::from("pending"));

    calc.set("paid", true).unwrap();
    assert_eq!(calc.field_value("echo", None).unwrap(), Value::from("done"));
}

#[test]
fn enumerated_input_rejects_unknown_keys() {
    let mut calc = Calculator::new();
    calc.add_input("kind", InputOptions::new().values([("a", "Alpha"), ("b", "Beta")]))
        .unwrap();
    calc.set_ready().unwrap();

    assert_eq!(calc.input_value("kind", None).unwrap(), Value::from("a"));

    let err = calc.set("kind", "c").unwrap_err();
    assert!(matches!(err, CalcError::InvalidValue { ref input, ref value } if input == "kind" && value == "c"));

    calc.set("kind", "b").unwrap();
    assert_eq!(calc.input_value("kind", None).unwrap(), Value::from("b"));

    let values = calc.input_values_list("kind").unwrap().unwrap();
    assert_eq!(values.get("b").map(String::as_str), Some("Beta"));
}

fn shop() -> Calculator {
    let mut calc = Calculator::new();
    calc.add_input("amount", InputOptions::new().value(50).base(Currency::RUB))
        .unwrap()
        .add_input("kind", InputOptions::new().values([("a", "Alpha"), ("b", "Beta")]))
        .unwrap()
        .add_row(
            "amount_row",
            RowOptions::new()
                .depends_on_inputs(["amount", "kind"])
                .calculate(|inputs: &Params, _: &Params| inputs["amount"].clone())
                .label_with(|inputs, _| format!("Amount ({})", inputs["kind"]))
                .note("before tax"),
        )
        .unwrap()
        .add_row(
            "big",
            RowOptions::new()
                .depends_on_fields(["amount_row"])
                .visible_when(|_, fields| fields["big"].as_f64() > 100.0)
                .note_with(|_, fields| Some(format!("{} over limit", fields["big"].as_f64() - 100.0))),
        )
        .unwrap()
        .add_row(
            "usd",
            RowOptions::new()
                .depends_on_fields(["amount_row"])
                .base(Currency::USD)
                .currencies([Currency::USD]),
        )
        .unwrap();
    calc.set_rate(Currency::USD, Currency::RUB, 100.0, None).unwrap();
    calc.set_ready().unwrap();
    calc
}

#[test]
fn row_visibility_gates_get() {
    let mut calc = shop();

    assert_eq!(calc.get("big").unwrap(), None);
    assert!(!calc.get_all().unwrap().contains_key("big"));

    calc.set("amount", 150).unwrap();
    let big = calc.get("big").unwrap().unwrap();
    assert_eq!(big.label, "Big");
    assert!(big.has_note);

    let names: Vec<String> = calc.get_all().unwrap().into_keys().collect();
    assert_eq!(names, vec!["amount_row", "big", "usd"]);
}

#[test]
fn row_data_lists_display_currencies() {
    let calc = shop();

    let amount = calc.get("amount_row").unwrap().unwrap();
    assert_eq!(amount.base, Currency::RUB);
    assert_eq!(amount.values.unwrap().len(), 1);

    let usd = calc.get("usd").unwrap().unwrap();
    let values = usd.values.unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(values[&Currency::USD], Value::from(0.5));
}

/// Non-money rows sit next to money rows in the listing.
#[test]
fn non_money_rows_are_listed_with_money_rows() {
    let mut calc = Calculator::new();
    calc.add_input("items", InputOptions::new().value(3))
        .unwrap()
        .add_input("price", InputOptions::new().value(2).base(Currency::USD))
        .unwrap()
        .add_row("count", RowOptions::new().depends_on_inputs(["items"]).base(Currency::NONE))
        .unwrap()
        .add_row(
            "share",
            RowOptions::new()
                .depends_on_inputs(["items"])
                .base(Currency::NONE)
                .currencies([Currency::RUB, Currency::USD]),
        )
        .unwrap()
        .add_row("cost", RowOptions::new().depends_on_inputs(["price"]))
        .unwrap();
    calc.set_rate(Currency::USD, Currency::RUB, 100.0, None).unwrap();
    calc.set_ready().unwrap();

    let count = calc.get("count").unwrap().unwrap();
    assert_eq!(count.base, Currency::NONE);
    assert_eq!(count.values, None);

    let share = calc.get("share").unwrap().unwrap().values.unwrap();
    assert_eq!(share[&Currency::RUB], Value::from(3));
    assert_eq!(share[&Currency::USD], Value::from(3));

    let all = calc.get_all().unwrap();
    let names: Vec<&str> = all.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["count", "share", "cost"]);
    assert_eq!(all["cost"].values.as_ref().unwrap()[&Currency::RUB], Value::from(200));
}

#[test]
fn display_attributes_refresh_without_value_change() {
    let mut calc = shop();
    assert_eq!(calc.get("amount_row").unwrap().unwrap().label, "Amount (a)");

    calc.set("kind", "b").unwrap();
    assert_eq!(calc.get("amount_row").unwrap().unwrap().label, "Amount (b)");
    assert_eq!(calc.field_value("amount_row", None).unwrap(), Value::from(50));
}

#[test]
fn notes_are_numbered_until_the_next_cascade() {
    let mut calc = shop();
    calc.set("amount", 150).unwrap();

    assert_eq!(
        calc.get_note("amount_row").unwrap(),
        Some(NoteRef {
            index: 1,
            note: "before tax".into()
        })
    );
    assert_eq!(calc.get_note("big").unwrap().map(|n| n.index), Some(2));
    assert_eq!(calc.get_note("amount_row").unwrap().map(|n| n.index), Some(1));
    assert_eq!(calc.get_note("usd").unwrap(), None);

    let all = calc.get_all_notes();
    assert_eq!(all.len(), 2);
    assert_eq!(all[&1], "before tax");
    assert_eq!(all[&2], "50 over limit");

    // no value changes: numbering survives
    calc.set("amount", 150).unwrap();
    assert_eq!(calc.get_all_notes().len(), 2);

    // a value change cascades and resets numbering
    calc.set("amount", 160).unwrap();
    assert!(calc.get_all_notes().is_empty());
    assert_eq!(calc.get_note("big").unwrap().map(|n| n.index), Some(1));
}

#[test]
fn hidden_rows_have_no_note() {
    let mut calc = shop();
    assert_eq!(calc.get_note("big").unwrap(), None);
    assert!(calc.get_all_notes().is_empty());
}

#[test]
fn rate_change_recalculates_dependents() {
    let mut calc = shop();
    assert_eq!(calc.field_value("usd", None).unwrap(), Value::from(0.5));

    calc.set_rate(Currency::USD, Currency::RUB, 50.0, None).unwrap();
    assert_eq!(calc.field_value("usd", None).unwrap(), Value::from(1));
    assert_eq!(calc.field_value("amount_row", Some(Currency::USD)).unwrap(), Value::from(1));
}

#[test]
fn money_inputs_convert_on_set() {
    let mut calc = shop();
    calc.set_in("amount", 2, Currency::USD).unwrap();
    assert_eq!(calc.input_value("amount", None).unwrap(), Value::from(200));
    assert_eq!(calc.input_value("amount", Some(Currency::USD)).unwrap(), Value::from(2));
    assert_eq!(calc.input_base("amount").unwrap(), Currency::RUB);

    assert_eq!(
        calc.set_in("kind", "a", Currency::USD).unwrap_err(),
        CalcError::NonMoneyInput("kind".into())
    );
}

#[test]
fn input_labels() {
    let mut calc = Calculator::new();
    calc.add_input("a", InputOptions::new().value(1))
        .unwrap()
        .add_input("b", InputOptions::new().value(2).label("Second"))
        .unwrap()
        .add_input(
            "c",
            InputOptions::new().label_with(|all| format!("After {} and {}", all["a"], all["b"])),
        )
        .unwrap();

    assert_eq!(calc.input_label("a").unwrap(), "A");
    assert_eq!(calc.input_label("b").unwrap(), "Second");
    assert_eq!(calc.input_label("c").unwrap(), "After 1 and 2");

    calc.set("a", 7).unwrap();
    assert_eq!(calc.input_label("c").unwrap(), "After 7 and 2");

    let data = calc.inputs_data();
    assert_eq!(data.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
}

#[test]
fn strategies_can_be_any_closure() {
    let mut calc = Calculator::new();
    calc.add_input("x", InputOptions::new().value(3))
        .unwrap()
        .add_input("y", InputOptions::new().value(4))
        .unwrap()
        .add_field("xy", FieldOptions::new().depends_on_inputs(["x", "y"]).calculate(product))
        .unwrap();
    calc.set_ready().unwrap();
    assert_eq!(calc.field_value("xy", None).unwrap(), Value::from(12));
}

#[test]
fn coalesced_mode_reports_cycles() {
    let mut calc = Calculator::with_config(CalculatorConfig::new().with_cascade(CascadeMode::Coalesced)).unwrap();
    calc.add_field("a", FieldOptions::new().depends_on_fields(["b"]))
        .unwrap()
        .add_field("b", FieldOptions::new().depends_on_fields(["a"]))
        .unwrap();

    assert_eq!(
        calc.set_ready().unwrap_err(),
        CalcError::DependencyCycle(vec!["a".into(), "b".into()])
    );
}

#[test]
fn coalesced_mode_matches_per_path_results() {
    let build = |cascade| {
        let mut calc = Calculator::with_config(CalculatorConfig::new().with_cascade(cascade)).unwrap();
        calc.add_input("amount", InputOptions::new().value(10).base(Currency::RUB))
            .unwrap()
            .add_field(
                "double",
                FieldOptions::new()
                    .depends_on_inputs(["amount"])
                    .calculate(|inputs: &Params, _: &Params| Value::Number(inputs["amount"].as_f64() * 2.0)),
            )
            .unwrap()
            .add_row("usd", RowOptions::new().depends_on_fields(["double"]).base(Currency::USD))
            .unwrap()
            .add_row("total", RowOptions::new().depends_on_fields(["double", "usd"]))
            .unwrap();
        calc.set_rate(Currency::USD, Currency::RUB, 4.0, None).unwrap();
        calc.set_ready().unwrap();
        calc.set("amount", 30).unwrap();
        calc.set_rate(Currency::USD, Currency::RUB, 2.0, None).unwrap();
        calc
    };

    let per_path = build(CascadeMode::PerPath);
    let coalesced = build(CascadeMode::Coalesced);
    for name in ["double", "usd", "total"] {
        assert_eq!(
            per_path.field_value(name, None).unwrap(),
            coalesced.field_value(name, None).unwrap(),
            "{name}"
        );
    }
    assert_eq!(per_path.field_value("total", None).unwrap(), Value::from(120));
}

#[test]
fn row_data_serializes_to_json() {
    let calc = shop();
    let json = serde_json::to_value(calc.get("usd").unwrap().unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "label": "Usd",
            "base": 1,
            "has_note": false,
            "values": { "1": 0.5 }
        })
    );
}
