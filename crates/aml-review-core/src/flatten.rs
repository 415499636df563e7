//! Test Result Flattener.
//!
//! A transaction's variable bag maps section names to arbitrary JSON,
//! some of it double-encoded as JSON strings by the workflow engine.
//! Flattening is best-effort normalization, never a validation gate: a
//! value that fails to parse stays a raw string and simply contributes
//! no results.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Raw per-transaction variables as fetched from the workflow engine.
pub type VariableBag = BTreeMap<String, Value>;

/// Flat rule-check id → pass/fail mapping.
pub type TestResults = BTreeMap<String, bool>;

/// The one section whose test map is shaped differently from the
/// deterministic sections.
pub const NON_DETERMINISTIC_SECTION: &str = "non_deterministic_tests";

/// A classified bag section.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Deterministic(DeterministicSection),
    NonDeterministic(NonDeterministicSection),
    /// Free-form payloads (`data`, `assessment`, `review`, `report`, …)
    /// and anything unparseable. Never flattened.
    Opaque(Value),
}

/// A worker-produced section shaped `{ tests: {id: bool}, overall_status? }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeterministicSection {
    pub tests: BTreeMap<String, bool>,
    /// Worker-side section verdict (`pass`/`needs_advice`/`fail`).
    /// Retained for display; node status is always recomputed.
    pub overall_status: Option<String>,
}

/// The `non_deterministic_tests` section: `{ id: {status: "pass"|...} }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NonDeterministicSection {
    pub entries: BTreeMap<String, String>,
}

/// JS-style truthiness. Deterministic test values are nominally boolean
/// but arrive from a loosely-typed producer; coercion keeps parity.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Parse every JSON-encoded string value in the bag. Parse failures keep
/// the original string unchanged; nothing here can fail the caller.
pub fn normalize_bag(bag: &VariableBag) -> BTreeMap<String, Value> {
    let mut normalized = BTreeMap::new();
    for (name, value) in bag {
        let parsed = match value {
            Value::String(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(parsed) => parsed,
                Err(_) => {
                    debug!(section = %name, "variable is not JSON, keeping raw string");
                    value.clone()
                }
            },
            other => other.clone(),
        };
        normalized.insert(name.clone(), parsed);
    }
    normalized
}

/// Classify one normalized section by shape.
pub fn classify(name: &str, value: &Value) -> Section {
    if name == NON_DETERMINISTIC_SECTION {
        if let Value::Object(map) = value {
            let entries = map
                .iter()
                .filter_map(|(id, entry)| {
                    entry
                        .get("status")
                        .and_then(Value::as_str)
                        .map(|status| (id.clone(), status.to_string()))
                })
                .collect();
            return Section::NonDeterministic(NonDeterministicSection { entries });
        }
        warn!("non_deterministic_tests section is not an object");
        return Section::Opaque(value.clone());
    }

    if let Some(Value::Object(tests)) = value.get("tests") {
        let tests = tests
            .iter()
            .map(|(id, result)| (id.clone(), truthy(result)))
            .collect();
        let overall_status = value
            .get("overall_status")
            .and_then(Value::as_str)
            .map(str::to_string);
        return Section::Deterministic(DeterministicSection { tests, overall_status });
    }

    Section::Opaque(value.clone())
}

/// Flatten an already-normalized bag into per-rule-check results.
///
/// Two passes over disjoint key sets: deterministic `tests` maps first,
/// then the non-deterministic section (`status == "pass"` is a pass).
/// On an upstream bug where an id appears in both, the second pass wins.
pub fn flatten_normalized(vars: &BTreeMap<String, Value>) -> TestResults {
    let mut results = TestResults::new();

    for (name, value) in vars {
        if let Section::Deterministic(section) = classify(name, value) {
            results.extend(section.tests);
        }
    }

    if let Some(value) = vars.get(NON_DETERMINISTIC_SECTION) {
        if let Section::NonDeterministic(section) = classify(NON_DETERMINISTIC_SECTION, value) {
            for (id, status) in section.entries {
                results.insert(id, status == "pass");
            }
        }
    }

    results
}

/// Normalize and flatten a raw bag. Always returns a mapping, possibly
/// empty; no error condition is fatal.
pub fn flatten(bag: &VariableBag) -> TestResults {
    flatten_normalized(&normalize_bag(bag))
}
