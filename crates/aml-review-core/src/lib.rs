//! Status-derivation engine for the AML rule-check graph.
//!
//! A transaction's variable bag (named JSON sections, some of them
//! JSON-encoded strings) is flattened into per-rule-check pass/fail
//! results, injected into a copy of the static graph template, and
//! classified into one of four review states. The template itself is
//! never mutated; every derivation pass produces a fresh snapshot.
//!
//! All of this is pure and synchronous. Talking to the workflow engine
//! lives in `aml-review-client`; serving the result lives in
//! `aml-review-server`.

pub mod annotate;
pub mod catalog;
pub mod checks;
pub mod error;
pub mod flatten;
pub mod review;
pub mod topology;

pub use annotate::{annotate, AnnotatedGraph, AnnotatedNode, EdgeStatus, NodeStatus};
pub use catalog::{rule, RuleCheckMeta};
pub use error::CoreError;
pub use flatten::{flatten, normalize_bag, TestResults, VariableBag};
pub use review::{resolve, Assessment, ReviewRecord, ReviewState};
pub use topology::{standard_topology, NodeKind, Topology};

/// One full derivation pass: flatten the bag, annotate a copy of the
/// standard topology, and classify the review gate.
///
/// This is the whole engine as the presentation layer sees it.
pub fn derive(bag: &VariableBag) -> (AnnotatedGraph, ReviewState) {
    let vars = flatten::normalize_bag(bag);
    let results = flatten::flatten_normalized(&vars);
    let assessment = review::assessment_from(&vars);
    let review_record = review::review_from(&vars);

    let mut graph = annotate::annotate(standard_topology(), &results);
    graph.attach_assessment(assessment.as_ref(), review_record.as_ref());

    let state = review::resolve(assessment.as_ref(), review_record.as_ref());
    (graph, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn derive_is_idempotent() {
        let mut bag = VariableBag::new();
        bag.insert(
            "wire".into(),
            json!({"tests": {"TR-001": true, "TR-002": false}}).to_string().into(),
        );
        let (first, state_a) = derive(&bag);
        let (second, state_b) = derive(&bag);
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
        assert_eq!(state_a, state_b);
    }
}
