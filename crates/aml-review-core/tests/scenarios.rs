//! End-to-end derivation scenarios: raw variable bag in, annotated
//! graph and review state out.

use aml_review_core::annotate::{EdgeStatus, NodeStatus};
use aml_review_core::checks::evaluate_sections;
use aml_review_core::review::ReviewState;
use aml_review_core::{derive, VariableBag};
use serde_json::{json, Value};

fn bag(entries: &[(&str, Value)]) -> VariableBag {
    entries.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

fn passing_sections() -> Vec<(&'static str, Value)> {
    vec![
        ("wire", json!({"tests": {"TR-001": true, "TR-002": true, "TR-003": true, "TR-004": true}, "overall_status": "pass"})),
        ("cdd", json!({"tests": {"CDD-005": true, "CDD-006": true, "CDD-007": true, "CDD-008": true}})),
        ("str", json!({"tests": {"STR-009": true, "STR-010": true}})),
        ("sanctions", json!({"tests": {"SAN-011": true, "SAN-012": true}})),
        ("cash", json!({"tests": {"CASH-013": true, "CASH-014": true}})),
        ("purpose", json!({"tests": {"PUR-016": true}})),
        ("fx", json!({"tests": {"FX-017": true, "FX-018": true}})),
        ("suitability", json!({"tests": {"SUIT-019": true, "SUIT-020": true, "SUIT-021": true, "SUIT-022": true}})),
        ("virtual", json!({"tests": {"VA-024": true, "VA-025": true}})),
        ("channel", json!({"tests": {"CON-026": true, "CON-027": true, "CON-028": true}})),
        ("counterparty", json!({"tests": {"COR-029": true, "COR-030": true}})),
        ("record", json!({"tests": {"REC-031": true, "REC-032": true}})),
        ("dataquality", json!({"tests": {"DQ-038": true, "DQ-039": true, "DQ-040": true}})),
        ("non_deterministic_tests", json!({
            "PRC-033": {"status": "pass"},
            "PRC-034": {"status": "pass"},
            "PAT-035": {"status": "pass"},
            "PAT-036": {"status": "pass"},
            "PAT-037": {"status": "pass"},
        })),
    ]
}

#[test]
fn clean_transaction_clears_without_review() {
    let mut entries = passing_sections();
    entries.push((
        "assessment",
        json!({
            "overall_risk_score": 12.5,
            "priority_level": 4,
            "final_status": "pass",
            "risk_level": "low",
        }),
    ));
    let (graph, state) = derive(&bag(&entries));

    assert_eq!(state, ReviewState::Cleared);
    for id in ["wire", "sanctions", "suitability", "behavioral", "dataquality"] {
        assert_eq!(graph.node(id).unwrap().overall_status, NodeStatus::Pass, "{id}");
    }
    for id in ["wire-ai", "fx-ai", "cash-ai"] {
        assert_eq!(graph.edge(id).unwrap().status, EdgeStatus::Pass);
    }
    assert!(graph.node("ai").unwrap().assessment.is_some());
}

#[test]
fn sections_arrive_as_json_encoded_strings() {
    // The engine stores variables as strings; the derivation must not
    // care which encoding it gets.
    let entries: Vec<(String, Value)> = passing_sections()
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect();
    let bag: VariableBag = entries.into_iter().collect();
    let (graph, state) = derive(&bag);

    assert_eq!(state, ReviewState::NoAssessment);
    assert_eq!(graph.node("wire").unwrap().overall_status, NodeStatus::Pass);
    assert_eq!(graph.node("behavioral").unwrap().overall_status, NodeStatus::Pass);
}

#[test]
fn single_failure_escalates_to_pending() {
    let mut entries = passing_sections();
    entries[0] = (
        "wire",
        json!({"tests": {"TR-001": false, "TR-002": true, "TR-003": true, "TR-004": true}}),
    );
    entries.push((
        "assessment",
        json!({
            "overall_risk_score": 87.0,
            "priority_level": 1,
            "final_status": "fail",
            "risk_level": "high",
        }),
    ));
    let (graph, state) = derive(&bag(&entries));

    assert_eq!(state, ReviewState::Pending);
    assert_eq!(graph.node("wire").unwrap().overall_status, NodeStatus::Fail);
    assert_eq!(graph.edge("wire-ai").unwrap().status, EdgeStatus::Fail);
    // Unrelated categories are untouched by the failure.
    assert_eq!(graph.node("fx").unwrap().overall_status, NodeStatus::Pass);
    assert_eq!(graph.edge("fx-ai").unwrap().status, EdgeStatus::Pass);
    assert!(graph.node("flagged").unwrap().assessment.is_some());
}

#[test]
fn reviewed_rejection_is_terminal() {
    let mut entries = passing_sections();
    entries.push((
        "assessment",
        json!({
            "overall_risk_score": 91.0,
            "priority_level": 1,
            "final_status": "fail",
            "risk_level": "high",
        }),
    ));
    entries.push((
        "review",
        json!({
            "approve_tx": false,
            "mark_suspicious": true,
            "reason": "structuring across linked accounts",
        }),
    ));
    let (graph, state) = derive(&bag(&entries));

    assert_eq!(state, ReviewState::Reviewed { approved: false });
    let flagged = graph.node("flagged").unwrap();
    assert!(flagged.review.as_ref().is_some_and(|r| r.mark_suspicious));
}

#[test]
fn empty_bag_yields_no_assessment_and_no_determinations() {
    let (graph, state) = derive(&VariableBag::new());

    assert_eq!(state, ReviewState::NoAssessment);
    assert_eq!(graph.node("ai").unwrap().overall_status, NodeStatus::Unknown);
    assert_eq!(graph.edge("ai-flagged").unwrap().status, EdgeStatus::Undetermined);
    // Category nodes own checks, so they resolve to pass even with no
    // results at all.
    assert_eq!(graph.node("cdd").unwrap().overall_status, NodeStatus::Pass);
    let wire = graph.node("wire").unwrap();
    assert!(wire.checks.iter().all(|c| c.result.is_none()));
}

#[test]
fn worker_output_feeds_the_derivation_unchanged() {
    // Evaluate the deterministic rule-checks against a transaction
    // payload, store each section the way the worker does, and confirm
    // the derivation sees exactly the worker's verdicts.
    let data = json!({
        "channel": "SWIFT",
        "originator_country": "SG",
        "beneficiary_country": "HK",
        "amount": "250000",
        "originator_name": "",
        "originator_account": "ACC-9",
        "beneficiary_name": "Hollow Corp",
    });

    let sections = evaluate_sections(&data);
    let mut bag = VariableBag::new();
    for (name, section) in &sections {
        bag.insert(
            name.clone(),
            Value::String(serde_json::to_string(section).unwrap()),
        );
    }

    let (graph, _) = derive(&bag);
    // TR-001 fails for an incomplete cross-border wire above threshold.
    assert!(!sections["wire"].tests["TR-001"]);
    assert_eq!(graph.node("wire").unwrap().overall_status, NodeStatus::Fail);
    assert_eq!(graph.edge("wire-ai").unwrap().status, EdgeStatus::Fail);
}

#[test]
fn non_deterministic_verdicts_drive_behavioral_and_pricing() {
    let entries = vec![(
        "non_deterministic_tests",
        json!({
            "PRC-033": {"status": "pass"},
            "PRC-034": {"status": "needs_advice"},
            "PAT-035": {"status": "fail"},
        }),
    )];
    let (graph, _) = derive(&bag(&entries));

    // Anything other than "pass" counts as a failure for node status.
    assert_eq!(graph.node("pricing").unwrap().overall_status, NodeStatus::Fail);
    assert_eq!(graph.node("behavioral").unwrap().overall_status, NodeStatus::Fail);
    assert_eq!(graph.edge("pricing-ai").unwrap().status, EdgeStatus::Fail);
}
