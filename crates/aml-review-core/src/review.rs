//! Review-Gate Resolver.
//!
//! Classifies a transaction into one of four mutually exclusive review
//! states from the AI assessment and the optional human review record.
//! Pure classification: submitting a review happens through the workflow
//! engine, not here, and a recorded decision is final.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// AI-produced terminal verdict for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalStatus {
    Pass,
    Fail,
    /// Upstream contract violation; the producer guarantees pass/fail.
    #[serde(other)]
    Unknown,
}

/// AI risk rating attached to the assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskRating {
    Low,
    Medium,
    High,
    #[serde(other)]
    Unknown,
}

/// The AI advisor's risk verdict, produced externally and carried in the
/// `assessment` bag section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub overall_risk_score: f64,
    pub priority_level: u32,
    pub final_status: FinalStatus,
    pub risk_level: RiskRating,
}

/// A human reviewer's recorded decision. Written once via the engine's
/// user task; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub approve_tx: bool,
    pub mark_suspicious: bool,
    pub reason: String,
}

/// The four review-gate states. Total over every valid
/// assessment/review combination; there is no fifth escape state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum ReviewState {
    /// The assessment has not been produced yet.
    NoAssessment,
    /// The AI cleared the transaction; any review record is irrelevant.
    Cleared,
    /// The AI flagged the transaction and no human decision exists yet.
    Pending,
    /// A human decision is recorded; `approved` selects the terminal
    /// sub-state. Final: no resubmission path exists.
    Reviewed { approved: bool },
}

/// Classify the review gate.
pub fn resolve(assessment: Option<&Assessment>, review: Option<&ReviewRecord>) -> ReviewState {
    let Some(assessment) = assessment else {
        return ReviewState::NoAssessment;
    };

    match assessment.final_status {
        FinalStatus::Pass => ReviewState::Cleared,
        FinalStatus::Fail => match review {
            None => ReviewState::Pending,
            Some(record) => ReviewState::Reviewed { approved: record.approve_tx },
        },
        FinalStatus::Unknown => {
            debug_assert!(false, "unreachable review state: final_status outside pass/fail");
            // Conservative in release builds: keep a human in the loop.
            warn!("assessment carries unknown final_status, treating as pending");
            ReviewState::Pending
        }
    }
}

fn section<T: for<'de> Deserialize<'de>>(
    vars: &BTreeMap<String, Value>,
    name: &str,
) -> Option<T> {
    let value = vars.get(name)?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!(section = %name, %err, "section present but malformed, ignoring");
            None
        }
    }
}

/// Extract the assessment from a normalized bag, if present and well-formed.
pub fn assessment_from(vars: &BTreeMap<String, Value>) -> Option<Assessment> {
    section(vars, "assessment")
}

/// Extract the review record from a normalized bag, if present and well-formed.
pub fn review_from(vars: &BTreeMap<String, Value>) -> Option<ReviewRecord> {
    section(vars, "review")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assessment(final_status: FinalStatus) -> Assessment {
        Assessment {
            overall_risk_score: 72.5,
            priority_level: 2,
            final_status,
            risk_level: RiskRating::High,
        }
    }

    fn review(approve: bool) -> ReviewRecord {
        ReviewRecord {
            approve_tx: approve,
            mark_suspicious: !approve,
            reason: "manual check".into(),
        }
    }

    #[test]
    fn no_assessment_wins_regardless_of_review() {
        assert_eq!(resolve(None, None), ReviewState::NoAssessment);
        assert_eq!(resolve(None, Some(&review(true))), ReviewState::NoAssessment);
    }

    #[test]
    fn pass_clears_even_with_a_review_present() {
        let a = assessment(FinalStatus::Pass);
        assert_eq!(resolve(Some(&a), None), ReviewState::Cleared);
        assert_eq!(resolve(Some(&a), Some(&review(false))), ReviewState::Cleared);
    }

    #[test]
    fn fail_without_review_is_pending() {
        let a = assessment(FinalStatus::Fail);
        assert_eq!(resolve(Some(&a), None), ReviewState::Pending);
    }

    #[test]
    fn fail_with_review_carries_the_approval_flag() {
        let a = assessment(FinalStatus::Fail);
        assert_eq!(
            resolve(Some(&a), Some(&review(true))),
            ReviewState::Reviewed { approved: true }
        );
        assert_eq!(
            resolve(Some(&a), Some(&review(false))),
            ReviewState::Reviewed { approved: false }
        );
    }

    #[test]
    fn unexpected_final_status_deserializes_to_unknown() {
        let a: Assessment = serde_json::from_value(json!({
            "overall_risk_score": 10.0,
            "priority_level": 1,
            "final_status": "maybe",
            "risk_level": "low",
        }))
        .unwrap();
        assert_eq!(a.final_status, FinalStatus::Unknown);
    }

    #[test]
    fn malformed_assessment_section_is_ignored() {
        let mut vars = BTreeMap::new();
        vars.insert("assessment".to_string(), json!("not an object"));
        assert!(assessment_from(&vars).is_none());
    }

    #[test]
    fn review_section_parses() {
        let mut vars = BTreeMap::new();
        vars.insert(
            "review".to_string(),
            json!({"approve_tx": false, "mark_suspicious": true, "reason": "structuring"}),
        );
        assert_eq!(
            review_from(&vars),
            Some(ReviewRecord {
                approve_tx: false,
                mark_suspicious: true,
                reason: "structuring".into(),
            })
        );
    }
}
