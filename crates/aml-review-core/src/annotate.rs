//! Node/Edge Status Aggregator.
//!
//! Injects a transaction's flat test results into a fresh copy of the
//! static topology. The template is the arena; every call produces a new
//! snapshot, so concurrent derivations never share mutable state and the
//! same inputs always produce identical output.

use crate::catalog;
use crate::flatten::TestResults;
use crate::review::{Assessment, ReviewRecord};
use crate::topology::{NodeKind, Position, Topology};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate status of a node for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Pass,
    Fail,
    /// No determination. Only nodes with an empty check set stay
    /// unknown; an all-unknown check set still aggregates to `Pass`
    /// because only an explicit fail fails a node.
    Unknown,
}

/// Presentation status of an edge, derived from its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeStatus {
    Pass,
    Fail,
    /// Part of the wire contract with the renderer; the endpoint-status
    /// derivation below never produces it (node statuses are only
    /// pass/fail/unknown).
    NeedsAdvice,
    Undetermined,
}

/// One rule-check within an annotated node.
#[derive(Debug, Clone, Serialize)]
pub struct CheckAnnotation {
    pub id: &'static str,
    pub name: &'static str,
    /// `None` = no determination available for this transaction.
    pub result: Option<bool>,
}

/// A topology node with per-transaction state injected.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedNode {
    pub id: &'static str,
    pub kind: NodeKind,
    pub label: &'static str,
    pub position: Position,
    pub overall_status: NodeStatus,
    pub checks: Vec<CheckAnnotation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<Assessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<ReviewRecord>,
}

/// A topology edge with its derived presentation status.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedEdge {
    pub id: &'static str,
    pub source: &'static str,
    pub target: &'static str,
    pub status: EdgeStatus,
}

/// One derivation pass's snapshot of the graph.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedGraph {
    pub nodes: Vec<AnnotatedNode>,
    pub edges: Vec<AnnotatedEdge>,
}

/// Derive an edge's status from its endpoints. Source wins outright;
/// the target is only a fallback. Upstream category failures must
/// dominate downstream decision-node state, so this order is load-bearing.
pub fn edge_status(source: NodeStatus, target: NodeStatus) -> EdgeStatus {
    match source {
        NodeStatus::Fail => EdgeStatus::Fail,
        NodeStatus::Pass => EdgeStatus::Pass,
        NodeStatus::Unknown => match target {
            NodeStatus::Fail => EdgeStatus::Fail,
            NodeStatus::Pass => EdgeStatus::Pass,
            NodeStatus::Unknown => EdgeStatus::Undetermined,
        },
    }
}

fn node_status(checks: &[&'static str], results: &TestResults) -> NodeStatus {
    if checks.is_empty() {
        return NodeStatus::Unknown;
    }
    // Fail-dominant: one explicit false fails the node. An id absent
    // from the results (unknown) is not a failure.
    let failed = checks.iter().any(|id| results.get(*id) == Some(&false));
    if failed { NodeStatus::Fail } else { NodeStatus::Pass }
}

/// Annotate a copy of the topology with one transaction's results.
/// Total and side-effect-free; the input topology is untouched.
pub fn annotate(topology: &Topology, results: &TestResults) -> AnnotatedGraph {
    let nodes: Vec<AnnotatedNode> = topology
        .nodes
        .iter()
        .map(|template| {
            let checks = template
                .checks
                .iter()
                .map(|id| CheckAnnotation {
                    id,
                    name: catalog::rule(id).map_or(*id, |m| m.title),
                    result: results.get(*id).copied(),
                })
                .collect();
            AnnotatedNode {
                id: template.id,
                kind: template.kind,
                label: template.label,
                position: template.position,
                overall_status: node_status(template.checks, results),
                checks,
                assessment: None,
                review: None,
            }
        })
        .collect();

    let status_by_id: BTreeMap<&str, NodeStatus> =
        nodes.iter().map(|n| (n.id, n.overall_status)).collect();

    let edges = topology
        .edges
        .iter()
        .map(|template| AnnotatedEdge {
            id: template.id,
            source: template.source,
            target: template.target,
            status: edge_status(status_by_id[template.source], status_by_id[template.target]),
        })
        .collect();

    AnnotatedGraph { nodes, edges }
}

impl AnnotatedGraph {
    /// Attach the AI assessment to the decision node and both outcome
    /// nodes, and the review record to the flagged outcome.
    pub fn attach_assessment(
        &mut self,
        assessment: Option<&Assessment>,
        review: Option<&ReviewRecord>,
    ) {
        let Some(assessment) = assessment else { return };
        for node in &mut self.nodes {
            match node.kind {
                NodeKind::Decision => node.assessment = Some(assessment.clone()),
                NodeKind::Outcome => {
                    node.assessment = Some(assessment.clone());
                    if node.id == "flagged" {
                        node.review = review.cloned();
                    }
                }
                NodeKind::Category => {}
            }
        }
    }

    pub fn node(&self, id: &str) -> Option<&AnnotatedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&AnnotatedEdge> {
        self.edges.iter().find(|e| e.id == id)
    }
}
