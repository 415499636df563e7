//! Graph Topology: the static node/edge template.
//!
//! Fourteen category nodes fan into the single decision node, which fans
//! out to the two terminal outcomes. Positions are presentation hints for
//! the flow-chart renderer and carry no semantics. The template is
//! validated once at first access; per-transaction state never touches it
//! (see [`crate::annotate`]).

use crate::catalog;
use crate::error::CoreError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// What a node is, and therefore how it participates in derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Owns rule-checks and aggregates their results.
    Category,
    /// The single AI-advisor node carrying the assessment.
    Decision,
    /// One of the two terminal nodes.
    Outcome,
}

/// Layout position hint for the renderer.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// Static template for one graph node.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NodeTemplate {
    pub id: &'static str,
    pub kind: NodeKind,
    pub label: &'static str,
    pub position: Position,
    /// Rule-check ids owned by this node. Empty for decision/outcome nodes.
    pub checks: &'static [&'static str],
}

/// Static template for one directed edge.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EdgeTemplate {
    pub id: &'static str,
    pub source: &'static str,
    pub target: &'static str,
}

/// The full static graph template.
#[derive(Debug, Clone, Copy)]
pub struct Topology {
    pub nodes: &'static [NodeTemplate],
    pub edges: &'static [EdgeTemplate],
}

const fn category(
    id: &'static str,
    label: &'static str,
    y: i32,
    checks: &'static [&'static str],
) -> NodeTemplate {
    NodeTemplate {
        id,
        kind: NodeKind::Category,
        label,
        position: Position { x: 300, y },
        checks,
    }
}

static NODES: &[NodeTemplate] = &[
    category("wire", "Wire transparency & travel rule", -50, &["TR-001", "TR-002", "TR-003", "TR-004"]),
    category("fx", "FX reasonableness & fair dealing", 10, &["FX-017", "FX-018"]),
    category("pricing", "Pricing & conflicts", 70, &["PRC-033", "PRC-034"]),
    category("sanctions", "Sanctions & geography", 110, &["SAN-011", "SAN-012"]),
    category("cdd", "CDD / KYC freshness & EDD", 150, &["CDD-005", "CDD-006", "CDD-007", "CDD-008"]),
    category("suitability", "Suitability / appropriateness", 210, &["SUIT-019", "SUIT-020", "SUIT-021", "SUIT-022", "SUIT-023"]),
    category("behavioral", "Behavioral / patterning", 270, &["PAT-035", "PAT-036", "PAT-037"]),
    category("cash", "Cash structuring & ID", 310, &["CASH-013", "CASH-014"]),
    category("str", "STR / Suspicion handling", 350, &["STR-009", "STR-010"]),
    category("virtual", "Virtual assets (VA / DPT)", 390, &["VA-024", "VA-025"]),
    category("channel", "Channel & field consistency", 430, &["CON-026", "CON-027", "CON-028"]),
    category("counterparty", "Counterparty & correspondent banking", 490, &["COR-029", "COR-030"]),
    category("record", "Record-keeping & reconstruction", 550, &["REC-031", "REC-032"]),
    category("dataquality", "Data quality", 610, &["DQ-038", "DQ-039", "DQ-040"]),
    NodeTemplate {
        id: "ai",
        kind: NodeKind::Decision,
        label: "AI Advisor",
        position: Position { x: 600, y: 250 },
        checks: &[],
    },
    NodeTemplate {
        id: "flagged",
        kind: NodeKind::Outcome,
        label: "Flagged for Review",
        position: Position { x: 900, y: 150 },
        checks: &[],
    },
    NodeTemplate {
        id: "transaction_passed",
        kind: NodeKind::Outcome,
        label: "Transaction Passed",
        position: Position { x: 900, y: 350 },
        checks: &[],
    },
];

static EDGES: &[EdgeTemplate] = &[
    EdgeTemplate { id: "wire-ai", source: "wire", target: "ai" },
    EdgeTemplate { id: "fx-ai", source: "fx", target: "ai" },
    EdgeTemplate { id: "pricing-ai", source: "pricing", target: "ai" },
    EdgeTemplate { id: "sanctions-ai", source: "sanctions", target: "ai" },
    EdgeTemplate { id: "cdd-ai", source: "cdd", target: "ai" },
    EdgeTemplate { id: "suitability-ai", source: "suitability", target: "ai" },
    EdgeTemplate { id: "behavioral-ai", source: "behavioral", target: "ai" },
    EdgeTemplate { id: "cash-ai", source: "cash", target: "ai" },
    EdgeTemplate { id: "str-ai", source: "str", target: "ai" },
    EdgeTemplate { id: "virtual-ai", source: "virtual", target: "ai" },
    EdgeTemplate { id: "channel-ai", source: "channel", target: "ai" },
    EdgeTemplate { id: "counterparty-ai", source: "counterparty", target: "ai" },
    EdgeTemplate { id: "record-ai", source: "record", target: "ai" },
    EdgeTemplate { id: "dataquality-ai", source: "dataquality", target: "ai" },
    EdgeTemplate { id: "ai-flagged", source: "ai", target: "flagged" },
    // The edge id keeps the renderer's hyphenated key even though the
    // node id is snake_case; presentation lookups are keyed to it.
    EdgeTemplate { id: "ai-transaction-passed", source: "ai", target: "transaction_passed" },
];

static STANDARD: LazyLock<Topology> = LazyLock::new(|| {
    let topology = Topology { nodes: NODES, edges: EDGES };
    // Static-data bugs must not survive to a derivation pass.
    if let Err(e) = topology.validate() {
        panic!("invalid built-in topology: {e}");
    }
    topology
});

/// The built-in AML review graph, validated on first access.
pub fn standard_topology() -> &'static Topology {
    &STANDARD
}

impl Topology {
    /// Check the catalog/topology invariants: unique node ids, every owned
    /// rule-check present in the catalog and owned exactly once, every
    /// edge endpoint naming a real node.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut ids = BTreeMap::new();
        let mut owners: BTreeMap<&str, &str> = BTreeMap::new();

        for node in self.nodes {
            if ids.insert(node.id, ()).is_some() {
                return Err(CoreError::DuplicateNode { node: node.id.into() });
            }
            for check in node.checks {
                if catalog::rule(check).is_none() {
                    return Err(CoreError::UnknownRuleCheck {
                        node: node.id.into(),
                        check: (*check).into(),
                    });
                }
                if let Some(first) = owners.insert(check, node.id) {
                    return Err(CoreError::DuplicateOwnership {
                        check: (*check).into(),
                        first: first.into(),
                        second: node.id.into(),
                    });
                }
            }
        }

        for edge in self.edges {
            for endpoint in [edge.source, edge.target] {
                if !ids.contains_key(endpoint) {
                    return Err(CoreError::UnknownNode {
                        edge: edge.id.into(),
                        node: endpoint.into(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn node(&self, id: &str) -> Option<&NodeTemplate> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
