//! Invariant-violation errors for the static catalog and topology.
//!
//! Parse failures while flattening are not errors at all (they degrade to
//! raw strings); everything here signals a bug in the static data and is
//! checked once at load time.

use thiserror::Error;

/// A violated invariant in the static graph template or rule catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A node owns a rule-check id that the catalog does not define.
    #[error("node `{node}` references unknown rule-check `{check}`")]
    UnknownRuleCheck { node: String, check: String },

    /// An edge endpoint names a node id that does not exist.
    #[error("edge `{edge}` references unknown node `{node}`")]
    UnknownNode { edge: String, node: String },

    /// Two nodes share an id.
    #[error("duplicate node id `{node}` in topology")]
    DuplicateNode { node: String },

    /// The same rule-check id is owned by more than one node.
    #[error("rule-check `{check}` owned by both `{first}` and `{second}`")]
    DuplicateOwnership {
        check: String,
        first: String,
        second: String,
    },
}
