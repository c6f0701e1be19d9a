use crate::model::{NodeId, PetriKind};
use crate::policy::EditKind;
use thiserror::Error;

/// A mutation that would break a structural rule of the graph type. The
/// display text is meant to be shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("node {0} does not exist")]
    MissingNode(NodeId),
    #[error("Two edges between two nodes is not permitted.")]
    DuplicateEdge,
    #[error("Two edges from one node to another is not permitted.")]
    DuplicateDirectedEdge,
    #[error("Two self-loops for a node is not permitted.")]
    DuplicateSelfLoop,
    #[error("Self-loops are not permitted in this type of graph.")]
    SelfLoopNotAllowed,
    #[error("An edge between two {0}s of a Petri net is not permitted.")]
    SamePetriKind(PetriKind),
    #[error("An initial marker needs an initial state of a finite state machine.")]
    StartLinkWithoutInitial,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error(transparent)]
    Structural(#[from] InvariantViolation),
    #[error("editing is not allowed: {}", .0.as_str())]
    PolicyDenied(EditKind),
    #[error("object is locked")]
    Locked,
    #[error("unknown node or link")]
    UnknownObject,
    #[error("label does not match the required format")]
    InvalidLabel,
    #[error("not available for this type of graph or node")]
    Unsupported,
}

impl EditError {
    pub fn code(&self) -> &'static str {
        match self {
            EditError::Structural(InvariantViolation::MissingNode(_)) => "invalid_id",
            EditError::Structural(_) => "invariant_violation",
            EditError::PolicyDenied(_) => "policy_denied",
            EditError::Locked => "locked",
            EditError::UnknownObject => "invalid_id",
            EditError::InvalidLabel => "invalid_label",
            EditError::Unsupported => "unsupported",
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid serialisation: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported serialisation version {0:?}")]
    UnsupportedVersion(Option<i64>),
    #[error("serialisation too large: {what} > {max}")]
    TooLarge { what: &'static str, max: usize },
    #[error("vertex {index} has an out of range position")]
    OutOfBounds { index: usize },
    #[error("edge {edge} refers to missing vertex {vertex}")]
    EdgeEndpoint { edge: usize, vertex: i64 },
    #[error("edge {edge}: {source}")]
    Invariant {
        edge: usize,
        #[source]
        source: InvariantViolation,
    },
}

impl LoadError {
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::Json(_) => "json_parse",
            LoadError::UnsupportedVersion(_) => "unsupported_version",
            LoadError::TooLarge { .. } => "caps_exceeded",
            LoadError::OutOfBounds { .. } => "out_of_bounds",
            LoadError::EdgeEndpoint { .. } => "invalid_structure",
            LoadError::Invariant { .. } => "invariant_violation",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid editor parameters: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid {field} pattern: {source}")]
    Regex {
        field: &'static str,
        #[source]
        source: regex::Error,
    },
}

