use serde::{Deserialize, Serialize};

/// Kinds of edits an external policy may forbid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    AddVertex,
    DeleteVertex,
    AddEdge,
    DeleteEdge,
    Move,
    VertexLabels,
    EdgeLabels,
    VertexColors,
    EdgeColors,
    FsmFlags,
    PetriMarking,
}

impl EditKind {
    pub const ALL: [EditKind; 11] = [
        EditKind::AddVertex,
        EditKind::DeleteVertex,
        EditKind::AddEdge,
        EditKind::DeleteEdge,
        EditKind::Move,
        EditKind::VertexLabels,
        EditKind::EdgeLabels,
        EditKind::VertexColors,
        EditKind::EdgeColors,
        EditKind::FsmFlags,
        EditKind::PetriMarking,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EditKind::AddVertex => "add_vertex",
            EditKind::DeleteVertex => "delete_vertex",
            EditKind::AddEdge => "add_edge",
            EditKind::DeleteEdge => "delete_edge",
            EditKind::Move => "move",
            EditKind::VertexLabels => "vertex_labels",
            EditKind::EdgeLabels => "edge_labels",
            EditKind::VertexColors => "vertex_colors",
            EditKind::EdgeColors => "edge_colors",
            EditKind::FsmFlags => "fsm_flags",
            EditKind::PetriMarking => "petri_marking",
        }
    }

    pub fn parse(s: &str) -> Option<EditKind> {
        EditKind::ALL.iter().copied().find(|k| k.as_str() == s)
    }
}

/// Capability check consulted before every mutation the host may forbid.
pub trait EditPolicy {
    fn allows(&self, kind: EditKind) -> bool;

    fn allows_any(&self) -> bool {
        EditKind::ALL.iter().any(|k| self.allows(*k))
    }
}

impl<F> EditPolicy for F
where
    F: Fn(EditKind) -> bool,
{
    fn allows(&self, kind: EditKind) -> bool {
        self(kind)
    }
}

/// Policy derived from the editor parameters: no list allows everything, an
/// empty list or a read-only editor allows nothing.
#[derive(Clone, Debug, Default)]
pub struct ConfigPolicy {
    pub allow_edits: Option<Vec<EditKind>>,
    pub readonly: bool,
}

impl EditPolicy for ConfigPolicy {
    fn allows(&self, kind: EditKind) -> bool {
        if self.readonly {
            return false;
        }
        match &self.allow_edits {
            None => true,
            Some(list) => list.contains(&kind),
        }
    }
}
