use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

pub type NodeId = u32;
pub type LinkId = u32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }
    pub fn len(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
    pub fn dist(self, o: Vec2) -> f64 {
        (self - o).len()
    }
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }
    pub fn from_polar(r: f64, angle: f64) -> Self {
        Vec2 { x: r * angle.cos(), y: r * angle.sin() }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, o: Vec2) -> Vec2 {
        Vec2 { x: self.x + o.x, y: self.y + o.y }
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, o: Vec2) -> Vec2 {
        Vec2 { x: self.x - o.x, y: self.y - o.y }
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f64) -> Vec2 {
        Vec2 { x: self.x * s, y: self.y * s }
    }
}

/// Axis-aligned rectangle given by two opposite corners in any order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub a: Vec2,
    pub b: Vec2,
}

impl Rect {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Rect { a, b }
    }
    /// (min corner, max corner)
    pub fn normalized(&self) -> (Vec2, Vec2) {
        (
            Vec2::new(self.a.x.min(self.b.x), self.a.y.min(self.b.y)),
            Vec2::new(self.a.x.max(self.b.x), self.a.y.max(self.b.y)),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphType {
    Undirected,
    Directed,
    Fsm,
    Petri,
}

impl Default for GraphType {
    fn default() -> Self {
        GraphType::Undirected
    }
}

impl GraphType {
    pub fn allows_self_loops(self) -> bool {
        matches!(self, GraphType::Directed | GraphType::Fsm)
    }
    pub fn has_arrows(self) -> bool {
        !matches!(self, GraphType::Undirected)
    }
    pub fn is_fsm(self) -> bool {
        self == GraphType::Fsm
    }
    pub fn is_petri(self) -> bool {
        self == GraphType::Petri
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    Red,
    Blue,
    Green,
    Yellow,
    Orange,
    Purple,
    White,
}

impl Color {
    pub const ALL: [Color; 8] = [
        Color::Black,
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Orange,
        Color::Purple,
        Color::White,
    ];

    /// Hex code used by the persisted format.
    pub fn code(self) -> &'static str {
        match self {
            Color::Black => "#444444",
            Color::Red => "#fb9a99",
            Color::Blue => "#a6cee3",
            Color::Green => "#b2df8a",
            Color::Yellow => "#ffff99",
            Color::Orange => "#fdbf6f",
            Color::Purple => "#cab2d6",
            Color::White => "#ffffff",
        }
    }
    pub fn from_code(code: &str) -> Option<Color> {
        Color::ALL
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(code))
    }
    pub fn is_dark(self) -> bool {
        self == Color::Black
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetriKind {
    Place,
    Transition,
}

impl Default for PetriKind {
    fn default() -> Self {
        PetriKind::Place
    }
}

impl fmt::Display for PetriKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PetriKind::Place => f.write_str("place"),
            PetriKind::Transition => f.write_str("transition"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub pos: Vec2,
    pub label: String,
    pub color: Option<Color>,
    pub locked: bool,
    pub highlighted: bool,
    // FSM only
    pub initial: bool,
    pub is_final: bool,
    // Petri only
    pub petri_kind: Option<PetriKind>,
    pub tokens: u32,
}

impl Node {
    pub fn at(pos: Vec2) -> Self {
        Node { pos, ..Default::default() }
    }
    pub fn is_transition(&self) -> bool {
        self.petri_kind == Some(PetriKind::Transition)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkAttrs {
    pub label: String,
    pub color: Option<Color>,
    pub highlighted: bool,
    pub locked: bool,
}

/// Bend of a regular link relative to the segment between its endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bend {
    pub parallel: f64,      // fraction from `from` to `to`
    pub perpendicular: f64, // px off the segment; 0 = straight
    pub line_angle_adjust: f64, // label flip for straight links
}

impl Default for Bend {
    fn default() -> Self {
        Bend { parallel: 0.5, perpendicular: 0.0, line_angle_adjust: 0.0 }
    }
}

impl Bend {
    pub fn is_straight(&self) -> bool {
        self.perpendicular == 0.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Link {
    Regular {
        from: NodeId,
        to: NodeId,
        bend: Bend,
        attrs: LinkAttrs,
    },
    SelfLoop {
        node: NodeId,
        anchor_angle: f64,
        attrs: LinkAttrs,
    },
    /// FSM initial marker; derived from `Node::initial`, never persisted.
    Start {
        node: NodeId,
        offset: Vec2,
        attrs: LinkAttrs,
    },
}

impl Link {
    pub fn regular(from: NodeId, to: NodeId) -> Self {
        Link::Regular { from, to, bend: Bend::default(), attrs: LinkAttrs::default() }
    }
    pub fn self_loop(node: NodeId, anchor_angle: f64) -> Self {
        Link::SelfLoop { node, anchor_angle, attrs: LinkAttrs::default() }
    }
    pub fn attrs(&self) -> &LinkAttrs {
        match self {
            Link::Regular { attrs, .. } | Link::SelfLoop { attrs, .. } | Link::Start { attrs, .. } => attrs,
        }
    }
    pub fn attrs_mut(&mut self) -> &mut LinkAttrs {
        match self {
            Link::Regular { attrs, .. } | Link::SelfLoop { attrs, .. } | Link::Start { attrs, .. } => attrs,
        }
    }
    /// (source, target); a loop or marker reports its node twice.
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        match *self {
            Link::Regular { from, to, .. } => (from, to),
            Link::SelfLoop { node, .. } | Link::Start { node, .. } => (node, node),
        }
    }
    pub fn touches(&self, n: NodeId) -> bool {
        let (a, b) = self.endpoints();
        a == n || b == n
    }
    pub fn is_start(&self) -> bool {
        matches!(self, Link::Start { .. })
    }
    pub fn is_locked(&self) -> bool {
        self.attrs().locked
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum ObjectId {
    Node(NodeId),
    Link(LinkId),
}
