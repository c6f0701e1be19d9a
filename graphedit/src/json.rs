use crate::error::LoadError;
use crate::geometry::limits;
use crate::model::{Bend, Color, GraphType, Link, LinkAttrs, Node, PetriKind, Vec2};
use crate::Graph;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FORMAT_VERSION: i64 = 1;

/// Which optional attributes are written and read. Derived from the editor
/// parameters; see `EditorConfig::save_options`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SaveOptions {
    pub vertex_colors: bool,
    pub edge_colors: bool,
    pub highlight_vertices: bool,
    pub highlight_edges: bool,
    /// Write every object as locked.
    pub save_locked: bool,
    /// Do not restore locked flags on load.
    pub ignore_locked: bool,
}

impl SaveOptions {
    /// Persist every optional attribute.
    pub fn all() -> Self {
        SaveOptions {
            vertex_colors: true,
            edge_colors: true,
            highlight_vertices: true,
            highlight_edges: true,
            save_locked: false,
            ignore_locked: false,
        }
    }
}

pub fn to_json_impl(g: &Graph, opts: &SaveOptions) -> Value {
    #[derive(Serialize)]
    struct VertexSer<'a> {
        label: &'a str,
        position: [f64; 2],
        locked: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<&'static str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        highlighted: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        initial: Option<bool>,
        #[serde(rename = "final", skip_serializing_if = "Option::is_none")]
        is_final: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        petri_type: Option<PetriKind>,
        #[serde(skip_serializing_if = "Option::is_none")]
        tokens: Option<u32>,
    }
    #[derive(Serialize)]
    #[serde(untagged)]
    enum BendSer {
        #[serde(rename_all = "camelCase")]
        Loop { anchor_angle: f64 },
        #[serde(rename_all = "camelCase")]
        Arc {
            line_angle_adjust: f64,
            parallel_part: f64,
            perpendicular_part: f64,
        },
    }
    #[derive(Serialize)]
    struct EdgeSer<'a> {
        from: usize,
        to: usize,
        label: &'a str,
        locked: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<&'static str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        highlighted: Option<bool>,
        bend: BendSer,
    }
    #[derive(Serialize)]
    struct DocSer<'a> {
        #[serde(rename = "_version")]
        version: i64,
        vertices: Vec<VertexSer<'a>>,
        edges: Vec<EdgeSer<'a>>,
    }

    let t = g.graph_type;
    // slot id -> persisted index
    let mut index = vec![usize::MAX; g.nodes.len()];
    let mut vertices = Vec::with_capacity(g.node_count());
    for (id, n) in g.nodes() {
        index[id as usize] = vertices.len();
        let petri_kind = n.petri_kind.unwrap_or_default();
        vertices.push(VertexSer {
            label: &n.label,
            position: [n.pos.x, n.pos.y],
            locked: n.locked || opts.save_locked,
            color: n.color.filter(|_| opts.vertex_colors).map(Color::code),
            highlighted: opts.highlight_vertices.then_some(n.highlighted),
            initial: (t == GraphType::Fsm).then_some(n.initial),
            is_final: (t == GraphType::Fsm).then_some(n.is_final),
            petri_type: (t == GraphType::Petri).then_some(petri_kind),
            tokens: (t == GraphType::Petri && petri_kind == PetriKind::Place).then_some(n.tokens),
        });
    }
    let mut edges = Vec::new();
    for (_, l) in g.links() {
        let (from, to, bend) = match l {
            Link::Regular { from, to, bend, .. } => (
                *from,
                *to,
                BendSer::Arc {
                    line_angle_adjust: bend.line_angle_adjust,
                    parallel_part: bend.parallel,
                    perpendicular_part: bend.perpendicular,
                },
            ),
            Link::SelfLoop { node, anchor_angle, .. } => {
                (*node, *node, BendSer::Loop { anchor_angle: *anchor_angle })
            }
            // Regenerated from `initial` on load.
            Link::Start { .. } => continue,
        };
        let a = l.attrs();
        edges.push(EdgeSer {
            from: index[from as usize],
            to: index[to as usize],
            label: &a.label,
            locked: a.locked || opts.save_locked,
            color: a.color.filter(|_| opts.edge_colors).map(Color::code),
            highlighted: opts.highlight_edges.then_some(a.highlighted),
            bend,
        });
    }
    let doc = DocSer { version: FORMAT_VERSION, vertices, edges };
    serde_json::to_value(doc).unwrap_or(Value::Null)
}

/// Loads `v` into `g`. On error `g` is left exactly as it was.
pub fn from_json_impl(g: &mut Graph, v: Value, opts: &SaveOptions) -> Result<(), LoadError> {
    #[derive(Deserialize, Default)]
    #[serde(default)]
    struct VertexDe {
        label: Option<String>,
        position: Value,
        locked: Option<bool>,
        color: Option<String>,
        highlighted: Option<bool>,
        initial: Option<bool>,
        #[serde(rename = "final")]
        is_final: Option<bool>,
        petri_type: Option<String>,
        tokens: Option<f64>,
    }
    #[derive(Deserialize, Default)]
    #[serde(default, rename_all = "camelCase")]
    struct BendDe {
        anchor_angle: Option<f64>,
        parallel_part: Option<f64>,
        perpendicular_part: Option<f64>,
        line_angle_adjust: Option<f64>,
    }
    #[derive(Deserialize)]
    struct EdgeDe {
        from: i64,
        to: i64,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        locked: Option<bool>,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        highlighted: Option<bool>,
        #[serde(default)]
        bend: Option<BendDe>,
    }
    #[derive(Deserialize)]
    struct DocDe {
        #[serde(default)]
        vertices: Vec<VertexDe>,
        #[serde(default)]
        edges: Vec<EdgeDe>,
    }

    let version = v.get("_version").and_then(Value::as_f64);
    if version != Some(FORMAT_VERSION as f64) {
        return Err(LoadError::UnsupportedVersion(
            v.get("_version").and_then(Value::as_i64),
        ));
    }
    let doc: DocDe = serde_json::from_value(v)?;
    if doc.vertices.len() > limits::MAX_NODES {
        return Err(LoadError::TooLarge { what: "vertices", max: limits::MAX_NODES });
    }
    if doc.edges.len() > limits::MAX_EDGES {
        return Err(LoadError::TooLarge { what: "edges", max: limits::MAX_EDGES });
    }

    let t = g.graph_type;
    let mut scratch = Graph::with_radius(t, g.node_radius);
    for (index, vd) in doc.vertices.into_iter().enumerate() {
        let pos = parse_position(&vd.position);
        if !limits::in_coord_bounds(pos.x) || !limits::in_coord_bounds(pos.y) {
            return Err(LoadError::OutOfBounds { index });
        }
        let label = vd.label.unwrap_or_default();
        if label.len() > limits::MAX_LABEL_LEN {
            return Err(LoadError::TooLarge { what: "label", max: limits::MAX_LABEL_LEN });
        }
        let mut node = Node::at(pos);
        node.label = label;
        if !opts.ignore_locked {
            node.locked = vd.locked.unwrap_or(false);
        }
        if opts.vertex_colors {
            node.color = vd.color.as_deref().and_then(Color::from_code);
        }
        if opts.highlight_vertices {
            node.highlighted = vd.highlighted.unwrap_or(false);
        }
        if t == GraphType::Fsm {
            node.initial = vd.initial.unwrap_or(false);
            node.is_final = vd.is_final.unwrap_or(false);
        }
        if t == GraphType::Petri {
            let kind = match vd.petri_type.as_deref() {
                Some("transition") => PetriKind::Transition,
                _ => PetriKind::Place,
            };
            node.petri_kind = Some(kind);
            if kind == PetriKind::Place {
                node.tokens = vd
                    .tokens
                    .filter(|t| t.is_finite())
                    .map_or(0.0, f64::round)
                    .clamp(0.0, limits::MAX_TOKENS as f64) as u32;
            }
        }
        scratch.add_node(node);
    }

    let n_vertices = scratch.nodes.len() as i64;
    for (edge, ed) in doc.edges.into_iter().enumerate() {
        if ed.to < 0 || ed.to >= n_vertices {
            return Err(LoadError::EdgeEndpoint { edge, vertex: ed.to });
        }
        let to = ed.to as u32;
        if ed.from < 0 {
            // Legacy initial marker: only the flag survives.
            if t == GraphType::Fsm {
                if let Some(n) = scratch.node_mut(to) {
                    n.initial = true;
                }
            }
            continue;
        }
        if ed.from >= n_vertices {
            return Err(LoadError::EdgeEndpoint { edge, vertex: ed.from });
        }
        let from = ed.from as u32;
        let label = ed.label.unwrap_or_default();
        if label.len() > limits::MAX_LABEL_LEN {
            return Err(LoadError::TooLarge { what: "label", max: limits::MAX_LABEL_LEN });
        }
        let attrs = LinkAttrs {
            label,
            color: if opts.edge_colors { ed.color.as_deref().and_then(Color::from_code) } else { None },
            highlighted: opts.highlight_edges && ed.highlighted.unwrap_or(false),
            locked: !opts.ignore_locked && ed.locked.unwrap_or(false),
        };
        let bd = ed.bend.unwrap_or_default();
        let link = if from == to {
            Link::SelfLoop { node: from, anchor_angle: finite_or(bd.anchor_angle, 0.0), attrs }
        } else {
            let dflt = Bend::default();
            Link::Regular {
                from,
                to,
                bend: Bend {
                    parallel: finite_or(bd.parallel_part, dflt.parallel),
                    perpendicular: finite_or(bd.perpendicular_part, dflt.perpendicular),
                    line_angle_adjust: finite_or(bd.line_angle_adjust, dflt.line_angle_adjust),
                },
                attrs,
            }
        };
        scratch
            .add_link(link)
            .map_err(|source| LoadError::Invariant { edge, source })?;
    }
    scratch.refresh_start_links();

    g.nodes = scratch.nodes;
    g.links = scratch.links;
    g.bump();
    Ok(())
}

fn finite_or(v: Option<f64>, fallback: f64) -> f64 {
    v.filter(|x| x.is_finite()).unwrap_or(fallback)
}

// Anything but a two-number array maps to the origin.
fn parse_position(v: &Value) -> Vec2 {
    match v.as_array().map(|a| a.as_slice()) {
        Some([x, y, ..]) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => Vec2::new(x, y),
            _ => Vec2::default(),
        },
        _ => Vec2::default(),
    }
}

/// Text for the current model, or `None` when there is nothing worth
/// writing (no previous text and no nodes).
pub fn save(g: &Graph, opts: &SaveOptions, previous: &str) -> Option<String> {
    if previous.trim().is_empty() && g.node_count() == 0 {
        return None;
    }
    Some(to_json_impl(g, opts).to_string())
}

/// Replaces the model with the diagram in `text`; blank text gives an empty
/// diagram. The model is unchanged on error.
pub fn load(g: &mut Graph, text: &str, opts: &SaveOptions) -> Result<(), LoadError> {
    if text.trim().is_empty() {
        g.clear();
        return Ok(());
    }
    let v: Value = serde_json::from_str(text)?;
    from_json_impl(g, v, opts)
}
