use crate::error::ConfigError;
use crate::geometry::tolerance::{DEFAULT_NODE_RADIUS, MAX_UNDO_REDO};
use crate::json::SaveOptions;
use crate::model::{Color, GraphType};
use crate::policy::{ConfigPolicy, EditKind};
use regex::Regex;
use serde::Deserialize;

/// Editor parameters as supplied by the host page (question template
/// parameters). Every field is optional in the JSON.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    #[serde(rename = "type")]
    pub graph_type: GraphType,
    #[serde(rename = "noderadius")]
    pub node_radius: f64,
    pub allow_edits: Option<Vec<EditKind>>,
    pub readonly: bool,
    /// Palette offered for vertices; the first entry colors new vertices.
    /// `None` disables vertex colors entirely.
    pub vertex_colors: Option<Vec<Color>>,
    pub edge_colors: Option<Vec<Color>>,
    pub highlight_vertices: bool,
    pub highlight_edges: bool,
    pub ignore_locked: bool,
    pub save_locked: bool,
    pub locknodes: bool,
    pub lockedges: bool,
    pub vertex_label_regex: Option<String>,
    pub edge_label_regex: Option<String>,
    pub max_history: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            graph_type: GraphType::default(),
            node_radius: DEFAULT_NODE_RADIUS,
            allow_edits: None,
            readonly: false,
            vertex_colors: None,
            edge_colors: None,
            highlight_vertices: false,
            highlight_edges: false,
            ignore_locked: false,
            save_locked: false,
            locknodes: false,
            lockedges: false,
            vertex_label_regex: None,
            edge_label_regex: None,
            max_history: MAX_UNDO_REDO,
        }
    }
}

impl EditorConfig {
    pub fn new(graph_type: GraphType) -> Self {
        EditorConfig { graph_type, ..Default::default() }
    }

    /// Parses and validates parameters; a blank string gives the defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        if s.trim().is_empty() {
            return Ok(EditorConfig::default());
        }
        let mut cfg: EditorConfig = serde_json::from_str(s)?;
        if !cfg.node_radius.is_finite() || cfg.node_radius <= 0.0 {
            log::warn!("ignoring node radius {}", cfg.node_radius);
            cfg.node_radius = DEFAULT_NODE_RADIUS;
        }
        cfg.label_rules()?;
        Ok(cfg)
    }

    pub fn policy(&self) -> ConfigPolicy {
        ConfigPolicy { allow_edits: self.allow_edits.clone(), readonly: self.readonly }
    }

    pub fn save_options(&self) -> SaveOptions {
        SaveOptions {
            vertex_colors: self.vertex_colors.is_some(),
            edge_colors: self.edge_colors.is_some(),
            highlight_vertices: self.highlight_vertices,
            highlight_edges: self.highlight_edges,
            save_locked: self.save_locked,
            ignore_locked: self.ignore_locked,
        }
    }

    pub fn default_vertex_color(&self) -> Option<Color> {
        self.vertex_colors.as_ref().and_then(|c| c.first().copied())
    }

    pub fn default_edge_color(&self) -> Option<Color> {
        self.edge_colors.as_ref().and_then(|c| c.first().copied())
    }

    pub fn label_rules(&self) -> Result<LabelRules, ConfigError> {
        let compile = |field: &'static str, pat: &Option<String>| -> Result<Option<Regex>, ConfigError> {
            pat.as_deref()
                .map(|p| Regex::new(p).map_err(|source| ConfigError::Regex { field, source }))
                .transpose()
        };
        Ok(LabelRules {
            vertex: compile("vertex_label_regex", &self.vertex_label_regex)?,
            edge: compile("edge_label_regex", &self.edge_label_regex)?,
        })
    }
}

/// Compiled label patterns. A missing pattern accepts every label.
#[derive(Clone, Debug, Default)]
pub struct LabelRules {
    pub vertex: Option<Regex>,
    pub edge: Option<Regex>,
}

impl LabelRules {
    pub fn vertex_label_is_valid(&self, label: &str) -> bool {
        self.vertex.as_ref().map_or(true, |r| r.is_match(label))
    }
    pub fn edge_label_is_valid(&self, label: &str) -> bool {
        self.edge.as_ref().map_or(true, |r| r.is_match(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::EditPolicy;

    #[test]
    fn blank_params_give_defaults() {
        let cfg = EditorConfig::from_json_str("  ").unwrap();
        assert_eq!(cfg.graph_type, GraphType::Undirected);
        assert_eq!(cfg.node_radius, DEFAULT_NODE_RADIUS);
        assert_eq!(cfg.max_history, MAX_UNDO_REDO);
    }

    #[test]
    fn parses_template_params() {
        let cfg = EditorConfig::from_json_str(
            r#"{"type":"fsm","noderadius":30,"allow_edits":["move","add_edge"],
                "edge_colors":["red","blue"],"vertex_label_regex":"^q[0-9]+$"}"#,
        )
        .unwrap();
        assert_eq!(cfg.graph_type, GraphType::Fsm);
        assert_eq!(cfg.node_radius, 30.0);
        let policy = cfg.policy();
        assert!(policy.allows(EditKind::Move));
        assert!(!policy.allows(EditKind::AddVertex));
        assert_eq!(cfg.default_edge_color(), Some(Color::Red));
        let opts = cfg.save_options();
        assert!(opts.edge_colors && !opts.vertex_colors);
        let rules = cfg.label_rules().unwrap();
        assert!(rules.vertex_label_is_valid("q12"));
        assert!(!rules.vertex_label_is_valid("x"));
        assert!(rules.edge_label_is_valid("anything"));
    }

    #[test]
    fn bad_regex_is_rejected() {
        let err = EditorConfig::from_json_str(r#"{"edge_label_regex":"(unclosed"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Regex { field: "edge_label_regex", .. }));
    }
}
