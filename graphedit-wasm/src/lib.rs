use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;
mod policy;

/// Diagram editor handed to the host page. One instance per answer field.
#[wasm_bindgen]
pub struct GraphEditor { pub(crate) inner: graphedit::Editor }

impl GraphEditor {
    pub fn rs_new(params: &str, text: &str) -> Result<GraphEditor, graphedit::ConfigError> {
        Ok(GraphEditor { inner: graphedit::Editor::from_params(params, text)? })
    }
    pub fn rs_version(&self) -> u64 { self.inner.graph().version() }
}
