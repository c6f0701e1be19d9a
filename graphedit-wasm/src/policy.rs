use graphedit::{EditKind, EditPolicy};
use wasm_bindgen::JsValue;

/// Policy answered by a host callback `(kind: string) => boolean`. Anything
/// other than `true`, including a thrown exception, denies the edit.
pub(crate) struct JsPolicy {
    pub(crate) callback: js_sys::Function,
}

impl EditPolicy for JsPolicy {
    fn allows(&self, kind: EditKind) -> bool {
        match self.callback.call1(&JsValue::NULL, &JsValue::from_str(kind.as_str())) {
            Ok(v) => v.as_bool().unwrap_or(false),
            Err(e) => {
                log::warn!("edit policy callback threw for {}: {:?}", kind.as_str(), e);
                false
            }
        }
    }
}
