/// Bounded undo/redo stack of serialized snapshots.
///
/// Holds at most `max + 1` entries: the current state plus `max` undo steps.
/// Recording after an undo discards the redo tail.
#[derive(Clone, Debug)]
pub struct History {
    snapshots: Vec<String>,
    pointer: usize,
    max: usize,
}

impl History {
    pub fn new(max: usize) -> Self {
        History { snapshots: Vec::new(), pointer: 0, max }
    }

    /// Forgets everything and starts over from `initial`.
    pub fn reset(&mut self, initial: String) {
        self.snapshots.clear();
        self.snapshots.push(initial);
        self.pointer = 0;
    }

    pub fn record(&mut self, snapshot: String) {
        if self.snapshots.is_empty() {
            self.reset(snapshot);
            return;
        }
        self.snapshots.truncate(self.pointer + 1);
        self.snapshots.push(snapshot);
        if self.snapshots.len() > self.max + 1 {
            self.snapshots.remove(0);
        } else {
            self.pointer += 1;
        }
        log::debug!("history: recorded {}/{}", self.pointer, self.snapshots.len());
    }

    /// Steps back and returns the snapshot to restore.
    pub fn undo(&mut self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.pointer -= 1;
        log::debug!("history: undo to {}", self.pointer);
        self.current()
    }

    pub fn redo(&mut self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        self.pointer += 1;
        log::debug!("history: redo to {}", self.pointer);
        self.current()
    }

    pub fn can_undo(&self) -> bool {
        self.pointer >= 1
    }
    pub fn can_redo(&self) -> bool {
        self.pointer + 1 < self.snapshots.len()
    }
    pub fn current(&self) -> Option<&str> {
        self.snapshots.get(self.pointer).map(String::as_str)
    }
    pub fn pointer(&self) -> usize {
        self.pointer
    }
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
    pub fn max(&self) -> usize {
        self.max
    }
}
